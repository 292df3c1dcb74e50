/// The marker for an [`Optional`](crate::Optional) that holds no value.
///
/// `Nothing` is a zero-sized unit value. It builds an empty container, is assigned to clear one, and compares equal
/// to exactly the containers that are empty, in either operand order.
///
/// ## Example
/// ```
/// # use inline_optional::{Nothing, Optional};
/// let mut opt = Optional::some(42);
/// assert!(opt != Nothing);
///
/// opt.assign_nothing(Nothing);
/// assert!(Nothing == opt);
/// assert_eq!(Optional::<i32>::nothing(Nothing), opt);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nothing;
