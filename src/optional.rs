use core::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::Hash,
    ops::{Deref, DerefMut},
};

use crate::Nothing;

use self::slot::Slot;

/// Private module that owns the tagged storage and all of its state transitions.
mod slot;

/// The error returned when accessing the value of an empty [`Optional`] through a checked accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyError;

#[cfg(feature = "std")]
impl std::error::Error for EmptyError {}

impl Display for EmptyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("optional holds no value")
    }
}

/// A value of type `T`, or nothing, stored inline without allocation.
///
/// The container constructs and drops its payload only at well-defined points: the value is dropped exactly once
/// when the container is reset, assigned [`Nothing`], moved out of, or dropped itself. Assigning onto a container
/// that already holds a value reuses the payload in place rather than dropping and reconstructing it.
///
/// Accessing the value of an empty container through [`value`](Optional::value) or dereferencing is a contract
/// violation and panics. Use [`has_value`](Optional::has_value), [`try_value`](Optional::try_value) or
/// [`as_option`](Optional::as_option) when emptiness is expected.
pub struct Optional<T>(Slot<T>);

impl<T> Optional<T> {
    /// Construct an empty `Optional`.
    pub const fn new() -> Self {
        Self(Slot::vacant())
    }

    /// Construct an empty `Optional`. Equivalent to [`Optional::new`], but spelled out with the [`Nothing`] marker.
    pub const fn nothing(_: Nothing) -> Self {
        Self::new()
    }

    /// Construct an `Optional` that holds the given value.
    ///
    /// ## Example
    /// ```
    /// # use inline_optional::Optional;
    /// let opt = Optional::some(42);
    /// assert!(opt.has_value());
    /// assert_eq!(42, *opt.value());
    /// ```
    pub const fn some(value: T) -> Self {
        Self(Slot::occupied(value))
    }

    /// Whether this `Optional` holds a value.
    pub const fn has_value(&self) -> bool {
        self.0.has_value()
    }

    /// Get a shared reference to the held value.
    ///
    /// ## Panics
    /// This method panics if the `Optional` is empty.
    #[track_caller]
    pub fn value(&self) -> &T {
        assert!(self.has_value(), "optional should hold a value");
        // SAFETY: Just checked.
        unsafe { self.0.get_unchecked() }
    }

    /// Get a mutable reference to the held value.
    ///
    /// ## Panics
    /// This method panics if the `Optional` is empty.
    #[track_caller]
    pub fn value_mut(&mut self) -> &mut T {
        assert!(self.has_value(), "optional should hold a value");
        // SAFETY: Just checked.
        unsafe { self.0.get_unchecked_mut() }
    }

    /// Get a shared reference to the held value without checking for emptiness.
    ///
    /// ## Safety
    /// The caller must ensure that the `Optional` holds a value.
    pub unsafe fn value_unchecked(&self) -> &T {
        // SAFETY: The caller has ensured that a value is held.
        unsafe { self.0.get_unchecked() }
    }

    /// Get a mutable reference to the held value without checking for emptiness.
    ///
    /// ## Safety
    /// The caller must ensure that the `Optional` holds a value.
    pub unsafe fn value_unchecked_mut(&mut self) -> &mut T {
        // SAFETY: The caller has ensured that a value is held.
        unsafe { self.0.get_unchecked_mut() }
    }

    /// Get a shared reference to the held value. If the `Optional` is empty, this method returns an error.
    ///
    /// ## Example
    /// ```
    /// # use inline_optional::{EmptyError, Optional};
    /// let opt = Optional::<i32>::new();
    /// assert_eq!(Err(EmptyError), opt.try_value());
    /// ```
    pub fn try_value(&self) -> Result<&T, EmptyError> {
        self.0.get().ok_or(EmptyError)
    }

    /// Get a mutable reference to the held value. If the `Optional` is empty, this method returns an error.
    pub fn try_value_mut(&mut self) -> Result<&mut T, EmptyError> {
        self.0.get_mut().ok_or(EmptyError)
    }

    /// View the contents as a standard [`Option`] of a shared reference.
    pub fn as_option(&self) -> Option<&T> {
        self.0.get()
    }

    /// View the contents as a standard [`Option`] of a mutable reference.
    pub fn as_option_mut(&mut self) -> Option<&mut T> {
        self.0.get_mut()
    }

    /// Construct an `Optional` from a standard [`Option`].
    ///
    /// ## Example
    /// ```
    /// # use inline_optional::Optional;
    /// let opt = Optional::from_option(Some(42));
    /// assert_eq!(42, *opt.value());
    /// assert!(!Optional::<i32>::from_option(None).has_value());
    /// ```
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::some(value),
            None => Self::new(),
        }
    }

    /// Consume this `Optional` and return its contents as a standard [`Option`].
    pub fn into_option(mut self) -> Option<T> {
        self.0.take()
    }

    /// Get a raw pointer to the inline storage. The pointer is only valid for reads while the `Optional` holds a
    /// value.
    pub const fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    /// Get a writable raw pointer to the inline storage. The pointer is only valid for reads and writes while the
    /// `Optional` holds a value.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr()
    }

    /// Drop the held value, if any, leaving this `Optional` empty.
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Assign the [`Nothing`] marker. Equivalent to [`Optional::reset`].
    pub fn assign_nothing(&mut self, _: Nothing) {
        self.reset();
    }

    /// Assign a value. If a value is already held, the new value is assigned onto it in place; otherwise the value
    /// is constructed into the empty storage.
    ///
    /// ## Example
    /// ```
    /// # use inline_optional::Optional;
    /// let mut opt = Optional::<i32>::new();
    /// opt.set(55);
    /// *opt.set(99) += 1;
    /// assert_eq!(100, *opt.value());
    /// ```
    pub fn set(&mut self, value: T) -> &mut T {
        if self.has_value() {
            // SAFETY: Just checked.
            let held = unsafe { self.0.get_unchecked_mut() };
            *held = value;
            held
        } else {
            self.0.fill(value)
        }
    }

    /// Drop the held value, if any, then construct a new one from `f`. If `f` panics, this `Optional` is left
    /// empty.
    pub fn emplace_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.reset();
        self.0.fill(f())
    }

    /// Get the held value, first constructing one from `f` if this `Optional` is empty.
    pub fn get_or_insert_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if !self.has_value() {
            self.0.fill(f());
        }
        // SAFETY: The slot is occupied at this point.
        unsafe { self.0.get_unchecked_mut() }
    }

    /// Move the contents out into a new `Optional`, leaving this one empty.
    ///
    /// ## Example
    /// ```
    /// # use inline_optional::Optional;
    /// let mut a = Optional::some(42);
    /// let b = a.take();
    /// assert!(!a.has_value());
    /// assert_eq!(42, *b.value());
    /// ```
    pub fn take(&mut self) -> Self {
        match self.0.take() {
            Some(value) => Self::some(value),
            None => Self::new(),
        }
    }

    /// Move the contents of `other` into this `Optional`. Afterwards `other` is always empty.
    ///
    /// If both hold a value, the value of `other` is moved onto the held value in place. If `other` is empty, the
    /// held value is dropped.
    pub fn take_from(&mut self, other: &mut Self) {
        match other.0.take() {
            Some(value) => {
                self.set(value);
            }
            None => self.reset(),
        }
    }

    /// Store a value and return the previous contents.
    pub fn replace(&mut self, value: T) -> Self {
        let previous = self.take();
        self.0.fill(value);
        previous
    }

    /// Transform the held value by value, storing the result in place. Returns whether a value was held. If `f`
    /// panics, this `Optional` is left empty.
    ///
    /// ## Example
    /// ```
    /// # use inline_optional::Optional;
    /// let mut opt = Optional::some(42);
    /// assert!(opt.map_in_place(|v| v + 28));
    /// assert_eq!(70, *opt.value());
    /// ```
    pub fn map_in_place<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(T) -> T,
    {
        self.0.replace_with(f)
    }

    /// Swap the contents of this `Optional` with another. If both hold a value, the values themselves are swapped;
    /// if only one does, its value moves across and it is left empty.
    pub fn swap(&mut self, other: &mut Self) {
        self.0.swap(&mut other.0);
    }

    /// Whether this `Optional` holds a value equal to `value`. An empty `Optional` never equals any value.
    ///
    /// This is the comparison behind the `==` operators generated by [`value_eq!`](crate::value_eq).
    pub fn contains<U>(&self, value: &U) -> bool
    where
        T: PartialEq<U>,
        U: ?Sized,
    {
        match self.as_option() {
            Some(held) => held == value,
            None => false,
        }
    }
}

impl<T: Clone> Optional<T> {
    /// Return a clone of the held value, or the given default if this `Optional` is empty.
    ///
    /// ## Example
    /// ```
    /// # use inline_optional::Optional;
    /// let empty = Optional::<u64>::new();
    /// assert_eq!(42, empty.value_or(42));
    /// ```
    pub fn value_or(&self, default: T) -> T {
        match self.as_option() {
            Some(value) => value.clone(),
            None => default,
        }
    }

    /// Return a clone of the held value, or compute a default from `f` if this `Optional` is empty.
    pub fn value_or_else<F>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self.as_option() {
            Some(value) => value.clone(),
            None => f(),
        }
    }
}

// trait implementations

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Self::some(value)
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T> From<&Optional<T>> for bool {
    fn from(value: &Optional<T>) -> Self {
        value.has_value()
    }
}

impl<T: Clone> Clone for Optional<T> {
    fn clone(&self) -> Self {
        match self.as_option() {
            Some(value) => Self::some(value.clone()),
            None => Self::new(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match source.as_option() {
            Some(value) => match self.0.get_mut() {
                Some(held) => held.clone_from(value),
                None => {
                    self.0.fill(value.clone());
                }
            },
            None => self.reset(),
        }
    }
}

impl<T> Deref for Optional<T> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &Self::Target {
        self.value()
    }
}

impl<T> DerefMut for Optional<T> {
    #[track_caller]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value_mut()
    }
}

impl<T: Debug> Debug for Optional<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_option() {
            Some(value) => f.debug_tuple("Optional").field(value).finish(),
            None => Debug::fmt(&Nothing, f),
        }
    }
}

impl<T, U> PartialEq<Optional<U>> for Optional<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Optional<U>) -> bool {
        match (self.as_option(), other.as_option()) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for Optional<T> {}

impl<T> PartialEq<Nothing> for Optional<T> {
    fn eq(&self, _: &Nothing) -> bool {
        !self.has_value()
    }
}

impl<T> PartialEq<Optional<T>> for Nothing {
    fn eq(&self, other: &Optional<T>) -> bool {
        other == self
    }
}

impl<T: PartialOrd> PartialOrd for Optional<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_option().partial_cmp(&other.as_option())
    }
}

impl<T: Ord> Ord for Optional<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_option().cmp(&other.as_option())
    }
}

impl<T: Hash> Hash for Optional<T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.as_option().hash(state);
    }
}

/// Implement `==` and `!=` between [`Optional<T>`](crate::Optional) and bare values of `T`, in both operand orders.
///
/// Both directions forward to [`Optional::contains`](crate::Optional::contains). The crate already does this for
/// the primitive scalar types; invoke the macro for your own payload types.
///
/// ## Example
/// ```
/// # use inline_optional::{value_eq, Optional};
/// #[derive(PartialEq)]
/// struct Meters(u32);
///
/// value_eq!(Meters);
///
/// let opt = Optional::some(Meters(3));
/// assert!(opt == Meters(3));
/// assert!(Meters(4) != opt);
/// assert!(Optional::<Meters>::new() != Meters(3));
/// ```
#[macro_export]
macro_rules! value_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ::core::cmp::PartialEq<$ty> for $crate::Optional<$ty> {
                fn eq(&self, other: &$ty) -> bool {
                    self.contains(other)
                }
            }

            impl ::core::cmp::PartialEq<$crate::Optional<$ty>> for $ty {
                fn eq(&self, other: &$crate::Optional<$ty>) -> bool {
                    other.contains(self)
                }
            }
        )*
    };
}

value_eq!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);
