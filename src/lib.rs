//! An optional value stored inline, with explicit control over when the payload is constructed and dropped.
//!
//! [`Optional<T>`] holds either a `T` or [`Nothing`] in storage sized for exactly one `T`, without allocating. Every
//! payload it constructs is dropped exactly once: on reset, on assignment of [`Nothing`], when moved out, or when
//! the container itself is dropped. Assigning onto a container that already holds a value reuses the held value in
//! place.
//!
//! ```
//! use inline_optional::{Nothing, Optional};
//!
//! let mut a = Optional::some(42);
//! let mut b = Optional::<i32>::new();
//! assert!(b == Nothing);
//!
//! inline_optional::swap(&mut a, &mut b);
//! assert!(!a.has_value());
//! assert_eq!(42, *b);
//! assert_eq!(7, a.value_or(7));
//! ```
#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod nothing;
pub mod optional;

pub use nothing::Nothing;
pub use optional::{EmptyError, Optional};

/// Swap the contents of two [`Optional`]s. See [`Optional::swap`].
pub fn swap<T>(a: &mut Optional<T>, b: &mut Optional<T>) {
    a.swap(b);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_swap_forwards() {
        let mut a = Optional::some(42);
        let mut b = Optional::some(55);
        swap(&mut a, &mut b);
        assert!(a == 55);
        assert!(b == 42);
    }
}
