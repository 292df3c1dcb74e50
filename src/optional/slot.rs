use core::{mem::MaybeUninit, ptr};

use scopeguard::ScopeGuard;

/// Inline storage for at most one `T`, tagged with whether it is live.
///
/// Every transition between the vacant and occupied states happens in this module. The flag is cleared before a
/// value is dropped or moved out, and set only after a value has been fully written, so a panicking payload never
/// leaves a live flag over dead storage.
pub(super) struct Slot<T> {
    has_value: bool,
    storage: MaybeUninit<T>,
}

impl<T> Slot<T> {
    pub(super) const fn vacant() -> Self {
        Self {
            has_value: false,
            storage: MaybeUninit::uninit(),
        }
    }

    pub(super) const fn occupied(value: T) -> Self {
        Self {
            has_value: true,
            storage: MaybeUninit::new(value),
        }
    }

    pub(super) const fn has_value(&self) -> bool {
        self.has_value
    }

    pub(super) fn get(&self) -> Option<&T> {
        if self.has_value {
            // SAFETY: The flag is set, so storage holds a live value.
            Some(unsafe { self.storage.assume_init_ref() })
        } else {
            None
        }
    }

    pub(super) fn get_mut(&mut self) -> Option<&mut T> {
        if self.has_value {
            // SAFETY: The flag is set, so storage holds a live value.
            Some(unsafe { self.storage.assume_init_mut() })
        } else {
            None
        }
    }

    /// ## Safety
    /// The slot must be occupied.
    pub(super) unsafe fn get_unchecked(&self) -> &T {
        debug_assert!(self.has_value);
        // SAFETY: The caller has ensured that the slot is occupied.
        unsafe { self.storage.assume_init_ref() }
    }

    /// ## Safety
    /// The slot must be occupied.
    pub(super) unsafe fn get_unchecked_mut(&mut self) -> &mut T {
        debug_assert!(self.has_value);
        // SAFETY: The caller has ensured that the slot is occupied.
        unsafe { self.storage.assume_init_mut() }
    }

    pub(super) const fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    pub(super) fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Construct `value` into the storage and mark the slot occupied. Any value already held is dropped first.
    pub(super) fn fill(&mut self, value: T) -> &mut T {
        self.clear();
        let value = self.storage.write(value);
        self.has_value = true;
        value
    }

    /// Move the held value out, leaving the slot vacant.
    pub(super) fn take(&mut self) -> Option<T> {
        if self.has_value {
            self.has_value = false;
            // SAFETY: The value was live, and the cleared flag keeps it from being read or dropped again.
            Some(unsafe { self.storage.assume_init_read() })
        } else {
            None
        }
    }

    /// Drop the held value in place, leaving the slot vacant. Does nothing if the slot is already vacant.
    pub(super) fn clear(&mut self) {
        if self.has_value {
            self.has_value = false;
            // SAFETY: The value was live, and the cleared flag keeps it from being dropped twice, even if its
            // destructor panics.
            unsafe { ptr::drop_in_place(self.storage.as_mut_ptr()) }
        }
    }

    /// Pass the held value through `f` by value and store the result in the same storage. Returns `false` without
    /// calling `f` if the slot is vacant. If `f` panics, the slot is left vacant.
    pub(super) fn replace_with<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(T) -> T,
    {
        if !self.has_value {
            return false;
        }
        // the value belongs to `f` until it returns, so an unwind must not leave the flag set
        let flag = scopeguard::guard(&mut self.has_value, |flag| *flag = false);
        // SAFETY: The value is live, and it is either written back or forgotten by the guard.
        let value = f(unsafe { self.storage.assume_init_read() });
        self.storage.write(value);
        ScopeGuard::into_inner(flag);
        true
    }

    /// Exchange contents with another slot. Occupied pairs swap their payloads, and a single value moves across.
    pub(super) fn swap(&mut self, other: &mut Self) {
        match (self.has_value, other.has_value) {
            (true, true) => {
                // SAFETY: Both slots are occupied.
                unsafe {
                    core::mem::swap(
                        self.storage.assume_init_mut(),
                        other.storage.assume_init_mut(),
                    )
                }
            }
            (true, false) => {
                if let Some(value) = self.take() {
                    other.fill(value);
                }
            }
            (false, true) => {
                if let Some(value) = other.take() {
                    self.fill(value);
                }
            }
            (false, false) => {}
        }
    }
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Counted<'a>(&'a Cell<u32>);

    impl Drop for Counted<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn vacant_slot_drops_nothing() {
        let slot = Slot::<String>::vacant();
        assert!(!slot.has_value());
        assert!(slot.get().is_none());
    }

    #[test]
    fn clear_drops_once() {
        let drops = Cell::new(0);
        let mut slot = Slot::occupied(Counted(&drops));
        slot.clear();
        slot.clear();
        assert!(!slot.has_value());
        drop(slot);
        assert_eq!(1, drops.get());
    }

    #[test]
    fn fill_replaces_held_value() {
        let drops = Cell::new(0);
        let mut slot = Slot::occupied(Counted(&drops));
        slot.fill(Counted(&drops));
        assert_eq!(1, drops.get());
        assert!(slot.has_value());
        drop(slot);
        assert_eq!(2, drops.get());
    }

    #[test]
    fn take_hands_over_ownership() {
        let drops = Cell::new(0);
        let mut slot = Slot::occupied(Counted(&drops));
        let taken = slot.take();
        assert!(taken.is_some());
        assert!(!slot.has_value());
        drop(slot);
        assert_eq!(0, drops.get());
        drop(taken);
        assert_eq!(1, drops.get());
    }

    #[test]
    fn replace_with_keeps_slot_occupied() {
        let mut slot = Slot::occupied(20);
        assert!(slot.replace_with(|v| v + 22));
        assert_eq!(Some(&42), slot.get());

        let mut empty = Slot::<i32>::vacant();
        assert!(!empty.replace_with(|_| unreachable!()));
    }

    #[test]
    fn swap_moves_single_value_across() {
        let mut a = Slot::occupied(1);
        let mut b = Slot::vacant();
        a.swap(&mut b);
        assert!(!a.has_value());
        assert_eq!(Some(&1), b.get());
    }
}
