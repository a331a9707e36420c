//! Reusable storage for short-lived entities (units, projectiles).
//!
//! Entries are never removed. Releasing an entry only marks it inactive, so
//! slot indices stay stable while other code iterates or holds references.
//! Acquisition reuses the first inactive entry of the requested kind, or
//! appends a fresh one; the pool never shrinks.

/// An entity that can live in a [`Pool`].
pub trait Poolable {
    /// Discriminates entries that may be recycled for each other.
    type Kind: ?Sized + PartialEq;
    /// Everything needed to (re)initialize an entry.
    type Init;

    /// Build a fresh, active entry.
    fn create(init: Self::Init) -> Self;
    /// Reinitialize an inactive entry in place and mark it active.
    fn reinit(&mut self, init: Self::Init);
    fn kind(&self) -> &Self::Kind;
    fn is_active(&self) -> bool;
    fn deactivate(&mut self);
}

/// Arena-style pool with linear-scan acquisition.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    entries: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Poolable> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reactivate an inactive entry of `kind`, or append a new one.
    ///
    /// Returns the slot index and the initialized entry.
    pub fn acquire(&mut self, kind: &T::Kind, init: T::Init) -> (usize, &mut T) {
        let reusable = self
            .entries
            .iter()
            .position(|entry| !entry.is_active() && entry.kind() == kind);
        let slot = match reusable {
            Some(slot) => {
                self.entries[slot].reinit(init);
                slot
            }
            None => {
                self.entries.push(T::create(init));
                self.entries.len() - 1
            }
        };
        (slot, &mut self.entries[slot])
    }

    /// Mark the entry at `slot` inactive. Returns whether it was active.
    pub fn release(&mut self, slot: usize) -> bool {
        match self.entries.get_mut(slot) {
            Some(entry) if entry.is_active() => {
                entry.deactivate();
                true
            }
            _ => false,
        }
    }

    /// Mark every entry inactive, keeping the allocations.
    pub fn release_all(&mut self) {
        for entry in &mut self.entries {
            entry.deactivate();
        }
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.entries.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.entries.get_mut(slot)
    }

    /// Active entries with their slot indices, in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter(|(_, entry)| entry.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_active()).count()
    }

    /// Total entries ever allocated, active or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Token {
        kind: &'static str,
        value: u32,
        active: bool,
        reinits: u32,
    }

    impl Poolable for Token {
        type Kind = str;
        type Init = (&'static str, u32);

        fn create((kind, value): Self::Init) -> Self {
            Self {
                kind,
                value,
                active: true,
                reinits: 0,
            }
        }

        fn reinit(&mut self, (kind, value): Self::Init) {
            self.kind = kind;
            self.value = value;
            self.active = true;
            self.reinits += 1;
        }

        fn kind(&self) -> &str {
            self.kind
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    #[test]
    fn test_acquire_appends_when_nothing_free() {
        let mut pool = Pool::<Token>::new();
        let (a, _) = pool.acquire("x", ("x", 1));
        let (b, _) = pool.acquire("x", ("x", 2));
        assert_eq!((a, b), (0, 1));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_release_then_acquire_reuses_slot() {
        let mut pool = Pool::<Token>::new();
        pool.acquire("x", ("x", 1));
        pool.acquire("x", ("x", 2));
        assert!(pool.release(0));
        assert!(!pool.release(0), "double release must report false");

        let (slot, entry) = pool.acquire("x", ("x", 9));
        assert_eq!(slot, 0);
        assert_eq!(entry.value, 9);
        assert_eq!(entry.reinits, 1);
        assert_eq!(pool.len(), 2, "pool must not grow when an entry is free");
    }

    #[test]
    fn test_acquire_respects_kind() {
        let mut pool = Pool::<Token>::new();
        pool.acquire("x", ("x", 1));
        pool.release(0);

        let (slot, _) = pool.acquire("y", ("y", 2));
        assert_eq!(slot, 1, "inactive entry of another kind must not be reused");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_release_all_keeps_entries() {
        let mut pool = Pool::<Token>::new();
        for i in 0..5 {
            pool.acquire("x", ("x", i));
        }
        pool.release_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.iter_active().count(), 0);
    }

    #[test]
    fn test_iteration_skips_inactive() {
        let mut pool = Pool::<Token>::new();
        for i in 0..4 {
            pool.acquire("x", ("x", i));
        }
        pool.release(1);
        pool.release(3);
        let slots: Vec<usize> = pool.iter_active().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![0, 2]);

        for (_, entry) in pool.iter_active_mut() {
            entry.value += 100;
        }
        assert_eq!(pool.get(0).map(|t| t.value), Some(100));
        assert_eq!(pool.get(1).map(|t| t.value), Some(1));
    }
}
