//! `Handle<T>` and `RelinkableHandle<T>`: shared indirection to a target that
//! can be swapped at runtime.
//!
//! Every handle points at a shared *link* cell. Readers store the cell, never
//! the target, and resolve it on each query with [`Handle::current`].
//! Relinking replaces the cell contents, so all handles sharing the cell see
//! the new target on their next query without any notification.
//!
//! | concept | Rust |
//! |---------|------|
//! | read-only observer | [`Handle<T>`] (clone of the cell) |
//! | owner that may relink | [`RelinkableHandle<T>`] |

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

struct Link<T: ?Sized> {
    target: RwLock<Arc<T>>,
    version: AtomicU64,
}

/// A shared, read-only reference to the target currently held by a link.
///
/// Handles are always linked: they are built either from a target or from a
/// [`RelinkableHandle`], which itself always holds a target.
pub struct Handle<T: ?Sized> {
    link: Arc<Link<T>>,
}

impl<T: ?Sized> Handle<T> {
    /// Create a handle with its own link, pointing at `target`.
    ///
    /// Nobody can relink this handle; use [`RelinkableHandle`] for that.
    pub fn new(target: Arc<T>) -> Self {
        Self {
            link: Arc::new(Link {
                target: RwLock::new(target),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current target.
    ///
    /// The snapshot stays valid even if the link is relinked while it is in
    /// use; the next call returns the new target.
    pub fn current(&self) -> Arc<T> {
        let guard = self
            .link
            .target
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Number of times the underlying link has been relinked.
    pub fn version(&self) -> u64 {
        self.link.version.load(Ordering::Acquire)
    }

    /// Return `true` if both handles share the same link cell.
    pub fn same_link(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.link, &other.link)
    }
}

impl<T> Handle<T> {
    /// Create a handle owning `value`.
    pub fn from_value(value: T) -> Self {
        Self::new(Arc::new(value))
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized> From<Arc<T>> for Handle<T> {
    fn from(target: Arc<T>) -> Self {
        Self::new(target)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("version", &self.version())
            .field("target", &self.current())
            .finish()
    }
}

/// A [`Handle`] whose target can be replaced after construction.
///
/// Cloning a `RelinkableHandle` shares the link, so any clone may relink it.
/// Hand out read-only observers with [`RelinkableHandle::handle`].
pub struct RelinkableHandle<T: ?Sized> {
    handle: Handle<T>,
}

impl<T: ?Sized> RelinkableHandle<T> {
    /// Create a relinkable handle pointing at `target`.
    pub fn new(target: Arc<T>) -> Self {
        Self {
            handle: Handle::new(target),
        }
    }

    /// Point every handle sharing this link at `target`.
    pub fn link_to(&self, target: Arc<T>) {
        let mut guard = self
            .handle
            .link
            .target
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = target;
        self.handle.link.version.fetch_add(1, Ordering::AcqRel);
    }

    /// A read-only handle sharing this link.
    pub fn handle(&self) -> Handle<T> {
        self.handle.clone()
    }

    /// Snapshot of the current target.
    pub fn current(&self) -> Arc<T> {
        self.handle.current()
    }

    /// Number of relinks performed so far.
    pub fn version(&self) -> u64 {
        self.handle.version()
    }
}

impl<T> RelinkableHandle<T> {
    /// Create a relinkable handle owning `value`.
    pub fn from_value(value: T) -> Self {
        Self::new(Arc::new(value))
    }
}

impl<T: ?Sized> Clone for RelinkableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for RelinkableHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelinkableHandle").field(&self.handle).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Level: Send + Sync {
        fn level(&self) -> f64;
    }

    struct Fixed(f64);

    impl Level for Fixed {
        fn level(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn observers_see_relinked_target() {
        let owner: RelinkableHandle<dyn Level> = RelinkableHandle::new(Arc::new(Fixed(1.0)));
        let observer = owner.handle();
        assert_eq!(observer.current().level(), 1.0);

        owner.link_to(Arc::new(Fixed(2.0)));
        assert_eq!(observer.current().level(), 2.0);
        assert_eq!(observer.version(), 1);
        assert!(observer.same_link(&owner.handle()));
    }

    #[test]
    fn snapshot_outlives_relink() {
        let owner = RelinkableHandle::from_value(10_u32);
        let snapshot = owner.current();
        owner.link_to(Arc::new(20));
        assert_eq!(*snapshot, 10);
        assert_eq!(*owner.current(), 20);
    }

    #[test]
    fn plain_handles_do_not_share_links() {
        let a = Handle::from_value(1_i32);
        let b = Handle::from_value(1_i32);
        assert!(!a.same_link(&b));
        assert!(a.same_link(&a.clone()));
    }

    proptest::proptest! {
        #[test]
        fn last_link_wins(values in proptest::collection::vec(-1.0e6_f64..1.0e6, 1..20)) {
            let owner = RelinkableHandle::from_value(0.0_f64);
            let observers: Vec<_> = (0..3).map(|_| owner.handle()).collect();
            for v in &values {
                owner.link_to(Arc::new(*v));
            }
            let last = *values.last().unwrap();
            for o in &observers {
                proptest::prop_assert_eq!(*o.current(), last);
                proptest::prop_assert_eq!(o.version(), values.len() as u64);
            }
        }
    }
}
