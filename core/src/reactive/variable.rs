//! Shared observable cells.
//!
//! A [`Variable<T>`] is a cloneable handle to one value. Every clone sees the
//! same value and the same subscribers. [`Signal<T>`] is the read-only view
//! handed out to code that may observe but not write, and [`Subscription`]
//! keeps a callback registered for as long as it is alive.
//!
//! Subscribers are stored as [`Weak`] references and pruned lazily when the
//! value next changes. They are called after the cell lock is released, so a
//! callback may read or write any reactive value, including the one that
//! notified it.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type WeakCallback<T> = Weak<dyn Fn(&T) + Send + Sync>;

struct Cell<T> {
    value: T,
    version: u64,
    subscribers: Vec<WeakCallback<T>>,
}

/// A shared, observable value.
///
/// Setting a value equal to the current one is a no-op: the version does not
/// change and no subscriber is called.
pub struct Variable<T> {
    cell: Arc<Mutex<Cell<T>>>,
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.lock();
        f.debug_struct("Variable")
            .field("value", &cell.value)
            .field("version", &cell.version)
            .field("subscribers", &cell.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + Send + 'static> Default for Variable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + Send + 'static> Variable<T> {
    /// Creates a variable holding `value`, at version 0.
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(Mutex::new(Cell {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.cell.lock().value.clone()
    }

    /// Runs `f` on the current value without cloning it.
    ///
    /// The cell is locked while `f` runs; `f` must not touch this variable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.lock().value)
    }

    /// Replaces the value and notifies subscribers if it changed.
    pub fn set(&self, value: T) {
        {
            let mut cell = self.cell.lock();
            if cell.value == value {
                return;
            }
            cell.value = value.clone();
            cell.version += 1;
        }
        self.notify(&value);
    }

    /// Modifies the value in place and notifies subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut cell = self.cell.lock();
            let before = cell.value.clone();
            f(&mut cell.value);
            if cell.value == before {
                None
            } else {
                cell.version += 1;
                Some(cell.value.clone())
            }
        };
        if let Some(value) = changed {
            self.notify(&value);
        }
    }

    /// Registers `callback` to run with the new value after every change.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let strong: Callback<T> = Arc::new(callback);
        self.cell.lock().subscribers.push(Arc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing mutations so far.
    pub fn version(&self) -> u64 {
        self.cell.lock().version
    }

    /// Returns `true` if both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// A read-only view of this variable.
    pub fn signal(&self) -> Signal<T> {
        Signal {
            variable: self.clone(),
        }
    }

    fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = {
            let mut cell = self.cell.lock();
            cell.subscribers.retain(|s| s.strong_count() > 0);
            cell.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in callbacks {
            callback(value);
        }
    }
}

/// Read-only view of a [`Variable`].
pub struct Signal<T> {
    variable: Variable<T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            variable: self.variable.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.variable).finish()
    }
}

impl<T: Clone + PartialEq + Send + 'static> Signal<T> {
    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.variable.get()
    }

    /// Runs `f` on the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.variable.with(f)
    }

    /// See [`Variable::subscribe`].
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.variable.subscribe(callback)
    }

    /// See [`Variable::version`].
    pub fn version(&self) -> u64 {
        self.variable.version()
    }
}

/// Keeps a subscriber callback alive. Dropping it unsubscribes.
pub struct Subscription {
    _guard: Box<dyn Any + Send + Sync>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn clones_share_the_value() {
        let a = Variable::new(1);
        let b = a.clone();
        b.set(7);
        assert_eq!(a.get(), 7);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Variable::new(7)));
    }

    #[test]
    fn set_equal_value_is_noop() {
        let v = Variable::new(3);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = v.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        v.set(3);
        assert_eq!(v.version(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        v.set(4);
        assert_eq!(v.version(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribers_see_new_value_in_order() {
        let v = Variable::new(String::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&seen);
        let second = Arc::clone(&seen);
        let _a = v.subscribe(move |s: &String| first.lock().push(format!("a:{s}")));
        let _b = v.subscribe(move |s: &String| second.lock().push(format!("b:{s}")));

        v.set("x".to_owned());
        assert_eq!(*seen.lock(), vec!["a:x", "b:x"]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let v = Variable::new(0);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = v.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        v.set(1);
        drop(sub);
        v.set(2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn update_notifies_only_on_change() {
        let v = Variable::new(vec![1, 2]);
        v.update(|items| items.clear());
        assert_eq!(v.version(), 1);
        v.update(|items| items.clear());
        assert_eq!(v.version(), 1);
        assert!(v.with(Vec::is_empty));
    }

    #[test]
    fn callback_may_write_back() {
        let source = Variable::new(0);
        let mirror = Variable::new(0);
        let target = mirror.clone();
        let _sub = source.subscribe(move |value| target.set(*value * 2));
        source.set(21);
        assert_eq!(mirror.get(), 42);
    }

    #[test]
    fn signal_is_a_read_only_view() {
        let v = Variable::new(false);
        let s = v.signal();
        v.set(true);
        assert!(s.get());
        assert_eq!(s.version(), 1);
    }
}
