//! Push-based observable value with immediate replay.
//!
//! New observers receive the current value as soon as they subscribe, then
//! every value passed to [`Observable::set`], in order and exactly once.
//! Observers run synchronously on the thread that calls `set`; they must not
//! call `set` or `subscribe` on the same observable.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct State<T> {
    value: T,
    next_id: u64,
    observers: Vec<(u64, Observer<T>)>,
}

/// A value that notifies registered observers whenever it changes.
pub struct Observable<T> {
    state: Arc<Mutex<State<T>>>,
    // Serializes set/subscribe so each observer sees values in publish order.
    publish: Mutex<()>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                value: initial,
                next_id: 0,
                observers: Vec::new(),
            })),
            publish: Mutex::new(()),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        lock(&self.state).value.clone()
    }

    /// Replace the value and notify every registered observer.
    pub fn set(&self, value: T) {
        let _publishing = lock(&self.publish);

        let observers: Vec<Observer<T>> = {
            let mut state = lock(&self.state);
            state.value = value.clone();
            state.observers.iter().map(|(_, f)| f.clone()).collect()
        };

        for observer in observers {
            observer(&value);
        }
    }

    /// Register an observer. It is called with the current value before this
    /// method returns.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: Send + 'static,
    {
        let _publishing = lock(&self.publish);
        let observer: Observer<T> = Arc::new(observer);

        let (id, current) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.observers.push((id, observer.clone()));
            (id, state.value.clone())
        };

        observer(&current);

        let weak: Weak<Mutex<State<T>>> = Arc::downgrade(&self.state);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    lock(&state).observers.retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        lock(&self.state).observers.len()
    }
}

/// Handle to a registered observer. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the observer"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

fn lock<S>(mutex: &Mutex<S>) -> MutexGuard<'_, S> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
