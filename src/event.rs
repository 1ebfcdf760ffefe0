//! Synchronous prioritized multicast
//!
//! Listeners are called in descending priority order; listeners sharing a
//! priority run in registration order. Delivery happens inline in
//! `invoke`, there is no queue.

use std::fmt;

/// Handle returned by `add_listener`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

struct Listener<T> {
    id: ListenerId,
    priority: i32,
    callback: Callback<T>,
}

/// A list of callbacks fired together
pub struct Event<T> {
    listeners: Vec<Listener<T>>,
    next_id: u64,
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T> Event<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback. Higher `priority` runs earlier.
    pub fn add_listener<F>(&mut self, callback: F, priority: i32) -> ListenerId
    where
        F: FnMut(&T) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.listeners.push(Listener {
            id,
            priority,
            callback: Box::new(callback),
        });
        // Stable sort keeps registration order among equal priorities
        self.listeners.sort_by(|a, b| b.priority.cmp(&a.priority));

        id
    }

    /// Unsubscribe. Returns false if the id was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Call every listener with `data`
    pub fn invoke(&mut self, data: &T) {
        for listener in &mut self.listeners {
            (listener.callback)(data);
        }
    }

    /// Remove all listeners
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_priority_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut event: Event<u32> = Event::new();

        for (name, priority) in [("low", 0), ("high", 10), ("mid", 5)] {
            let calls = Rc::clone(&calls);
            event.add_listener(move |_| calls.borrow_mut().push(name), priority);
        }

        event.invoke(&1);
        assert_eq!(*calls.borrow(), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut event: Event<()> = Event::new();

        for name in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            event.add_listener(move |_| calls.borrow_mut().push(name), 1);
        }
        let calls_top = Rc::clone(&calls);
        event.add_listener(move |_| calls_top.borrow_mut().push("top"), 2);

        event.invoke(&());
        assert_eq!(*calls.borrow(), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_payload_is_delivered() {
        let seen = Rc::new(RefCell::new(0u64));
        let mut event: Event<u64> = Event::new();

        let sink = Rc::clone(&seen);
        event.add_listener(move |value| *sink.borrow_mut() += *value, 0);

        event.invoke(&40);
        event.invoke(&2);
        assert_eq!(*seen.borrow(), 42);
    }

    #[test]
    fn test_remove_listener() {
        let count = Rc::new(RefCell::new(0));
        let mut event: Event<()> = Event::new();

        let c = Rc::clone(&count);
        let id = event.add_listener(move |_| *c.borrow_mut() += 1, 0);

        event.invoke(&());
        assert!(event.remove_listener(id));
        assert!(!event.remove_listener(id));
        event.invoke(&());

        assert_eq!(*count.borrow(), 1);
        assert!(event.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut event: Event<()> = Event::new();
        event.add_listener(|_| {}, 0);
        event.add_listener(|_| {}, 3);
        assert_eq!(event.len(), 2);

        event.clear();
        assert!(event.is_empty());
    }
}
