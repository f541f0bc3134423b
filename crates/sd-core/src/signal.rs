//! Typed observer
//!
//! A [`Signal`] is owned by the component that emits it. Listeners are plain
//! closures; a listener that needs to act on another component should enqueue a
//! message rather than borrow that component, which keeps emission free of
//! re-entrant borrows.

use std::fmt;

/// Handle returned by [`Signal::connect`], used to disconnect a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

type Slot<T> = Box<dyn FnMut(&T)>;

/// Single-threaded typed event source
pub struct Signal<T> {
    slots: Vec<(SlotId, Slot<T>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a listener; listeners run in registration order
    pub fn connect<F>(&mut self, listener: F) -> SlotId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not connected.
    pub fn disconnect(&mut self, id: SlotId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }

    pub fn disconnect_all(&mut self) {
        self.slots.clear();
    }

    /// Deliver `value` to every listener
    pub fn emit(&mut self, value: &T) {
        for (_, slot) in self.slots.iter_mut() {
            slot(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Signal<()> {
    /// Emit a payload-less notification
    #[inline]
    pub fn dispatch(&mut self) {
        self.emit(&());
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<u32> = Signal::new();

        let a = log.clone();
        signal.connect(move |v| a.borrow_mut().push(("a", *v)));
        let b = log.clone();
        signal.connect(move |v| b.borrow_mut().push(("b", *v)));

        signal.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_disconnect() {
        let count = Rc::new(RefCell::new(0));
        let mut signal = Signal::new();
        let c = count.clone();
        let id = signal.connect(move |_: &()| *c.borrow_mut() += 1);

        signal.dispatch();
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.dispatch();

        assert_eq!(*count.borrow(), 1);
        assert!(signal.is_empty());
    }
}
