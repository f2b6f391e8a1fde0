//! Change notification slots.

use std::fmt;

/// A list of callbacks fired synchronously, in connection order.
pub struct Signal<A> {
    slots: Vec<Box<dyn Fn(&A) + 'static>>,
}

impl<A> Signal<A> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn connect(&mut self, slot: impl Fn(&A) + 'static) {
        self.slots.push(Box::new(slot));
    }

    pub fn emit(&self, args: &A) {
        for slot in &self.slots {
            slot(args);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("slots", &self.slots.len()).finish()
    }
}
