use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared log of labels, for asserting the order behaviors ran in.
///
/// Clones share the same log, so one clone can be moved into a behavior
/// while the test keeps another.
#[derive(Clone, Debug, Default)]
pub struct CallOrder {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: impl Into<String>) {
        self.entries.borrow_mut().push(label.into());
    }

    /// A zero-parameter behavior that records `label` each time it runs.
    pub fn recorder(&self, label: &str) -> impl Fn() + 'static {
        let order = self.clone();
        let label = label.to_string();
        move || order.record(label.clone())
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Shared counter for behaviors that only need to be counted.
#[derive(Clone, Debug, Default)]
pub struct Counter {
    count: Rc<Cell<usize>>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.set(self.count.get() + 1);
    }

    /// A zero-parameter behavior that increments this counter.
    pub fn incrementer(&self) -> impl Fn() + 'static {
        let counter = self.clone();
        move || counter.increment()
    }

    pub fn get(&self) -> usize {
        self.count.get()
    }
}
