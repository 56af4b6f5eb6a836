//! Navigation history with per-visit scroll memory.

use cozy_types::address::Address;

/// A page that was successfully shown and remembered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub address: Address,
    /// First visible line when the user left the page.
    pub scroll: usize,
}

impl Visit {
    pub fn new(address: Address) -> Self {
        Self { address, scroll: 0 }
    }
}

/// Stack of visits, most recent on top.
///
/// The stack never shrinks below one entry: [`History::back`] on a stack
/// of zero or one visits does nothing.
#[derive(Debug, Clone, Default)]
pub struct History {
    visits: Vec<Visit>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, visit: Visit) {
        self.visits.push(visit);
    }

    /// Drop the top visit and return the one below it, which becomes the
    /// new top. `None` (and no change) when fewer than two visits exist.
    pub fn back(&mut self) -> Option<&Visit> {
        if self.visits.len() < 2 {
            return None;
        }
        self.visits.pop();
        self.visits.last()
    }

    pub fn top(&self) -> Option<&Visit> {
        self.visits.last()
    }

    /// The visit [`History::back`] would return, without popping.
    pub fn previous(&self) -> Option<&Visit> {
        self.visits.len().checked_sub(2).map(|i| &self.visits[i])
    }

    /// Store `scroll` in the top visit, just before leaving it.
    pub fn record_scroll(&mut self, scroll: usize) {
        if let Some(top) = self.visits.last_mut() {
            top.scroll = scroll;
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.visits.len() > 1
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Visits from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Visit> {
        self.visits.iter()
    }
}
