#![forbid(unsafe_code)]

//! Focus trap decisions and document tabbability snapshots.
//!
//! # Invariants
//!
//! 1. While a panel with focusable content is open, Tab never moves focus
//!    outside of it: the last element wraps to the first, Shift+Tab on the
//!    first wraps to the last, and focus found outside the panel is pulled
//!    back to the matching end.
//! 2. A panel with no focusable content disables document-wide tabbing
//!    instead, so focus cannot land behind the overlay.
//! 3. [`TabIndexSnapshot::restore`] puts back the exact `tabindex` each
//!    element had when captured, including "no attribute".

use crate::dom::Dom;

/// Elements considered keyboard-focusable.
pub const FOCUSABLE_SELECTOR: &str = "a[href], input, button, select, textarea, [tabindex]";

/// Outcome of a Tab press inside an open panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapStep {
    /// Let the browser move focus normally.
    PassThrough,
    /// Focus the panel element at this index and suppress the default.
    MoveTo(usize),
    /// The panel has nothing focusable; take the whole document out of the
    /// tab order.
    DisableDocument,
}

/// Decide what a Tab press does.
///
/// `len` is the number of focusable elements in the panel and `focused` the
/// index of the focused one among them, `None` if focus is elsewhere.
#[must_use]
pub fn trap_step(len: usize, focused: Option<usize>, shift: bool) -> TrapStep {
    if len == 0 {
        return TrapStep::DisableDocument;
    }
    let last = len - 1;
    match (focused, shift) {
        (None, false) => TrapStep::MoveTo(0),
        (None, true) => TrapStep::MoveTo(last),
        (Some(i), false) if i == last => TrapStep::MoveTo(0),
        (Some(0), true) => TrapStep::MoveTo(last),
        _ => TrapStep::PassThrough,
    }
}

/// Prior `tabindex` values of a set of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct TabIndexSnapshot<N> {
    entries: Vec<(N, Option<String>)>,
}

impl<N> Default for TabIndexSnapshot<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq> TabIndexSnapshot<N> {
    /// Record the current `tabindex` of every node without changing it.
    pub fn capture<D: Dom<Node = N>>(dom: &D, nodes: Vec<N>) -> Self {
        let entries = nodes
            .into_iter()
            .map(|node| {
                let prior = dom.attribute(&node, "tabindex");
                (node, prior)
            })
            .collect();
        Self { entries }
    }

    /// Take every captured node out of the tab order.
    pub fn disable<D: Dom<Node = N>>(&self, dom: &mut D) {
        for (node, _) in &self.entries {
            dom.set_attribute(node, "tabindex", "-1");
        }
    }

    /// Put back the captured `tabindex` values.
    pub fn restore<D: Dom<Node = N>>(&self, dom: &mut D) {
        for (node, prior) in &self.entries {
            match prior {
                Some(value) => dom.set_attribute(node, "tabindex", value),
                None => dom.remove_attribute(node, "tabindex"),
            }
        }
    }

    /// Number of captured elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `node` was captured.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.entries.iter().any(|(n, _)| n == node)
    }
}
