#![forbid(unsafe_code)]

//! Drive a controller over the reference page with a virtual clock.

use std::time::Duration;

use modalkit_core::{
    Clock, EventOutcome, Key, ModalController, ModalError, ModalEvent, ModalHooks, ModalOverrides,
    VirtualClock,
};

use crate::document::{FakeDocument, NodeId};
use crate::fixture::{Page, TRIGGER_SELECTOR};

/// The controller type the harness drives.
pub type TestModal = ModalController<FakeDocument, VirtualClock>;

/// Hooks for [`TestModal`].
pub type TestHooks = ModalHooks<FakeDocument, VirtualClock>;

type Prepare = Box<dyn FnOnce(&mut FakeDocument, &Page)>;

/// Builder for [`Harness`].
#[must_use]
pub struct HarnessBuilder {
    overrides: ModalOverrides,
    hooks: TestHooks,
    prepare: Option<Prepare>,
}

impl HarnessBuilder {
    /// Options merged onto the defaults.
    pub fn overrides(mut self, overrides: ModalOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Hooks to install.
    pub fn hooks(mut self, hooks: TestHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Edit the page before the controller binds to it.
    pub fn prepare(mut self, f: impl FnOnce(&mut FakeDocument, &Page) + 'static) -> Self {
        self.prepare = Some(Box::new(f));
        self
    }

    /// Bind the controller.
    pub fn build(self) -> Result<Harness, ModalError> {
        let (mut doc, page) = Page::build();
        if let Some(prepare) = self.prepare {
            prepare(&mut doc, &page);
        }
        let clock = VirtualClock::new();
        let modal = ModalController::new(doc, clock.clone(), TRIGGER_SELECTOR, self.overrides)?
            .with_hooks(self.hooks);
        Ok(Harness { page, clock, modal })
    }
}

/// A controller bound to the reference [`Page`], with time under test
/// control.
#[derive(Debug)]
pub struct Harness {
    pub page: Page,
    clock: VirtualClock,
    modal: TestModal,
}

impl Harness {
    /// Start configuring a harness.
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder {
            overrides: ModalOverrides::default(),
            hooks: TestHooks::new(),
            prepare: None,
        }
    }

    /// A harness with default options.
    pub fn new() -> Result<Self, ModalError> {
        Self::builder().build()
    }

    // --- Input ---

    /// Click `target`.
    pub fn click(&mut self, target: NodeId) -> EventOutcome {
        self.modal.handle(ModalEvent::click(target))
    }

    /// Press Tab.
    pub fn tab(&mut self) -> EventOutcome {
        self.modal.handle(ModalEvent::tab(false))
    }

    /// Press Shift+Tab.
    pub fn shift_tab(&mut self) -> EventOutcome {
        self.modal.handle(ModalEvent::tab(true))
    }

    /// Press Escape.
    pub fn escape(&mut self) -> EventOutcome {
        self.modal.handle(ModalEvent::escape())
    }

    /// Press an arbitrary key.
    pub fn key(&mut self, key: Key, shift: bool) -> EventOutcome {
        self.modal.handle(ModalEvent::KeyDown { key, shift })
    }

    // --- Time ---

    /// Run whatever is due without moving time (the host's "next tick").
    pub fn tick(&mut self) -> usize {
        self.modal.tick()
    }

    /// Move time forward by `ms`, firing every deadline on the way in order.
    /// Returns the number of deferred steps that ran.
    pub fn advance_ms(&mut self, ms: u64) -> usize {
        let target = self.clock.now().saturating_add(Duration::from_millis(ms));
        let mut ran = 0;
        while let Some(deadline) = self.modal.next_deadline().filter(|d| *d <= target) {
            self.clock.set(deadline);
            ran += self.modal.tick();
        }
        self.clock.set(target);
        ran
    }

    /// Advance until nothing is pending.
    pub fn settle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(deadline) = self.modal.next_deadline() {
            self.clock.set(deadline);
            ran += self.modal.tick();
        }
        ran
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.clock.now().as_millis()).unwrap_or(u64::MAX)
    }

    // --- Access ---

    pub fn modal(&self) -> &TestModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut TestModal {
        &mut self.modal
    }

    pub fn doc(&self) -> &FakeDocument {
        self.modal.dom()
    }

    pub fn doc_mut(&mut self) -> &mut FakeDocument {
        self.modal.dom_mut()
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    /// Whether `node` carries `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.doc().classes(node).contains(&class)
    }

    /// Panels currently carrying the shown class.
    pub fn shown_panels(&self) -> Vec<NodeId> {
        let shown = &self.modal.options().panel_shown_class;
        self.page
            .panels()
            .into_iter()
            .filter(|p| self.has_class(*p, shown))
            .collect()
    }
}
