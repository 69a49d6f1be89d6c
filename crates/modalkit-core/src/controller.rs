#![forbid(unsafe_code)]

//! The modal controller state machine.
//!
//! ```text
//!            trigger                settle               close / Esc
//!  Closed ───────────▶ Opening ───────────▶ Open ───────────────▶ Closing
//!    ▲                    ▲                  │                       │
//!    │                    │ swap             │ other trigger         │ settle
//!    │                    └──── Reopening ◀──┘                       │
//!    └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step that has to wait for a CSS transition is a [`Deferred`] task in
//! the controller's [`TimerQueue`]. The host calls [`ModalController::tick`]
//! once [`ModalController::next_deadline`] has passed.
//!
//! # Invariants
//!
//! 1. At most one panel carries the shown class, and it is always the active
//!    one.
//! 2. [`ModalController::is_open`] flips to `true` only when the open
//!    transition settles and back to `false` only when the close transition
//!    settles.
//! 3. User actions (trigger, close button, overlay, Escape) inside the busy
//!    window of the previous action are dropped without side effects. A
//!    panel switch holds the window for both of its transitions.
//! 4. Timers due at or before an event's instant run before the event is
//!    handled, so an action arriving exactly when a transition settles sees
//!    the settled state.
//! 5. The shown class is added one tick after the block class, never in the
//!    same host turn.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Trigger names a missing panel | Click dropped, `warn` logged, no state change |
//! | Trigger speed unparsable | Default speed used, `warn` logged |
//! | Action during a transition | Dropped, `debug` logged |
//! | Hook re-enters the host binding | Host's concern; hooks get a shared borrow only |

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::busy::BusyGuard;
use crate::clock::{Clock, MonotonicClock};
use crate::dom::Dom;
use crate::error::ModalError;
use crate::event::{EventOutcome, Key, ModalEvent};
use crate::focus::{FOCUSABLE_SELECTOR, TabIndexSnapshot, TrapStep, trap_step};
use crate::options::{ModalOptions, ModalOverrides, parse_speed};
use crate::scroll::ScrollLock;
use crate::timer::TimerQueue;

/// Where the controller is in its open/close cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalPhase {
    /// No panel visible.
    #[default]
    Closed,
    /// A panel's open transition is running.
    Opening,
    /// A panel is open and settled.
    Open,
    /// The active panel's close transition is running.
    Closing,
    /// The active panel is hiding so another one can open.
    Reopening,
}

impl ModalPhase {
    /// Whether a transition is in flight.
    #[must_use]
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::Opening | Self::Closing | Self::Reopening)
    }
}

/// A trigger resolved against the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget<N> {
    /// Panel identifier read from the trigger.
    pub id: String,
    /// The panel element.
    pub panel: N,
    /// The panel's close button, if it has one.
    pub close_button: Option<N>,
    /// Transition duration for this trigger.
    pub speed: Duration,
}

/// Work deferred until a transition step completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred<N> {
    /// Add the shown class (one tick after the block class).
    ShowPanel { panel: N },
    /// Move focus into the panel.
    FocusPanel { node: N },
    /// The open transition finished.
    OpenSettled,
    /// Give focus back to the element focused before opening.
    RestoreFocus { node: N },
    /// The close transition finished.
    CloseSettled,
    /// The outgoing panel finished hiding; open the incoming one.
    SwapPanel { from: N, to: ResolvedTarget<N> },
}

type Hook<D, C> = Rc<dyn Fn(&ModalController<D, C>)>;

/// Caller callbacks invoked around the open/close cycle.
///
/// Hooks receive a shared borrow of the controller, so they can inspect it
/// ([`ModalController::active_target`], [`ModalController::is_open`]) but not
/// drive it.
pub struct ModalHooks<D: Dom, C: Clock> {
    before_open: Option<Hook<D, C>>,
    after_close: Option<Hook<D, C>>,
}

impl<D: Dom, C: Clock> Default for ModalHooks<D, C> {
    fn default() -> Self {
        Self {
            before_open: None,
            after_close: None,
        }
    }
}

impl<D: Dom, C: Clock> Clone for ModalHooks<D, C> {
    fn clone(&self) -> Self {
        Self {
            before_open: self.before_open.clone(),
            after_close: self.after_close.clone(),
        }
    }
}

impl<D: Dom, C: Clock> ModalHooks<D, C> {
    /// No hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` at the start of every open, before any side effect.
    #[must_use]
    pub fn on_open(mut self, hook: impl Fn(&ModalController<D, C>) + 'static) -> Self {
        self.before_open = Some(Rc::new(hook));
        self
    }

    /// Run `hook` once a close transition has fully settled.
    #[must_use]
    pub fn on_close(mut self, hook: impl Fn(&ModalController<D, C>) + 'static) -> Self {
        self.after_close = Some(Rc::new(hook));
        self
    }
}

/// Modal window controller bound to a set of triggers and one overlay.
pub struct ModalController<D: Dom, C: Clock = MonotonicClock> {
    dom: D,
    clock: C,
    options: ModalOptions,
    hooks: ModalHooks<D, C>,
    triggers: Vec<D::Node>,
    overlay: D::Node,
    phase: ModalPhase,
    open: bool,
    active: Option<ResolvedTarget<D::Node>>,
    speed: Duration,
    busy: BusyGuard,
    timers: TimerQueue<Deferred<D::Node>>,
    restore_focus: Option<D::Node>,
    panel_focusables: Vec<D::Node>,
    document_tabs: TabIndexSnapshot<D::Node>,
    scroll: Option<ScrollLock<D::Node>>,
}

impl<D: Dom, C: Clock> fmt::Debug for ModalController<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalController")
            .field("phase", &self.phase)
            .field("open", &self.open)
            .field("active", &self.active.as_ref().map(|t| t.id.as_str()))
            .field("speed", &self.speed)
            .field("triggers", &self.triggers.len())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

impl<D: Dom, C: Clock> ModalController<D, C> {
    /// Bind a controller to the triggers matching `selector`, merging
    /// `overrides` onto the default options.
    ///
    /// Triggers are queried once, here. Fails if the document has no overlay.
    pub fn new(
        dom: D,
        clock: C,
        selector: &str,
        overrides: ModalOverrides,
    ) -> Result<Self, ModalError> {
        Self::with_options(dom, clock, selector, ModalOptions::merged(overrides))
    }

    /// Bind a controller with fully resolved options.
    pub fn with_options(
        dom: D,
        clock: C,
        selector: &str,
        options: ModalOptions,
    ) -> Result<Self, ModalError> {
        let overlay = dom.query_first(&options.overlay_selector()).ok_or_else(|| {
            ModalError::MissingOverlay {
                attribute: options.overlay_attr.clone(),
            }
        })?;
        let triggers = dom.query_all(selector);
        tracing::debug!(selector, triggers = triggers.len(), "modal controller bound");

        Ok(Self {
            speed: options.default_speed,
            dom,
            clock,
            options,
            hooks: ModalHooks::default(),
            triggers,
            overlay,
            phase: ModalPhase::Closed,
            open: false,
            active: None,
            busy: BusyGuard::new(),
            timers: TimerQueue::new(),
            restore_focus: None,
            panel_focusables: Vec::new(),
            document_tabs: TabIndexSnapshot::default(),
            scroll: None,
        })
    }

    /// Install caller hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: ModalHooks<D, C>) -> Self {
        self.hooks = hooks;
        self
    }

    // --- Queries ---

    /// Whether a panel is open. Lags the visual state by the transition
    /// duration in both directions.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    /// The panel currently considered "the" modal window.
    pub fn active_panel(&self) -> Option<&D::Node> {
        self.active.as_ref().map(|t| &t.panel)
    }

    /// The resolved trigger target currently in use.
    pub fn active_target(&self) -> Option<&ResolvedTarget<D::Node>> {
        self.active.as_ref()
    }

    /// Transition duration of the current (or last) cycle.
    #[inline]
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// End of the current busy window, if one is active now.
    pub fn busy_until(&self) -> Option<Duration> {
        self.busy.busy_until(self.clock.now())
    }

    /// Earliest pending deadline; the host should call [`tick`](Self::tick)
    /// once it has passed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Number of deferred steps still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// The trigger elements bound at construction.
    pub fn triggers(&self) -> &[D::Node] {
        &self.triggers
    }

    /// The shared overlay element.
    pub fn overlay(&self) -> &D::Node {
        &self.overlay
    }

    /// Focusable elements of the active panel, in document order.
    pub fn panel_focusables(&self) -> &[D::Node] {
        &self.panel_focusables
    }

    /// Element that will get focus back when the panel closes.
    pub fn restore_target(&self) -> Option<&D::Node> {
        self.restore_focus.as_ref()
    }

    /// Resolved options.
    pub fn options(&self) -> &ModalOptions {
        &self.options
    }

    /// The document.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// The document, mutably.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // --- Entry points ---

    /// Feed a document event to the controller.
    pub fn handle(&mut self, event: ModalEvent<D::Node>) -> EventOutcome {
        let now = self.clock.now();
        self.run_due(now);
        match event {
            ModalEvent::Click { target } => self.on_click(&target, now),
            ModalEvent::KeyDown { key, shift } => self.on_key(key, shift, now),
        }
    }

    /// Run deferred steps that are due. Returns how many ran.
    ///
    /// Steps scheduled while this batch runs wait for the next call even if
    /// they are already due.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        self.run_due(now)
    }

    /// Cancel pending steps and revert every page change the controller made.
    pub fn teardown(&mut self) {
        let cancelled = self.timers.clear();
        if let Some(target) = self.active.take() {
            self.dom
                .remove_class(&target.panel, &self.options.panel_shown_class);
            self.dom
                .remove_class(&target.panel, &self.options.panel_block_class);
        }
        self.dom
            .remove_class(&self.overlay, &self.options.overlay_visible_class);
        self.dom
            .remove_style_property(&self.overlay, &self.options.duration_property);
        if let Some(lock) = self.scroll.take() {
            lock.release(&mut self.dom, &self.options);
        }
        std::mem::take(&mut self.document_tabs).restore(&mut self.dom);
        if let Some(node) = self.restore_focus.take() {
            self.dom.focus(&node);
        }
        self.panel_focusables.clear();
        self.open = false;
        self.phase = ModalPhase::Closed;
        self.busy.reset();
        tracing::debug!(cancelled, "modal controller torn down");
    }

    /// Resolve a trigger to its panel, close button and speed.
    ///
    /// # Errors
    ///
    /// [`ModalError::MissingTargetAttribute`] if the trigger names no panel,
    /// [`ModalError::MissingPanel`] if the named panel does not exist.
    pub fn resolve_target(
        &self,
        trigger: &D::Node,
    ) -> Result<ResolvedTarget<D::Node>, ModalError> {
        let opts = &self.options;
        let id = self.dom.attribute(trigger, &opts.trigger_attr).ok_or_else(|| {
            ModalError::MissingTargetAttribute {
                attribute: opts.trigger_attr.clone(),
            }
        })?;
        let panel = self
            .dom
            .query_first(&opts.panel_selector(&id))
            .ok_or_else(|| ModalError::MissingPanel { id: id.clone() })?;
        let close_button = self.dom.query_first_in(&panel, &opts.close_selector());
        let speed = match self.dom.attribute(trigger, &opts.speed_attr) {
            Some(raw) => parse_speed(&raw).unwrap_or_else(|err| {
                tracing::warn!(%err, panel = %id, "using default transition speed");
                opts.default_speed
            }),
            None => opts.default_speed,
        };

        Ok(ResolvedTarget {
            id,
            panel,
            close_button,
            speed,
        })
    }

    // --- Event routing ---

    fn on_click(&mut self, target: &D::Node, now: Duration) -> EventOutcome {
        if self.triggers.contains(target) {
            return self.on_trigger(target, now);
        }

        let close_button = self.active.as_ref().and_then(|t| t.close_button.as_ref());
        if *target == self.overlay || close_button == Some(target) {
            return self.request_close(now);
        }

        EventOutcome::IGNORED
    }

    fn on_trigger(&mut self, trigger: &D::Node, now: Duration) -> EventOutcome {
        let target = match self.resolve_target(trigger) {
            Ok(target) => target,
            Err(err) => {
                tracing::warn!(%err, "trigger ignored");
                return EventOutcome::IGNORED;
            }
        };

        match self.phase {
            ModalPhase::Closed => {
                if !self.busy.try_acquire(now, target.speed) {
                    tracing::debug!(panel = %target.id, "busy; trigger dropped");
                    return EventOutcome::IGNORED;
                }
                self.begin_open(target, now, true);
                EventOutcome::CONSUMED
            }
            ModalPhase::Open => {
                if self.active_panel() == Some(&target.panel) {
                    return EventOutcome::IGNORED;
                }
                if !self.busy.try_acquire(now, target.speed.saturating_mul(2)) {
                    tracing::debug!(panel = %target.id, "busy; switch dropped");
                    return EventOutcome::IGNORED;
                }
                self.begin_reopen(target, now);
                EventOutcome::CONSUMED
            }
            phase => {
                tracing::debug!(?phase, panel = %target.id, "transition in flight; trigger dropped");
                EventOutcome::IGNORED
            }
        }
    }

    fn on_key(&mut self, key: Key, shift: bool, now: Duration) -> EventOutcome {
        if !self.open {
            return EventOutcome::IGNORED;
        }
        match key {
            Key::Tab => self.trap_focus(shift),
            Key::Escape => self.request_close(now),
            Key::Other => EventOutcome::IGNORED,
        }
    }

    fn request_close(&mut self, now: Duration) -> EventOutcome {
        if self.phase != ModalPhase::Open {
            return EventOutcome::IGNORED;
        }
        if !self.busy.try_acquire(now, self.speed) {
            tracing::debug!("busy; close dropped");
            return EventOutcome::IGNORED;
        }
        self.begin_close(now);
        EventOutcome::CONSUMED
    }

    // --- Transitions ---

    fn begin_open(&mut self, target: ResolvedTarget<D::Node>, now: Duration, fresh: bool) {
        let speed = target.speed;
        let panel = target.panel.clone();
        tracing::debug!(panel = %target.id, speed_ms = speed.as_millis() as u64, fresh, "opening");

        self.phase = ModalPhase::Opening;
        self.speed = speed;
        self.active = Some(target);
        if let Some(hook) = self.hooks.before_open.clone() {
            hook(&*self);
        }

        if fresh {
            self.restore_focus = self.dom.active_element();
        }
        // An empty panel may have left the document disabled; capture the
        // authored values, not the -1s.
        std::mem::take(&mut self.document_tabs).restore(&mut self.dom);
        let document_focusables = self.dom.query_all(FOCUSABLE_SELECTOR);
        self.document_tabs = TabIndexSnapshot::capture(&self.dom, document_focusables);
        self.document_tabs.disable(&mut self.dom);

        self.panel_focusables = self.dom.query_all_in(&panel, FOCUSABLE_SELECTOR);
        let close_button = self
            .active
            .as_ref()
            .and_then(|t| t.close_button.clone())
            .filter(|_| self.options.focus_close_button);
        let focus_target = close_button.or_else(|| self.panel_focusables.first().cloned());

        if let Some(lock) = self.scroll.take() {
            lock.release(&mut self.dom, &self.options);
        }
        self.scroll = Some(ScrollLock::engage(&mut self.dom, &self.options));

        self.dom
            .add_class(&self.overlay, &self.options.overlay_visible_class);
        self.dom.set_style_property(
            &self.overlay,
            &self.options.duration_property,
            &format!("{}s", speed.as_secs_f64()),
        );
        self.dom.add_class(&panel, &self.options.panel_block_class);

        let settle = now.saturating_add(speed);
        self.timers.schedule(now, Deferred::ShowPanel { panel });
        if let Some(node) = focus_target {
            self.timers.schedule(settle, Deferred::FocusPanel { node });
        }
        self.timers.schedule(settle, Deferred::OpenSettled);
    }

    fn begin_close(&mut self, now: Duration) {
        let Some(panel) = self.active_panel().cloned() else {
            return;
        };
        tracing::debug!(panel = ?panel, "closing");

        self.phase = ModalPhase::Closing;
        let settle = now.saturating_add(self.speed);
        if let Some(node) = self.restore_focus.take() {
            self.timers.schedule(settle, Deferred::RestoreFocus { node });
        }
        self.dom
            .remove_class(&self.overlay, &self.options.overlay_visible_class);
        self.dom
            .remove_class(&panel, &self.options.panel_shown_class);
        self.timers.schedule(settle, Deferred::CloseSettled);
    }

    fn begin_reopen(&mut self, to: ResolvedTarget<D::Node>, now: Duration) {
        let Some(from) = self.active_panel().cloned() else {
            return;
        };
        tracing::debug!(to = %to.id, "switching panel");

        self.phase = ModalPhase::Reopening;
        self.speed = to.speed;
        self.dom
            .remove_class(&from, &self.options.panel_shown_class);
        let at = now.saturating_add(to.speed);
        self.timers.schedule(at, Deferred::SwapPanel { from, to });
    }

    fn trap_focus(&mut self, shift: bool) -> EventOutcome {
        let focused = self
            .dom
            .active_element()
            .and_then(|el| self.panel_focusables.iter().position(|n| *n == el));

        match trap_step(self.panel_focusables.len(), focused, shift) {
            TrapStep::PassThrough => EventOutcome::IGNORED,
            TrapStep::MoveTo(index) => {
                let node = self.panel_focusables[index].clone();
                tracing::trace!(index, shift, "focus wrapped");
                self.dom.focus(&node);
                EventOutcome::CONSUMED
            }
            TrapStep::DisableDocument => {
                self.document_tabs.disable(&mut self.dom);
                EventOutcome::HANDLED
            }
        }
    }

    // --- Deferred steps ---

    fn run_due(&mut self, now: Duration) -> usize {
        let batch = self.timers.drain_due(now);
        let ran = batch.len();
        for (id, at, task) in batch {
            tracing::trace!(timer = id.id(), at_ms = at.as_millis() as u64, ?task, "deferred step");
            self.run_deferred(task, at);
        }
        ran
    }

    fn run_deferred(&mut self, task: Deferred<D::Node>, at: Duration) {
        match task {
            Deferred::ShowPanel { panel } => {
                self.dom.add_class(&panel, &self.options.panel_shown_class);
            }
            Deferred::FocusPanel { node } | Deferred::RestoreFocus { node } => {
                self.dom.focus(&node);
            }
            Deferred::OpenSettled => {
                self.phase = ModalPhase::Open;
                self.open = true;
                self.document_tabs.restore(&mut self.dom);
                tracing::debug!("open settled");
            }
            Deferred::CloseSettled => {
                if let Some(panel) = self.active_panel().cloned() {
                    self.dom
                        .remove_class(&panel, &self.options.panel_block_class);
                }
                self.dom
                    .remove_style_property(&self.overlay, &self.options.duration_property);
                if let Some(lock) = self.scroll.take() {
                    lock.release(&mut self.dom, &self.options);
                }
                self.open = false;
                self.phase = ModalPhase::Closed;
                std::mem::take(&mut self.document_tabs).restore(&mut self.dom);
                self.panel_focusables.clear();
                tracing::debug!("close settled");

                if let Some(hook) = self.hooks.after_close.clone() {
                    hook(&*self);
                }
                self.active = None;
            }
            Deferred::SwapPanel { from, to } => {
                if let Some(lock) = self.scroll.take() {
                    lock.release(&mut self.dom, &self.options);
                }
                self.dom
                    .remove_class(&from, &self.options.panel_block_class);
                self.begin_open(to, at, false);
            }
        }
    }
}
