//! The JS-facing `ModalWindow` class.
//!
//! ```js
//! import init, { ModalWindow } from "modalkit_web";
//!
//! await init();
//! const modal = new ModalWindow("[data-modal]", {
//!   defaultSpeedMs: 400,
//!   onOpen: ({ target }) => console.log("opening", target),
//!   onClose: ({ isOpen }) => console.log("closed", isOpen),
//! });
//! ```
//!
//! The instance binds on `DOMContentLoaded` (or immediately when the
//! document is already parsed), listens for `click` and `keydown` on the
//! document, and keeps exactly one `setTimeout` armed for the controller's
//! next deadline.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::{Function, Object, Reflect};
use modalkit_core::{
    Clock, EventOutcome, Key, ModalController, ModalError, ModalEvent, ModalHooks, ModalOverrides,
    MonotonicClock,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent};

use crate::config::{CLOSE_HOOK_KEYS, OPEN_HOOK_KEYS, overrides_from_json};
use crate::dom::{WebDom, host_error};

type WebModal = ModalController<WebDom, MonotonicClock>;
type WebHooks = ModalHooks<WebDom, MonotonicClock>;
type Listener = Closure<dyn FnMut(Event)>;

fn js_error(err: &ModalError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Everything needed to bind once the document is ready.
struct Pending {
    selector: String,
    overrides: ModalOverrides,
    hooks: WebHooks,
}

#[derive(Default)]
struct Inner {
    modal: RefCell<Option<WebModal>>,
    pending: RefCell<Option<Pending>>,
    listeners: RefCell<Vec<(&'static str, Listener)>>,
    ready_listener: RefCell<Option<Listener>>,
    on_timeout: RefCell<Option<Closure<dyn FnMut()>>>,
    timeout: Cell<Option<i32>>,
    destroy_requested: Cell<bool>,
}

impl Inner {
    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    /// Build the controller and attach listeners.
    fn bind(this: &Rc<Self>) -> Result<(), ModalError> {
        let Some(Pending {
            selector,
            overrides,
            hooks,
        }) = this.pending.borrow_mut().take()
        else {
            return Ok(());
        };
        let dom = WebDom::new()?;
        let document = dom.document().clone();
        let modal = ModalController::new(dom, MonotonicClock::new(), &selector, overrides)?
            .with_hooks(hooks);
        *this.modal.borrow_mut() = Some(modal);

        let weak = Rc::downgrade(this);
        let click: Listener = Closure::new({
            let weak = weak.clone();
            move |event: Event| {
                let Some(inner) = weak.upgrade() else { return };
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok())
                else {
                    return;
                };
                let outcome = Self::dispatch(&inner, ModalEvent::click(target));
                if outcome.prevent_default {
                    event.prevent_default();
                }
            }
        });
        let keydown: Listener = Closure::new({
            let weak = weak.clone();
            move |event: Event| {
                let Some(inner) = weak.upgrade() else { return };
                let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = Key::from_code(&key_event.code());
                if key == Key::Other {
                    return;
                }
                let outcome = Self::dispatch(
                    &inner,
                    ModalEvent::KeyDown {
                        key,
                        shift: key_event.shift_key(),
                    },
                );
                if outcome.prevent_default {
                    event.prevent_default();
                }
            }
        });
        let tick: Closure<dyn FnMut()> = Closure::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.timeout.set(None);
                Self::run_timers(&inner);
            }
        });

        for (name, listener) in [("click", click), ("keydown", keydown)] {
            document
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .map_err(|err| host_error(&err))?;
            this.listeners.borrow_mut().push((name, listener));
        }
        *this.on_timeout.borrow_mut() = Some(tick);
        tracing::debug!(selector = %selector, "modal window bound");
        Ok(())
    }

    fn dispatch(this: &Rc<Self>, event: ModalEvent<Element>) -> EventOutcome {
        let outcome = match this.modal.try_borrow_mut() {
            Ok(mut slot) => slot
                .as_mut()
                .map_or(EventOutcome::IGNORED, |modal| modal.handle(event)),
            Err(_) => {
                tracing::warn!("event raised from inside a hook; ignored");
                EventOutcome::IGNORED
            }
        };
        Self::after_dispatch(this);
        outcome
    }

    fn run_timers(this: &Rc<Self>) {
        if let Ok(mut slot) = this.modal.try_borrow_mut()
            && let Some(modal) = slot.as_mut()
        {
            modal.tick();
        }
        Self::after_dispatch(this);
    }

    fn after_dispatch(this: &Rc<Self>) {
        if this.destroy_requested.get() {
            Self::teardown(this);
        } else {
            Self::rearm(this);
        }
    }

    /// Keep one timeout armed for the next deadline.
    fn rearm(this: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(handle) = this.timeout.take() {
            window.clear_timeout_with_handle(handle);
        }
        let Ok(slot) = this.modal.try_borrow() else {
            return;
        };
        let Some(modal) = slot.as_ref() else { return };
        let Some(deadline) = modal.next_deadline() else {
            return;
        };
        let remaining = deadline.saturating_sub(modal.clock().now());
        let delay = i32::try_from(remaining.as_micros().div_ceil(1_000)).unwrap_or(i32::MAX);

        let callback = this.on_timeout.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => this.timeout.set(Some(handle)),
            Err(err) => tracing::warn!(err = ?err, "setTimeout failed"),
        }
    }

    fn teardown(this: &Rc<Self>) {
        let Ok(mut slot) = this.modal.try_borrow_mut() else {
            // Inside a hook: finish once the controller is released.
            this.destroy_requested.set(true);
            return;
        };
        this.destroy_requested.set(false);
        if let Some(mut modal) = slot.take() {
            modal.teardown();
        }
        drop(slot);

        if let Some(window) = web_sys::window()
            && let Some(handle) = this.timeout.take()
        {
            window.clear_timeout_with_handle(handle);
        }
        // Closures stay owned by `Inner`; one of them may be running right now.
        if let Some(document) = Self::document() {
            for (name, listener) in this.listeners.borrow().iter() {
                let _ = document
                    .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
            }
            if let Some(listener) = this.ready_listener.borrow().as_ref() {
                let _ = document.remove_event_listener_with_callback(
                    "DOMContentLoaded",
                    listener.as_ref().unchecked_ref(),
                );
            }
        }
        this.pending.borrow_mut().take();
        tracing::debug!("modal window destroyed");
    }
}

/// Hook payload: `{ isOpen, id, target, speed }`.
fn hook_payload(modal: &WebModal) -> JsValue {
    let payload = Object::new();
    let target = modal.active_target();
    let id = target.map_or(JsValue::NULL, |t| JsValue::from_str(&t.id));
    let panel = target.map_or(JsValue::NULL, |t| t.panel.clone().into());
    let speed = modal.speed().as_secs_f64() * 1_000.0;
    let _ = Reflect::set(&payload, &"isOpen".into(), &JsValue::from_bool(modal.is_open()));
    let _ = Reflect::set(&payload, &"id".into(), &id);
    let _ = Reflect::set(&payload, &"target".into(), &panel);
    let _ = Reflect::set(&payload, &"speed".into(), &JsValue::from_f64(speed));
    payload.into()
}

fn call_hook(hook: &Function, modal: &WebModal) {
    if let Err(err) = hook.call1(&JsValue::NULL, &hook_payload(modal)) {
        tracing::warn!(err = ?err, "modal hook threw");
    }
}

fn read_hook(options: &JsValue, keys: &[&str]) -> Option<Function> {
    keys.iter().find_map(|key| {
        Reflect::get(options, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    })
}

fn read_options(options: &JsValue) -> Result<(ModalOverrides, WebHooks), ModalError> {
    if options.is_undefined() || options.is_null() {
        return Ok((ModalOverrides::default(), WebHooks::new()));
    }
    let json: String = js_sys::JSON::stringify(options)
        .map_err(|err| host_error(&err))?
        .into();
    let overrides = overrides_from_json(&json)?;

    let mut hooks = WebHooks::new();
    if let Some(hook) = read_hook(options, &OPEN_HOOK_KEYS) {
        hooks = hooks.on_open(move |modal| call_hook(&hook, modal));
    }
    if let Some(hook) = read_hook(options, &CLOSE_HOOK_KEYS) {
        hooks = hooks.on_close(move |modal| call_hook(&hook, modal));
    }
    Ok((overrides, hooks))
}

/// Modal window controller bound to the triggers matching a selector.
#[wasm_bindgen]
pub struct ModalWindow {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl ModalWindow {
    /// Create a controller for the triggers matching `selector`.
    ///
    /// Throws on malformed options, or (when the document is already
    /// parsed) when the page has no overlay.
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str, options: JsValue) -> Result<ModalWindow, JsValue> {
        let (overrides, hooks) = read_options(&options).map_err(|err| js_error(&err))?;
        let inner = Rc::new(Inner::default());
        *inner.pending.borrow_mut() = Some(Pending {
            selector: selector.to_owned(),
            overrides,
            hooks,
        });

        let document = Inner::document()
            .ok_or_else(|| js_error(&ModalError::Host("no document".into())))?;
        if document.ready_state() == "loading" {
            let weak: Weak<Inner> = Rc::downgrade(&inner);
            let ready: Listener = Closure::new(move |_: Event| {
                let Some(inner) = weak.upgrade() else { return };
                if let Err(err) = Inner::bind(&inner) {
                    tracing::error!(%err, "modal window not bound");
                }
            });
            document
                .add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())
                .map_err(|err| js_error(&host_error(&err)))?;
            *inner.ready_listener.borrow_mut() = Some(ready);
        } else {
            Inner::bind(&inner).map_err(|err| js_error(&err))?;
        }
        Ok(ModalWindow { inner })
    }

    /// Whether a panel is open (settled). `false` before binding.
    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner
            .modal
            .try_borrow()
            .ok()
            .and_then(|slot| slot.as_ref().map(WebModal::is_open))
            .unwrap_or(false)
    }

    /// Whether the controller has bound to the document.
    #[wasm_bindgen(js_name = isBound)]
    pub fn is_bound(&self) -> bool {
        self.inner
            .modal
            .try_borrow()
            .map(|slot| slot.is_some())
            .unwrap_or(true)
    }

    /// Milliseconds until the next pending transition step, if any.
    #[wasm_bindgen(js_name = nextDeadlineIn)]
    pub fn next_deadline_in(&self) -> Option<f64> {
        let slot = self.inner.modal.try_borrow().ok()?;
        let modal = slot.as_ref()?;
        let deadline = modal.next_deadline()?;
        let remaining: Duration = deadline.saturating_sub(modal.clock().now());
        Some(remaining.as_secs_f64() * 1_000.0)
    }

    /// Detach listeners, cancel pending steps and revert every page change.
    pub fn destroy(&self) {
        Inner::teardown(&self.inner);
    }
}

impl Drop for ModalWindow {
    fn drop(&mut self) {
        Inner::teardown(&self.inner);
    }
}
