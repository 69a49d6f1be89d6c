#![forbid(unsafe_code)]

//! Integration tests: open/close cycle timing, classes and focus.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use modalkit_core::{Dom, EventOutcome, ModalError, ModalOverrides, ModalPhase};
use modalkit_harness::{Harness, TestHooks, init_tracing};
use pretty_assertions::assert_eq;

const OVERLAY_SHOW: &str = "overlay-show";
const BLOCK: &str = "block";
const SHOWN: &str = "window-show";
const DURATION: &str = "--transition-modal-time";

fn harness() -> Harness {
    init_tracing();
    Harness::new().unwrap()
}

// ============================================================================
// Open
// ============================================================================

#[test]
fn open_applies_classes_in_three_steps() {
    let mut h = harness();
    let p = h.page;

    assert_eq!(h.click(p.contact_trigger), EventOutcome::CONSUMED);

    // Synchronous part.
    assert!(h.has_class(p.overlay, OVERLAY_SHOW));
    assert!(h.has_class(p.contact, BLOCK));
    assert!(!h.has_class(p.contact, SHOWN));
    assert_eq!(h.modal().phase(), ModalPhase::Opening);
    assert!(!h.modal().is_open());

    // Next tick.
    assert_eq!(h.tick(), 1);
    assert!(h.has_class(p.contact, SHOWN));
    assert!(!h.modal().is_open());

    // Settled only at +300ms.
    h.advance_ms(299);
    assert!(!h.modal().is_open());
    h.advance_ms(1);
    assert!(h.modal().is_open());
    assert_eq!(h.modal().phase(), ModalPhase::Open);
}

#[test]
fn open_sets_duration_property_in_seconds() {
    let mut h = harness();
    let p = h.page;
    h.click(p.contact_trigger);
    assert_eq!(
        h.doc().style_property(&p.overlay, DURATION).as_deref(),
        Some("0.3s")
    );
}

#[test]
fn open_resolves_the_active_target() {
    let mut h = harness();
    let p = h.page;
    h.click(p.contact_trigger);

    let target = h.modal().active_target().unwrap();
    assert_eq!(target.id, "contact");
    assert_eq!(target.panel, p.contact);
    assert_eq!(target.close_button, Some(p.contact_close));
    assert_eq!(target.speed, Duration::from_millis(300));
    assert_eq!(h.modal().active_panel(), Some(&p.contact));
}

#[test]
fn per_trigger_speed_overrides_default() {
    let mut h = harness();
    let p = h.page;
    h.click(p.signup_trigger);

    assert_eq!(h.modal().speed(), Duration::from_millis(500));
    assert_eq!(
        h.doc().style_property(&p.overlay, DURATION).as_deref(),
        Some("0.5s")
    );
    h.advance_ms(499);
    assert!(!h.modal().is_open());
    h.advance_ms(1);
    assert!(h.modal().is_open());
}

#[test]
fn default_speed_override_applies_to_plain_triggers() {
    init_tracing();
    let mut h = Harness::builder()
        .overrides(ModalOverrides::new().default_speed(Duration::from_millis(120)))
        .build()
        .unwrap();
    let p = h.page;
    h.click(p.contact_trigger);
    h.advance_ms(120);
    assert!(h.modal().is_open());
    assert_eq!(
        h.doc().style_property(&p.overlay, DURATION).as_deref(),
        Some("0.12s")
    );
}

#[test]
fn unparsable_speed_falls_back_to_default() {
    init_tracing();
    let mut h = Harness::builder()
        .prepare(|doc, page| doc.set_attribute(&page.contact_trigger, "data-modal-speed", "fast"))
        .build()
        .unwrap();
    let p = h.page;
    h.click(p.contact_trigger);
    assert_eq!(h.modal().speed(), Duration::from_millis(300));
}

#[test]
fn speed_with_ms_suffix_is_accepted() {
    init_tracing();
    let mut h = Harness::builder()
        .prepare(|doc, page| doc.set_attribute(&page.contact_trigger, "data-modal-speed", "150ms"))
        .build()
        .unwrap();
    let p = h.page;
    h.click(p.contact_trigger);
    assert_eq!(h.modal().speed(), Duration::from_millis(150));
}

// ============================================================================
// Focus
// ============================================================================

#[test]
fn open_focuses_first_focusable_after_transition() {
    let mut h = harness();
    let p = h.page;
    h.click(p.contact_trigger);
    h.advance_ms(299);
    assert!(h.doc().focus_log().is_empty());
    h.advance_ms(1);
    assert_eq!(h.doc().focused(), Some(p.contact_input));
}

#[test]
fn focus_close_button_option() {
    init_tracing();
    let mut h = Harness::builder()
        .overrides(ModalOverrides::new().focus_close_button(true))
        .build()
        .unwrap();
    let p = h.page;
    h.click(p.contact_trigger);
    h.settle();
    assert_eq!(h.doc().focused(), Some(p.contact_close));
}

#[test]
fn close_restores_focus_to_previous_element() {
    let mut h = harness();
    let p = h.page;
    h.doc_mut().set_focused(Some(p.contact_trigger));

    h.click(p.contact_trigger);
    h.settle();
    assert_eq!(h.modal().restore_target(), Some(&p.contact_trigger));

    h.escape();
    h.advance_ms(299);
    assert_eq!(h.doc().focused(), Some(p.contact_input));
    h.advance_ms(1);
    assert_eq!(h.doc().focused(), Some(p.contact_trigger));
    assert_eq!(h.doc().focus_log(), &[p.contact_input, p.contact_trigger]);
}

// ============================================================================
// Close
// ============================================================================

fn open_contact(h: &mut Harness) {
    let p = h.page;
    h.click(p.contact_trigger);
    h.settle();
    assert!(h.modal().is_open());
}

fn assert_closes_fully(h: &mut Harness) {
    let p = h.page;
    assert_eq!(h.modal().phase(), ModalPhase::Closing);
    assert!(!h.has_class(p.overlay, OVERLAY_SHOW));
    assert!(!h.has_class(p.contact, SHOWN));
    assert!(h.has_class(p.contact, BLOCK));
    assert!(h.modal().is_open());

    h.advance_ms(300);
    assert!(!h.modal().is_open());
    assert_eq!(h.modal().phase(), ModalPhase::Closed);
    assert!(!h.has_class(p.contact, BLOCK));
    assert_eq!(h.doc().style_property(&p.overlay, DURATION), None);
    assert_eq!(h.modal().active_panel(), None);
    assert_eq!(h.modal().pending_timers(), 0);
}

#[test]
fn escape_closes() {
    let mut h = harness();
    open_contact(&mut h);
    assert_eq!(h.escape(), EventOutcome::CONSUMED);
    assert_closes_fully(&mut h);
}

#[test]
fn overlay_click_closes() {
    let mut h = harness();
    open_contact(&mut h);
    let p = h.page;
    assert_eq!(h.click(p.overlay), EventOutcome::CONSUMED);
    assert_closes_fully(&mut h);
}

#[test]
fn close_button_closes() {
    let mut h = harness();
    open_contact(&mut h);
    let p = h.page;
    assert_eq!(h.click(p.contact_close), EventOutcome::CONSUMED);
    assert_closes_fully(&mut h);
}

#[test]
fn clicks_inside_panel_are_ignored() {
    let mut h = harness();
    open_contact(&mut h);
    let p = h.page;
    assert_eq!(h.click(p.contact_input), EventOutcome::IGNORED);
    assert_eq!(h.click(p.contact), EventOutcome::IGNORED);
    // Another panel's close button is not the active one.
    assert_eq!(h.click(p.signup_close), EventOutcome::IGNORED);
    assert!(h.modal().is_open());
    assert_eq!(h.modal().phase(), ModalPhase::Open);
}

#[test]
fn closing_when_closed_is_ignored() {
    let mut h = harness();
    let p = h.page;
    assert_eq!(h.click(p.overlay), EventOutcome::IGNORED);
    assert_eq!(h.escape(), EventOutcome::IGNORED);
    assert_eq!(h.modal().pending_timers(), 0);
    assert_eq!(h.modal().busy_until(), None);
}

#[test]
fn same_trigger_while_open_is_ignored() {
    let mut h = harness();
    open_contact(&mut h);
    let p = h.page;
    assert_eq!(h.click(p.contact_trigger), EventOutcome::IGNORED);
    assert_eq!(h.modal().pending_timers(), 0);
    assert_eq!(h.modal().phase(), ModalPhase::Open);
}

// ============================================================================
// Hooks
// ============================================================================

#[test]
fn hooks_run_before_open_and_after_close() {
    init_tracing();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let open_log = Rc::clone(&log);
    let close_log = Rc::clone(&log);
    let hooks = TestHooks::new()
        .on_open(move |m| {
            let overlay_shown = m.dom().has_class(m.overlay(), OVERLAY_SHOW);
            let id = m.active_target().map(|t| t.id.clone()).unwrap_or_default();
            open_log
                .borrow_mut()
                .push(format!("open {id} open={} overlay={overlay_shown}", m.is_open()));
        })
        .on_close(move |m| {
            let id = m.active_target().map(|t| t.id.clone()).unwrap_or_default();
            close_log
                .borrow_mut()
                .push(format!("close {id} open={}", m.is_open()));
        });

    let mut h = Harness::builder().hooks(hooks).build().unwrap();
    let p = h.page;

    h.click(p.contact_trigger);
    assert_eq!(*log.borrow(), vec!["open contact open=false overlay=false"]);

    h.settle();
    h.escape();
    h.advance_ms(299);
    assert_eq!(log.borrow().len(), 1);
    h.advance_ms(1);
    assert_eq!(
        *log.borrow(),
        vec![
            "open contact open=false overlay=false",
            "close contact open=false"
        ]
    );
}

// ============================================================================
// Construction errors and bad triggers
// ============================================================================

#[test]
fn missing_overlay_is_a_construction_error() {
    init_tracing();
    let err = Harness::builder()
        .prepare(|doc, page| doc.remove_attribute(&page.overlay, "data-modal-overlay"))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ModalError::MissingOverlay {
            attribute: "data-modal-overlay".into()
        }
    );
}

#[test]
fn trigger_with_missing_panel_leaves_no_trace() {
    let mut h = harness();
    let p = h.page;
    let before = h.doc().clone();

    assert_eq!(h.click(p.broken_trigger), EventOutcome::IGNORED);

    assert_eq!(h.modal().phase(), ModalPhase::Closed);
    assert_eq!(h.modal().pending_timers(), 0);
    assert_eq!(h.modal().busy_until(), None);
    assert_eq!(h.modal().active_panel(), None);
    for node in [p.overlay, p.header, p.outside_link] {
        assert_eq!(h.doc().attributes(node), before.attributes(node));
        assert_eq!(h.doc().styles(node), before.styles(node));
        assert_eq!(h.doc().classes(node), before.classes(node));
    }
    assert!(h.doc().classes(modalkit_harness::FakeDocument::BODY).is_empty());

    // The controller is still usable right away.
    assert_eq!(h.click(p.contact_trigger), EventOutcome::CONSUMED);
}

#[test]
fn resolve_target_reports_errors() {
    let h = harness();
    let p = h.page;
    assert_eq!(
        h.modal().resolve_target(&p.broken_trigger),
        Err(ModalError::MissingPanel {
            id: "missing".into()
        })
    );
    assert_eq!(
        h.modal().resolve_target(&p.outside_link),
        Err(ModalError::MissingTargetAttribute {
            attribute: "data-modal".into()
        })
    );
}
