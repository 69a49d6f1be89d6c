#![forbid(unsafe_code)]

//! Integration tests: tearing a controller down mid-transition.

use modalkit_core::{Dom, EventOutcome, ModalPhase};
use modalkit_harness::{FakeDocument, Harness, init_tracing};
use pretty_assertions::assert_eq;

fn assert_pristine(h: &Harness) {
    let p = h.page;
    assert_eq!(h.modal().phase(), ModalPhase::Closed);
    assert!(!h.modal().is_open());
    assert_eq!(h.modal().pending_timers(), 0);
    assert_eq!(h.modal().next_deadline(), None);
    assert_eq!(h.modal().busy_until(), None);
    assert_eq!(h.modal().active_panel(), None);
    for panel in p.panels() {
        assert!(h.doc().classes(panel).is_empty());
    }
    assert!(h.doc().classes(p.overlay).is_empty());
    assert!(h.doc().styles(p.overlay).is_empty());
    assert!(h.doc().classes(FakeDocument::BODY).is_empty());
    assert!(h.doc().styles(FakeDocument::BODY).is_empty());
    assert!(h.doc().styles(FakeDocument::ROOT).is_empty());
    assert!(h.doc().styles(p.header).is_empty());
    assert_eq!(h.doc().attribute(&FakeDocument::BODY, "data-position"), None);
    assert_eq!(h.doc().attribute(&p.outside_link, "tabindex"), None);
}

#[test]
fn teardown_while_opening() {
    init_tracing();
    let mut h = Harness::new().unwrap();
    let p = h.page;
    h.doc_mut().set_scroll_y(90.0);
    h.doc_mut().set_focused(Some(p.contact_trigger));
    h.click(p.contact_trigger);
    h.advance_ms(100);

    h.modal_mut().teardown();
    assert_pristine(&h);
    assert_eq!(h.doc().scroll_y(), 90.0);
    assert_eq!(h.doc().focused(), Some(p.contact_trigger));

    // Nothing fires later.
    assert_eq!(h.advance_ms(1_000), 0);
    assert_pristine(&h);
}

#[test]
fn teardown_while_open_then_reuse() {
    init_tracing();
    let mut h = Harness::new().unwrap();
    let p = h.page;
    h.click(p.signup_trigger);
    h.settle();

    h.modal_mut().teardown();
    assert_pristine(&h);

    // Busy window is reset.
    assert_eq!(h.click(p.contact_trigger), EventOutcome::CONSUMED);
    h.settle();
    assert!(h.modal().is_open());
}

#[test]
fn teardown_when_idle_is_harmless() {
    init_tracing();
    let mut h = Harness::new().unwrap();
    h.modal_mut().teardown();
    assert_pristine(&h);
    assert!(h.doc().focus_log().is_empty());
    assert!(h.doc().scroll_log().is_empty());
}
