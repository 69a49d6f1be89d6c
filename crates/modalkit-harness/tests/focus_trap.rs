#![forbid(unsafe_code)]

//! Integration tests: Tab cycling inside the open panel and document
//! tabbability.

use modalkit_core::{Dom, EventOutcome, FOCUSABLE_SELECTOR, Key, TabIndexSnapshot};
use modalkit_harness::{FakeDocument, Harness, NodeId, Page, init_tracing};
use pretty_assertions::assert_eq;

fn open(trigger: fn(&Harness) -> modalkit_harness::NodeId) -> Harness {
    init_tracing();
    let mut h = Harness::new().unwrap();
    let t = trigger(&h);
    h.click(t);
    h.settle();
    assert!(h.modal().is_open());
    h
}

fn open_contact() -> Harness {
    open(|h| h.page.contact_trigger)
}

// ============================================================================
// Cycling
// ============================================================================

#[test]
fn tab_on_last_wraps_to_first() {
    let mut h = open_contact();
    let p = h.page;
    h.doc_mut().set_focused(Some(p.contact_close));
    assert_eq!(h.tab(), EventOutcome::CONSUMED);
    assert_eq!(h.doc().focused(), Some(p.contact_input));
}

#[test]
fn shift_tab_on_first_wraps_to_last() {
    let mut h = open_contact();
    let p = h.page;
    assert_eq!(h.doc().focused(), Some(p.contact_input));
    assert_eq!(h.shift_tab(), EventOutcome::CONSUMED);
    assert_eq!(h.doc().focused(), Some(p.contact_close));
}

#[test]
fn tab_in_the_middle_is_left_to_the_browser() {
    let mut h = open_contact();
    let p = h.page;
    h.doc_mut().set_focused(Some(p.contact_message));
    assert_eq!(h.tab(), EventOutcome::IGNORED);
    assert_eq!(h.shift_tab(), EventOutcome::IGNORED);
    assert_eq!(h.doc().focused(), Some(p.contact_message));
}

#[test]
fn focus_outside_is_pulled_back_in() {
    let mut h = open_contact();
    let p = h.page;
    h.doc_mut().set_focused(Some(p.outside_link));
    assert_eq!(h.tab(), EventOutcome::CONSUMED);
    assert_eq!(h.doc().focused(), Some(p.contact_input));

    h.doc_mut().set_focused(Some(p.outside_link));
    assert_eq!(h.shift_tab(), EventOutcome::CONSUMED);
    assert_eq!(h.doc().focused(), Some(p.contact_close));
}

#[test]
fn focus_never_leaves_panel_over_a_full_cycle() {
    let mut h = open_contact();
    let p = h.page;
    let ring = h.modal().panel_focusables().to_vec();
    assert_eq!(
        ring,
        vec![p.contact_input, p.contact_message, p.contact_submit, p.contact_close]
    );

    // Emulate the browser moving focus forward when the controller passes.
    for _ in 0..(ring.len() * 3) {
        let current = h.doc().focused().unwrap();
        if h.tab() == EventOutcome::IGNORED {
            let i = ring.iter().position(|n| *n == current).unwrap();
            h.doc_mut().set_focused(Some(ring[i + 1]));
        }
        assert!(ring.contains(&h.doc().focused().unwrap()));
    }
}

#[test]
fn keys_are_ignored_while_closed() {
    init_tracing();
    let mut h = Harness::new().unwrap();
    assert_eq!(h.tab(), EventOutcome::IGNORED);
    assert_eq!(h.shift_tab(), EventOutcome::IGNORED);
    assert!(h.doc().focus_log().is_empty());
}

#[test]
fn other_keys_are_ignored() {
    let mut h = open_contact();
    assert_eq!(h.key(Key::Other, false), EventOutcome::IGNORED);
    assert_eq!(h.key(Key::from_code("Enter"), true), EventOutcome::IGNORED);
    assert!(h.modal().is_open());
}

// ============================================================================
// Document tabbability
// ============================================================================

#[test]
fn document_is_untabbable_only_while_opening() {
    init_tracing();
    let mut h = Harness::new().unwrap();
    let p = h.page;
    h.click(p.contact_trigger);

    for node in [p.outside_link, p.contact_trigger, p.contact_input, p.signup_link] {
        assert_eq!(h.doc().attribute(&node, "tabindex").as_deref(), Some("-1"));
    }

    h.settle();
    for node in [p.outside_link, p.contact_trigger, p.contact_input, p.signup_link] {
        assert_eq!(h.doc().attribute(&node, "tabindex"), None);
    }
}

#[test]
fn empty_panel_disables_document_tabbing() {
    let mut h = open(|h| h.page.empty_trigger);
    let p = h.page;
    assert!(h.doc().focus_log().is_empty());

    let outcome = h.tab();
    assert_eq!(outcome, EventOutcome::HANDLED);
    assert!(!outcome.prevent_default);
    assert_eq!(
        h.doc().attribute(&p.outside_link, "tabindex").as_deref(),
        Some("-1")
    );

    h.click(p.overlay);
    h.settle();
    assert_eq!(h.doc().attribute(&p.outside_link, "tabindex"), None);
}

#[test]
fn authored_tabindex_survives_a_cycle() {
    init_tracing();
    let mut h = Harness::builder()
        .prepare(|doc, page| {
            doc.set_attribute(&page.outside_link, "tabindex", "3");
            doc.set_attribute(&page.contact_message, "tabindex", "0");
        })
        .build()
        .unwrap();
    let p = h.page;

    h.click(p.contact_trigger);
    assert_eq!(
        h.doc().attribute(&p.outside_link, "tabindex").as_deref(),
        Some("-1")
    );
    h.settle();
    h.escape();
    h.settle();

    assert_eq!(
        h.doc().attribute(&p.outside_link, "tabindex").as_deref(),
        Some("3")
    );
    assert_eq!(
        h.doc().attribute(&p.contact_message, "tabindex").as_deref(),
        Some("0")
    );
    assert_eq!(h.doc().attribute(&p.contact_input, "tabindex"), None);
}

#[test]
fn authored_tabindex_survives_switch_away_from_empty_panel() {
    init_tracing();
    let mut h = Harness::builder()
        .prepare(|doc, page| doc.set_attribute(&page.outside_link, "tabindex", "3"))
        .build()
        .unwrap();
    let p = h.page;

    h.click(p.empty_trigger);
    h.settle();
    h.tab();
    h.click(p.signup_trigger);
    h.settle();
    assert_eq!(h.modal().active_panel(), Some(&p.signup));
    h.escape();
    h.settle();

    assert_eq!(
        h.doc().attribute(&p.outside_link, "tabindex").as_deref(),
        Some("3")
    );
}

#[test]
fn snapshot_covers_every_document_focusable() {
    init_tracing();
    let (mut doc, page) = Page::build();
    doc.set_attribute(&page.signup_link, "tabindex", "2");
    let focusables = doc.query_all(FOCUSABLE_SELECTOR);

    let snapshot = TabIndexSnapshot::capture(&doc, focusables.clone());
    assert_eq!(snapshot.len(), focusables.len());
    assert!(!snapshot.is_empty());
    assert!(snapshot.contains(&page.outside_link));
    assert!(snapshot.contains(&page.contact_close));
    assert!(!snapshot.contains(&page.contact));
    assert!(!snapshot.contains(&FakeDocument::BODY));

    snapshot.disable(&mut doc);
    assert!(
        focusables
            .iter()
            .all(|n| doc.attribute(n, "tabindex").as_deref() == Some("-1"))
    );
    snapshot.restore(&mut doc);
    assert_eq!(doc.attribute(&page.signup_link, "tabindex").as_deref(), Some("2"));
    assert_eq!(doc.attribute(&page.outside_link, "tabindex"), None);

    assert!(TabIndexSnapshot::<NodeId>::default().is_empty());
}
