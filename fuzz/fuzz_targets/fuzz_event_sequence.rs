#![no_main]

//! Arbitrary interleavings of clicks, keys and time against the reference
//! page. After every step the page must be in a consistent state, and once
//! everything settles with the modal closed it must look untouched.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use modalkit_core::{Key, ModalPhase};
use modalkit_harness::{FakeDocument, Harness, NodeId};

#[derive(Debug, Arbitrary)]
enum Step {
    Click(u8),
    Tab,
    ShiftTab,
    Escape,
    OtherKey,
    Advance(u16),
    Settle,
}

/// Element count of the reference page, root and body included.
const PAGE_NODES: usize = 19;

fuzz_target!(|steps: Vec<Step>| {
    let Ok(mut h) = Harness::new() else {
        return;
    };
    let pristine_body = h.doc().classes(FakeDocument::BODY).len();

    for step in steps.into_iter().take(256) {
        match step {
            Step::Click(n) => {
                h.click(NodeId(usize::from(n) % PAGE_NODES));
            }
            Step::Tab => {
                h.tab();
            }
            Step::ShiftTab => {
                h.shift_tab();
            }
            Step::Escape => {
                h.escape();
            }
            Step::OtherKey => {
                h.key(Key::Other, false);
            }
            Step::Advance(ms) => {
                h.advance_ms(u64::from(ms));
            }
            Step::Settle => {
                h.settle();
            }
        }

        assert!(h.shown_panels().len() <= 1, "two panels shown");
        if h.modal().phase() == ModalPhase::Closed {
            assert!(!h.modal().is_open());
        }
    }

    h.settle();
    if h.modal().phase() == ModalPhase::Closed {
        let page = h.page;
        assert!(h.shown_panels().is_empty());
        assert!(!h.has_class(page.overlay, "overlay-show"));
        assert_eq!(h.doc().classes(FakeDocument::BODY).len(), pristine_body);
        assert_eq!(h.modal().pending_timers(), 0);
    }
});
