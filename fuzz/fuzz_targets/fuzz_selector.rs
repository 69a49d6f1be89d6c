#![no_main]

//! Selector parsing never panics, and every panel selector the options
//! build for an arbitrary id matches exactly the element carrying that id.

use libfuzzer_sys::fuzz_target;
use modalkit_core::ModalOptions;
use modalkit_harness::selector::{Matchable, SelectorList};

struct Panel<'a> {
    attr: &'a str,
    id: &'a str,
}

impl Matchable for Panel<'_> {
    fn tag(&self) -> &str {
        "div"
    }

    fn attr(&self, name: &str) -> Option<&str> {
        (name == self.attr).then_some(self.id)
    }

    fn has_class(&self, _class: &str) -> bool {
        false
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let _ = SelectorList::parse(input);

    let options = ModalOptions::default();
    let selector = options.panel_selector(input);
    let list = SelectorList::parse(&selector).expect("panel selector parses");
    let attr = options.panel_attr.as_str();

    assert!(list.matches(&Panel { attr, id: input }));
    let other = format!("{input}x");
    assert!(!list.matches(&Panel { attr, id: &other }));
});
