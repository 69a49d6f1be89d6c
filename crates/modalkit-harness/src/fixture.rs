#![forbid(unsafe_code)]

//! A reference page exercising every markup hook the controller reads.
//!
//! ```text
//! body
//! ├── header[data-modal-fix]
//! │   └── a[href]                         outside_link
//! ├── button[data-modal=contact]          contact_trigger
//! ├── button[data-modal=signup][data-modal-speed=500]   signup_trigger
//! ├── button[data-modal=missing]          broken_trigger
//! ├── button[data-modal=empty]            empty_trigger
//! └── div[data-modal-overlay]             overlay
//!     ├── div[data-modal-target=contact]  contact
//!     │   ├── input                       contact_input
//!     │   ├── textarea                    contact_message
//!     │   ├── button                      contact_submit
//!     │   └── button[data-modal-close]    contact_close
//!     ├── div[data-modal-target=signup]   signup
//!     │   ├── button[data-modal-close]    signup_close
//!     │   └── a[href]                     signup_link
//!     └── div[data-modal-target=empty]    empty
//!         └── p
//! ```

use crate::document::{FakeDocument, NodeId};

/// Selector the fixture's triggers answer to.
pub const TRIGGER_SELECTOR: &str = "[data-modal]";

/// Named handles into the reference page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub header: NodeId,
    pub outside_link: NodeId,
    pub contact_trigger: NodeId,
    pub signup_trigger: NodeId,
    pub broken_trigger: NodeId,
    pub empty_trigger: NodeId,
    pub overlay: NodeId,
    pub contact: NodeId,
    pub contact_close: NodeId,
    pub contact_input: NodeId,
    pub contact_message: NodeId,
    pub contact_submit: NodeId,
    pub signup: NodeId,
    pub signup_close: NodeId,
    pub signup_link: NodeId,
    pub empty: NodeId,
}

impl Page {
    /// Build the reference page.
    #[must_use]
    pub fn build() -> (FakeDocument, Self) {
        let mut doc = FakeDocument::new();
        let body = FakeDocument::BODY;

        let header = doc.append(body, "header", &[("data-modal-fix", "")]);
        let outside_link = doc.append(header, "a", &[("href", "#top")]);

        let contact_trigger = doc.append(body, "button", &[("data-modal", "contact")]);
        let signup_trigger = doc.append(
            body,
            "button",
            &[("data-modal", "signup"), ("data-modal-speed", "500")],
        );
        let broken_trigger = doc.append(body, "button", &[("data-modal", "missing")]);
        let empty_trigger = doc.append(body, "button", &[("data-modal", "empty")]);

        let overlay = doc.append(body, "div", &[("data-modal-overlay", "")]);

        let contact = doc.append(overlay, "div", &[("data-modal-target", "contact")]);
        let contact_input = doc.append(contact, "input", &[("name", "email")]);
        let contact_message = doc.append(contact, "textarea", &[]);
        let contact_submit = doc.append(contact, "button", &[("type", "submit")]);
        let contact_close = doc.append(contact, "button", &[("data-modal-close", "")]);

        let signup = doc.append(overlay, "div", &[("data-modal-target", "signup")]);
        let signup_close = doc.append(signup, "button", &[("data-modal-close", "")]);
        let signup_link = doc.append(signup, "a", &[("href", "/terms")]);

        let empty = doc.append(overlay, "div", &[("data-modal-target", "empty")]);
        doc.append(empty, "p", &[]);

        let page = Self {
            header,
            outside_link,
            contact_trigger,
            signup_trigger,
            broken_trigger,
            empty_trigger,
            overlay,
            contact,
            contact_close,
            contact_input,
            contact_message,
            contact_submit,
            signup,
            signup_close,
            signup_link,
            empty,
        };
        (doc, page)
    }

    /// Every panel on the page.
    #[must_use]
    pub fn panels(&self) -> [NodeId; 3] {
        [self.contact, self.signup, self.empty]
    }

    /// The triggers that name an existing panel.
    #[must_use]
    pub fn valid_triggers(&self) -> [NodeId; 3] {
        [self.contact_trigger, self.signup_trigger, self.empty_trigger]
    }
}
