#![forbid(unsafe_code)]

//! [`Dom`] over the live browser document.

use modalkit_core::{Dom, ModalError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, NodeList, Window};

/// The browser page as seen by the controller.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
    body: Element,
    root: Element,
}

/// Turn a thrown JS value into a [`ModalError::Host`].
pub(crate) fn host_error(err: &JsValue) -> ModalError {
    ModalError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl WebDom {
    /// Bind to the current window's document.
    ///
    /// # Errors
    ///
    /// [`ModalError::Host`] outside a window context or before `<body>`
    /// has been parsed.
    pub fn new() -> Result<Self, ModalError> {
        let window = web_sys::window().ok_or_else(|| ModalError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ModalError::Host("no document".into()))?;
        let body: Element = document
            .body()
            .ok_or_else(|| ModalError::Host("document has no <body>".into()))?
            .into();
        let root = document
            .document_element()
            .ok_or_else(|| ModalError::Host("document has no root element".into()))?;
        Ok(Self {
            window,
            document,
            body,
            root,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn style(node: &Element) -> Option<CssStyleDeclaration> {
        node.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }
}

fn elements(list: Result<NodeList, JsValue>, selector: &str) -> Vec<Element> {
    match list {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(err) => {
            tracing::warn!(selector, err = ?err, "selector rejected");
            Vec::new()
        }
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        elements(self.document.query_selector_all(selector), selector)
    }

    fn query_all_in(&self, scope: &Element, selector: &str) -> Vec<Element> {
        elements(scope.query_selector_all(selector), selector)
    }

    fn query_first(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_first_in(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            tracing::warn!(name, err = ?err, "set_attribute failed");
        }
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_style_property(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(style) = Self::style(node) {
            let _ = style.set_property(property, value);
        }
    }

    fn remove_style_property(&mut self, node: &Element, property: &str) {
        if let Some(style) = Self::style(node) {
            let _ = style.remove_property(property);
        }
    }

    fn style_property(&self, node: &Element, property: &str) -> Option<String> {
        Self::style(node)
            .and_then(|style| style.get_property_value(property).ok())
            .filter(|value| !value.is_empty())
    }

    fn focus(&mut self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.focus();
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn body(&self) -> Element {
        self.body.clone()
    }

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn offset_width(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map_or(0.0, |el| f64::from(el.offset_width()))
    }
}
