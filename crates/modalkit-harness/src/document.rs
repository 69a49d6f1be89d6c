#![forbid(unsafe_code)]

//! In-memory element tree implementing [`Dom`].
//!
//! `FakeDocument` keeps just enough of a page for the controller: a tree of
//! elements with attributes, classes and inline styles, a focused element,
//! a vertical scroll offset and a viewport with a fixed-width scrollbar.
//! Every focus change and scroll is logged so tests can assert on the exact
//! sequence the controller produced.
//!
//! A scroll requested while `<html>` carries an inline
//! `scroll-behavior: smooth` is treated as still animating: it is logged but
//! the offset does not move.

use modalkit_core::Dom;

use crate::selector::{Matchable, SelectorList};

/// Handle to an element of a [`FakeDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Insertion-ordered string map. Elements hold a handful of attributes, so
/// a linear scan is fine.
#[derive(Debug, Clone, Default)]
struct OrderedMap {
    entries: Vec<(String, String)>,
}

impl OrderedMap {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => value.clone_into(v),
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: OrderedMap,
    classes: Vec<String>,
    styles: OrderedMap,
}

impl Element {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent,
            children: Vec::new(),
            attributes: OrderedMap::default(),
            classes: Vec::new(),
            styles: OrderedMap::default(),
        }
    }
}

impl Matchable for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// An in-memory page.
///
/// `NodeId(0)` is `<html>` and `NodeId(1)` is `<body>`.
#[derive(Debug, Clone)]
pub struct FakeDocument {
    elements: Vec<Element>,
    focused: Option<NodeId>,
    scroll_y: f64,
    viewport_width: f64,
    scrollbar_width: f64,
    focus_log: Vec<NodeId>,
    scroll_log: Vec<f64>,
    scroll_behavior_log: Vec<Option<String>>,
}

/// Default viewport width in CSS pixels.
pub const VIEWPORT_WIDTH: f64 = 1280.0;
/// Default width of the page's vertical scrollbar.
pub const SCROLLBAR_WIDTH: f64 = 15.0;

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocument {
    pub const ROOT: NodeId = NodeId(0);
    pub const BODY: NodeId = NodeId(1);

    /// An empty `<html><body></body></html>` page.
    #[must_use]
    pub fn new() -> Self {
        let mut root = Element::new("html", None);
        root.children.push(Self::BODY);
        let body = Element::new("body", Some(Self::ROOT));
        Self {
            elements: vec![root, body],
            focused: None,
            scroll_y: 0.0,
            viewport_width: VIEWPORT_WIDTH,
            scrollbar_width: SCROLLBAR_WIDTH,
            focus_log: Vec::new(),
            scroll_log: Vec::new(),
            scroll_behavior_log: Vec::new(),
        }
    }

    /// Append a child element with the given attributes. A `class`
    /// attribute is split into the class list.
    pub fn append(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = NodeId(self.elements.len());
        let mut el = Element::new(tag, Some(parent));
        for (name, value) in attrs {
            if *name == "class" {
                el.classes
                    .extend(value.split_whitespace().map(str::to_owned));
            } else {
                el.attributes.insert(name, value);
            }
        }
        self.elements.push(el);
        self.elements[parent.0].children.push(id);
        id
    }

    /// Tag name of `node`.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.elements[node.0].tag
    }

    /// Parent of `node`.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.elements[node.0].parent
    }

    /// The class list of `node`, in insertion order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.elements[node.0]
            .classes
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Inline style declarations of `node`, in the order they were set.
    #[must_use]
    pub fn styles(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.elements[node.0].styles.iter().collect()
    }

    /// Attributes of `node`, in the order they were set.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.elements[node.0].attributes.iter().collect()
    }

    /// The focused element, if any was focused explicitly.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Every element passed to [`Dom::focus`], in order.
    #[must_use]
    pub fn focus_log(&self) -> &[NodeId] {
        &self.focus_log
    }

    /// Every offset passed to [`Dom::scroll_to`], in order.
    #[must_use]
    pub fn scroll_log(&self) -> &[f64] {
        &self.scroll_log
    }

    /// The root's inline `scroll-behavior` at each [`Dom::scroll_to`].
    #[must_use]
    pub fn scroll_behavior_log(&self) -> &[Option<String>] {
        &self.scroll_behavior_log
    }

    /// Simulate the user scrolling (not logged).
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Simulate a page without a vertical scrollbar, or with a wider one.
    pub fn set_scrollbar_width(&mut self, width: f64) {
        self.scrollbar_width = width;
    }

    /// Simulate the user focusing an element (not logged).
    pub fn set_focused(&mut self, node: Option<NodeId>) {
        self.focused = node;
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.elements[scope.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn select(&self, candidates: Vec<NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(list) = SelectorList::parse(selector) else {
            tracing::warn!(selector, "unsupported selector; no matches");
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|id| list.matches(&self.elements[id.0]))
            .collect()
    }
}

impl Dom for FakeDocument {
    type Node = NodeId;

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let mut all = vec![Self::ROOT];
        self.descendants(Self::ROOT, &mut all);
        self.select(all, selector)
    }

    fn query_all_in(&self, scope: &NodeId, selector: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*scope, &mut all);
        self.select(all, selector)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        if name == "class" {
            let el = &self.elements[node.0];
            return (!el.classes.is_empty()).then(|| el.classes.join(" "));
        }
        self.elements[node.0].attributes.get(name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.elements[node.0].attributes.insert(name, value);
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        self.elements[node.0].attributes.remove(name);
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let classes = &mut self.elements[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.elements[node.0].classes.retain(|c| c != class);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        Matchable::has_class(&self.elements[node.0], class)
    }

    fn set_style_property(&mut self, node: &NodeId, property: &str, value: &str) {
        self.elements[node.0].styles.insert(property, value);
    }

    fn remove_style_property(&mut self, node: &NodeId, property: &str) {
        self.elements[node.0].styles.remove(property);
    }

    fn style_property(&self, node: &NodeId, property: &str) -> Option<String> {
        self.elements[node.0].styles.get(property).map(str::to_owned)
    }

    fn focus(&mut self, node: &NodeId) {
        self.focused = Some(*node);
        self.focus_log.push(*node);
    }

    fn active_element(&self) -> Option<NodeId> {
        Some(self.focused.unwrap_or(Self::BODY))
    }

    fn body(&self) -> NodeId {
        Self::BODY
    }

    fn root(&self) -> NodeId {
        Self::ROOT
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        let behavior = self.style_property(&Self::ROOT, "scroll-behavior");
        if behavior.as_deref() != Some("smooth") {
            self.scroll_y = y;
        }
        self.scroll_log.push(y);
        self.scroll_behavior_log.push(behavior);
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn offset_width(&self, _node: &NodeId) -> f64 {
        self.viewport_width - self.scrollbar_width
    }
}
