//! DOM document model
//!
//! An arena-backed document tree carrying exactly the platform surface the
//! cross-root pipeline consumes: elements with attributes, text nodes, open
//! and closed shadow roots with adopted-stylesheet lists, a mutation record
//! log, and selector matching for elements (via the selectors crate).
//!
//! Node identity is a [`NodeId`] index into the document arena. Side tables
//! keyed by `NodeId` (the session's baseline table, the tracked-host set) are
//! therefore non-owning: they cannot keep a node alive or be kept alive by
//! one.

use std::rc::Rc;

use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{QuirksMode, SelectorCaches};
use selectors::matching::{
  matches_selector, MatchingContext, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags,
};
use selectors::{Element, OpaqueElement};

use crate::css::selectors::{CssString, HalflightSelectorImpl, PseudoClass, PseudoElement};
use crate::css::StyleSheet;
use crate::error::{Error, Result};

/// Shared handle to a stylesheet, as held by adopted-stylesheet lists.
///
/// Single-threaded by design; the whole pipeline runs on one thread the way
/// a page script does.
pub type SheetHandle = Rc<StyleSheet>;

/// Boolean attribute marking a shadow host's subtree as opted out of
/// cross-root propagation.
pub const DARKENED_ATTRIBUTE: &str = "darkened";

/// Boolean attribute excluding a stylesheet owner node from scanning.
pub const NO_HALF_LIGHT_ATTRIBUTE: &str = "no-half-light";

/// Index of a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowRootMode {
  Open,
  Closed,
}

/// Payload of a document node.
#[derive(Debug, Clone)]
pub enum NodeData {
  /// The document itself; the arena root.
  Document,
  Element {
    tag_name: String,
    attributes: Vec<(String, String)>,
    /// Property-form of the darkened marker (`host.darkened = true` in a
    /// page script); equivalent to the `darkened` attribute.
    darkened: bool,
  },
  ShadowRoot {
    mode: ShadowRootMode,
    adopted_stylesheets: Vec<SheetHandle>,
  },
  Text {
    content: String,
  },
}

#[derive(Debug, Clone)]
struct Node {
  parent: Option<NodeId>,
  children: Vec<NodeId>,
  data: NodeData,
}

/// What kind of change a mutation record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
  ChildList,
  Attributes,
  CharacterData,
}

/// A recorded DOM mutation, delivered in batches via
/// [`Document::take_mutations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRecord {
  pub target: NodeId,
  pub kind: MutationKind,
}

/// A document stylesheet together with its owner node.
#[derive(Debug, Clone)]
pub struct DocumentStylesheet {
  /// The `<style>` element the sheet belongs to
  pub owner: NodeId,
  pub sheet: StyleSheet,
}

/// An arena-backed DOM document.
#[derive(Debug, Clone)]
pub struct Document {
  nodes: Vec<Node>,
  root: NodeId,
  mutations: Vec<MutationRecord>,
}

impl Default for Document {
  fn default() -> Self {
    Self::new()
  }
}

impl Document {
  /// Creates a document with the usual `html > head + body` scaffold.
  pub fn new() -> Self {
    let mut doc = Document {
      nodes: Vec::new(),
      root: NodeId(0),
      mutations: Vec::new(),
    };
    let root = doc.push_node(None, NodeData::Document);
    doc.root = root;
    let html = doc.create_element("html");
    let head = doc.create_element("head");
    let body = doc.create_element("body");
    doc.adopt(root, html);
    doc.adopt(html, head);
    doc.adopt(html, body);
    doc.mutations.clear();
    doc
  }

  fn push_node(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(Node {
      parent,
      children: Vec::new(),
      data,
    });
    id
  }

  fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.0]
  }

  fn node_mut(&mut self, id: NodeId) -> &mut Node {
    &mut self.nodes[id.0]
  }

  fn record(&mut self, target: NodeId, kind: MutationKind) {
    self.mutations.push(MutationRecord { target, kind });
  }

  // --------------------------------------------------------------------------
  // Tree structure
  // --------------------------------------------------------------------------

  /// The root `<html>` element.
  pub fn document_element(&self) -> NodeId {
    self.node(self.root).children[0]
  }

  /// The `<head>` element, the document's style-bearing region.
  pub fn head(&self) -> Option<NodeId> {
    self.child_with_tag(self.document_element(), "head")
  }

  /// The `<body>` element.
  pub fn body(&self) -> Option<NodeId> {
    self.child_with_tag(self.document_element(), "body")
  }

  fn child_with_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
    self
      .node(parent)
      .children
      .iter()
      .copied()
      .find(|&child| self.tag_name(child).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
  }

  pub fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.node(node).parent
  }

  pub fn children(&self, node: NodeId) -> &[NodeId] {
    &self.node(node).children
  }

  pub fn data(&self, node: NodeId) -> &NodeData {
    &self.node(node).data
  }

  pub fn is_element(&self, node: NodeId) -> bool {
    matches!(self.node(node).data, NodeData::Element { .. })
  }

  pub fn is_shadow_root(&self, node: NodeId) -> bool {
    matches!(self.node(node).data, NodeData::ShadowRoot { .. })
  }

  pub fn is_document_node(&self, node: NodeId) -> bool {
    matches!(self.node(node).data, NodeData::Document)
  }

  pub fn tag_name(&self, node: NodeId) -> Option<&str> {
    match &self.node(node).data {
      NodeData::Element { tag_name, .. } => Some(tag_name),
      _ => None,
    }
  }

  /// True when `node` is `ancestor` or lies under it in this tree.
  pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
      if id == ancestor {
        return true;
      }
      current = self.parent(id);
    }
    false
  }

  // --------------------------------------------------------------------------
  // Construction and mutation
  // --------------------------------------------------------------------------

  /// Creates a detached element.
  pub fn create_element(&mut self, tag_name: &str) -> NodeId {
    self.push_node(
      None,
      NodeData::Element {
        tag_name: tag_name.to_string(),
        attributes: Vec::new(),
        darkened: false,
      },
    )
  }

  /// Creates a detached text node.
  pub fn create_text(&mut self, content: &str) -> NodeId {
    self.push_node(
      None,
      NodeData::Text {
        content: content.to_string(),
      },
    )
  }

  fn adopt(&mut self, parent: NodeId, child: NodeId) {
    self.node_mut(child).parent = Some(parent);
    self.node_mut(parent).children.push(child);
  }

  /// Appends `child` to `parent`, detaching it from any previous parent.
  ///
  /// Emits child-list mutation records on the old parent (if any) and the
  /// new one.
  pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
    if let Some(old_parent) = self.node(child).parent {
      self.node_mut(old_parent).children.retain(|&c| c != child);
      self.record(old_parent, MutationKind::ChildList);
    }
    self.adopt(parent, child);
    self.record(parent, MutationKind::ChildList);
  }

  /// Detaches `node` from its parent, if it has one.
  pub fn remove_node(&mut self, node: NodeId) {
    if let Some(parent) = self.node(node).parent {
      self.node_mut(parent).children.retain(|&c| c != node);
      self.node_mut(node).parent = None;
      self.record(parent, MutationKind::ChildList);
    }
  }

  /// Replaces a text node's content.
  pub fn set_text(&mut self, node: NodeId, content: &str) {
    let changed = match &mut self.node_mut(node).data {
      NodeData::Text { content: existing } => {
        *existing = content.to_string();
        true
      }
      _ => false,
    };
    if changed {
      self.record(node, MutationKind::CharacterData);
    }
  }

  pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
    match &self.node(node).data {
      NodeData::Element { attributes, .. } => attributes
        .iter()
        .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str()),
      _ => None,
    }
  }

  pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
    self.attribute(node, name).is_some()
  }

  pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
    let changed = match &mut self.node_mut(node).data {
      NodeData::Element { attributes, .. } => {
        match attributes.iter_mut().find(|(attr, _)| attr.eq_ignore_ascii_case(name)) {
          Some((_, existing)) => *existing = value.to_string(),
          None => attributes.push((name.to_string(), value.to_string())),
        }
        true
      }
      _ => false,
    };
    if changed {
      self.record(node, MutationKind::Attributes);
    }
  }

  pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
    let changed = match &mut self.node_mut(node).data {
      NodeData::Element { attributes, .. } => {
        let before = attributes.len();
        attributes.retain(|(attr, _)| !attr.eq_ignore_ascii_case(name));
        attributes.len() != before
      }
      _ => false,
    };
    if changed {
      self.record(node, MutationKind::Attributes);
    }
  }

  /// Sets the property form of the darkened marker on an element.
  pub fn set_darkened(&mut self, node: NodeId, value: bool) {
    if let NodeData::Element { darkened, .. } = &mut self.node_mut(node).data {
      *darkened = value;
    }
  }

  /// True when the element carries the darkened marker, in either its
  /// attribute or property form.
  pub fn is_marked_darkened(&self, node: NodeId) -> bool {
    match &self.node(node).data {
      NodeData::Element { darkened, .. } => {
        *darkened || self.has_attribute(node, DARKENED_ATTRIBUTE)
      }
      _ => false,
    }
  }

  /// Drains the pending mutation record batch.
  pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
    std::mem::take(&mut self.mutations)
  }

  // --------------------------------------------------------------------------
  // Shadow roots and adopted stylesheets
  // --------------------------------------------------------------------------

  /// Attaches a shadow root to `host`.
  ///
  /// This is the document's native capability; the session decorates it with
  /// the propagation hook. Fails on non-elements and on hosts that already
  /// have a shadow root.
  pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> Result<NodeId> {
    if !self.is_element(host) {
      return Err(Error::NotAnElement);
    }
    if self.shadow_root(host).is_some() {
      return Err(Error::ShadowRootExists);
    }
    let root = self.push_node(
      None,
      NodeData::ShadowRoot {
        mode,
        adopted_stylesheets: Vec::new(),
      },
    );
    // The shadow root sits before any light children of the host.
    self.node_mut(root).parent = Some(host);
    self.node_mut(host).children.insert(0, root);
    Ok(root)
  }

  /// The shadow root attached to `host`, regardless of mode.
  pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
    self
      .node(host)
      .children
      .iter()
      .copied()
      .find(|&child| self.is_shadow_root(child))
  }

  pub fn shadow_mode(&self, root: NodeId) -> Option<ShadowRootMode> {
    match &self.node(root).data {
      NodeData::ShadowRoot { mode, .. } => Some(*mode),
      _ => None,
    }
  }

  /// The host element of a shadow root.
  pub fn shadow_host(&self, root: NodeId) -> Option<NodeId> {
    if self.is_shadow_root(root) {
      self.parent(root)
    } else {
      None
    }
  }

  pub fn adopted_stylesheets(&self, root: NodeId) -> &[SheetHandle] {
    match &self.node(root).data {
      NodeData::ShadowRoot {
        adopted_stylesheets, ..
      } => adopted_stylesheets,
      _ => &[],
    }
  }

  pub fn set_adopted_stylesheets(&mut self, root: NodeId, sheets: Vec<SheetHandle>) {
    if let NodeData::ShadowRoot {
      adopted_stylesheets, ..
    } = &mut self.node_mut(root).data
    {
      *adopted_stylesheets = sheets;
    }
  }

  pub fn push_adopted_stylesheet(&mut self, root: NodeId, sheet: SheetHandle) {
    if let NodeData::ShadowRoot {
      adopted_stylesheets, ..
    } = &mut self.node_mut(root).data
    {
      adopted_stylesheets.push(sheet);
    }
  }

  // --------------------------------------------------------------------------
  // Stylesheets
  // --------------------------------------------------------------------------

  /// Convenience for building pages: appends a `<style>` element holding
  /// `css` to `parent` and returns the style element.
  pub fn append_style(&mut self, parent: NodeId, css: &str) -> NodeId {
    let style = self.create_element("style");
    let text = self.create_text(css);
    self.append_child(style, text);
    self.append_child(parent, style);
    style
  }

  /// The concatenated text content of a `<style>` element.
  pub fn style_text(&self, style: NodeId) -> String {
    let mut out = String::new();
    for &child in &self.node(style).children {
      if let NodeData::Text { content } = &self.node(child).data {
        out.push_str(content);
        out.push('\n');
      }
    }
    out
  }

  /// All document stylesheets in tree order, light DOM only.
  ///
  /// Mirrors `document.styleSheets`: shadow subtrees do not contribute.
  pub fn document_stylesheets(&self) -> Vec<DocumentStylesheet> {
    let mut sheets = Vec::new();
    let mut stack = vec![self.root];
    while let Some(node) = stack.pop() {
      if self.is_shadow_root(node) {
        continue;
      }
      if self.tag_name(node).is_some_and(|t| t.eq_ignore_ascii_case("style")) {
        sheets.push(DocumentStylesheet {
          owner: node,
          sheet: StyleSheet::parse(&self.style_text(node)),
        });
      }
      for &child in self.node(node).children.iter().rev() {
        stack.push(child);
      }
    }
    sheets
  }

  // --------------------------------------------------------------------------
  // Selector matching
  // --------------------------------------------------------------------------

  /// Whether `node` matches `selector`, as `Element.matches` would report.
  ///
  /// Selectors containing a pseudo-element never match (they select boxes,
  /// not elements). Fails only when the selector string does not parse.
  pub fn element_matches(&self, node: NodeId, selector: &str) -> Result<bool> {
    if !self.is_element(node) {
      return Ok(false);
    }
    let selector_list = crate::css::parse_selector_list(selector)?;

    let element = ElementRef { doc: self, id: node };
    let mut caches = SelectorCaches::default();
    let mut context = MatchingContext::new(
      MatchingMode::Normal,
      None,
      &mut caches,
      QuirksMode::NoQuirks,
      NeedsSelectorFlags::No,
      MatchingForInvalidation::No,
    );

    Ok(
      selector_list
        .slice()
        .iter()
        .filter(|sel| sel.pseudo_element().is_none())
        .any(|sel| matches_selector(sel, 0, None, &element, &mut context)),
    )
  }
}

// ============================================================================
// selectors crate integration
// ============================================================================

/// Borrowed view of an element for selector matching.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
  doc: &'a Document,
  id: NodeId,
}

impl<'a> ElementRef<'a> {
  pub fn new(doc: &'a Document, id: NodeId) -> Self {
    Self { doc, id }
  }

  fn wrap(&self, id: NodeId) -> Self {
    Self { doc: self.doc, id }
  }

  fn sibling_elements(&self) -> Option<(&'a [NodeId], usize)> {
    let parent = self.doc.parent(self.id)?;
    let children = self.doc.children(parent);
    let index = children.iter().position(|&c| c == self.id)?;
    Some((children, index))
  }
}

impl<'a> Element for ElementRef<'a> {
  type Impl = HalflightSelectorImpl;

  fn opaque(&self) -> OpaqueElement {
    OpaqueElement::new(self.doc.node(self.id))
  }

  fn parent_element(&self) -> Option<Self> {
    let parent = self.doc.parent(self.id)?;
    if self.doc.is_element(parent) {
      Some(self.wrap(parent))
    } else {
      None
    }
  }

  fn parent_node_is_shadow_root(&self) -> bool {
    self
      .doc
      .parent(self.id)
      .is_some_and(|p| self.doc.is_shadow_root(p))
  }

  fn containing_shadow_host(&self) -> Option<Self> {
    let mut current = self.doc.parent(self.id);
    while let Some(node) = current {
      if self.doc.is_shadow_root(node) {
        return self.doc.shadow_host(node).map(|host| self.wrap(host));
      }
      current = self.doc.parent(node);
    }
    None
  }

  fn is_pseudo_element(&self) -> bool {
    false
  }

  fn prev_sibling_element(&self) -> Option<Self> {
    let (children, index) = self.sibling_elements()?;
    children[..index]
      .iter()
      .rev()
      .copied()
      .find(|&c| self.doc.is_element(c))
      .map(|c| self.wrap(c))
  }

  fn next_sibling_element(&self) -> Option<Self> {
    let (children, index) = self.sibling_elements()?;
    children[index + 1..]
      .iter()
      .copied()
      .find(|&c| self.doc.is_element(c))
      .map(|c| self.wrap(c))
  }

  fn first_element_child(&self) -> Option<Self> {
    self
      .doc
      .children(self.id)
      .iter()
      .copied()
      .find(|&c| self.doc.is_element(c))
      .map(|c| self.wrap(c))
  }

  fn is_html_element_in_html_document(&self) -> bool {
    true
  }

  fn has_local_name(&self, local_name: &str) -> bool {
    self
      .doc
      .tag_name(self.id)
      .is_some_and(|tag| tag.eq_ignore_ascii_case(local_name))
  }

  fn has_namespace(&self, _ns: &str) -> bool {
    // The document model is HTML-only.
    true
  }

  fn is_same_type(&self, other: &Self) -> bool {
    match (self.doc.tag_name(self.id), other.doc.tag_name(other.id)) {
      (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
      _ => false,
    }
  }

  fn attr_matches(
    &self,
    ns: &NamespaceConstraint<&CssString>,
    local_name: &CssString,
    operation: &AttrSelectorOperation<&CssString>,
  ) -> bool {
    if let NamespaceConstraint::Specific(url) = ns {
      if !url.as_str().is_empty() {
        return false;
      }
    }

    let Some(value) = self.doc.attribute(self.id, local_name.as_str()) else {
      return false;
    };

    match operation {
      AttrSelectorOperation::Exists => true,
      AttrSelectorOperation::WithValue {
        operator,
        case_sensitivity,
        value: expected,
      } => operator.eval_str(value, expected.as_str(), *case_sensitivity),
    }
  }

  fn match_non_ts_pseudo_class(
    &self,
    pseudo: &PseudoClass,
    _context: &mut MatchingContext<Self::Impl>,
  ) -> bool {
    match pseudo {
      PseudoClass::Root => self.is_root(),
      PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
      PseudoClass::LastChild => self.next_sibling_element().is_none(),
      PseudoClass::OnlyChild => {
        self.prev_sibling_element().is_none() && self.next_sibling_element().is_none()
      }
      PseudoClass::Empty => self.is_empty(),
      PseudoClass::Link => self.is_link(),
    }
  }

  fn match_pseudo_element(
    &self,
    _pseudo: &PseudoElement,
    _context: &mut MatchingContext<Self::Impl>,
  ) -> bool {
    false
  }

  fn is_link(&self) -> bool {
    self.doc.has_attribute(self.id, "href")
      && self
        .doc
        .tag_name(self.id)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("a") || tag.eq_ignore_ascii_case("area"))
  }

  fn is_html_slot_element(&self) -> bool {
    self.has_local_name("slot")
  }

  fn assigned_slot(&self) -> Option<Self> {
    // Slot assignment is not modelled.
    None
  }

  fn has_id(&self, id: &CssString, case_sensitivity: CaseSensitivity) -> bool {
    let Some(actual) = self.doc.attribute(self.id, "id") else {
      return false;
    };
    match case_sensitivity {
      CaseSensitivity::CaseSensitive => actual == id.as_str(),
      CaseSensitivity::AsciiCaseInsensitive => actual.eq_ignore_ascii_case(id.as_str()),
    }
  }

  fn has_class(&self, class: &CssString, case_sensitivity: CaseSensitivity) -> bool {
    let Some(classes) = self.doc.attribute(self.id, "class") else {
      return false;
    };
    match case_sensitivity {
      CaseSensitivity::CaseSensitive => {
        classes.split_ascii_whitespace().any(|c| c == class.as_str())
      }
      CaseSensitivity::AsciiCaseInsensitive => classes
        .split_ascii_whitespace()
        .any(|c| c.eq_ignore_ascii_case(class.as_str())),
    }
  }

  fn imported_part(&self, _name: &CssString) -> Option<CssString> {
    None
  }

  fn is_part(&self, name: &CssString) -> bool {
    self
      .doc
      .attribute(self.id, "part")
      .map(|value| value.split_ascii_whitespace().any(|token| token == name.as_str()))
      .unwrap_or(false)
  }

  fn is_empty(&self) -> bool {
    self.doc.children(self.id).iter().all(|&child| {
      match self.doc.data(child) {
        NodeData::Text { content } => content.trim().is_empty(),
        NodeData::ShadowRoot { .. } => true,
        _ => false,
      }
    })
  }

  fn is_root(&self) -> bool {
    self
      .doc
      .parent(self.id)
      .is_some_and(|p| self.doc.is_document_node(p))
  }

  fn apply_selector_flags(&self, _flags: selectors::matching::ElementSelectorFlags) {}

  fn has_custom_state(&self, _name: &CssString) -> bool {
    false
  }

  fn add_element_unique_hashes(
    &self,
    _filter: &mut selectors::bloom::CountingBloomFilter<selectors::bloom::BloomStorageU8>,
  ) -> bool {
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn card_in_body(doc: &mut Document) -> NodeId {
    let body = doc.body().unwrap();
    let card = doc.create_element("div");
    doc.set_attribute(card, "class", "card featured");
    doc.set_attribute(card, "id", "main-card");
    doc.append_child(body, card);
    card
  }

  #[test]
  fn element_matches_basic_selectors() {
    let mut doc = Document::new();
    let card = card_in_body(&mut doc);

    assert!(doc.element_matches(card, "*").unwrap());
    assert!(doc.element_matches(card, "div").unwrap());
    assert!(doc.element_matches(card, ".card").unwrap());
    assert!(doc.element_matches(card, ".featured.card").unwrap());
    assert!(doc.element_matches(card, "#main-card").unwrap());
    assert!(doc.element_matches(card, "body > .card").unwrap());
    assert!(!doc.element_matches(card, ".other").unwrap());
    assert!(!doc.element_matches(card, "span").unwrap());
  }

  #[test]
  fn element_matches_attribute_selectors() {
    let mut doc = Document::new();
    let card = card_in_body(&mut doc);
    doc.set_attribute(card, "data-theme", "dark");

    assert!(doc.element_matches(card, "[data-theme]").unwrap());
    assert!(doc.element_matches(card, "[data-theme=\"dark\"]").unwrap());
    assert!(!doc.element_matches(card, "[data-theme=\"light\"]").unwrap());
  }

  #[test]
  fn element_matches_rejects_bad_selector() {
    let mut doc = Document::new();
    let card = card_in_body(&mut doc);
    assert!(doc.element_matches(card, "..card").is_err());
  }

  #[test]
  fn matching_does_not_cross_shadow_boundary_upward_implicitly() {
    let mut doc = Document::new();
    let card = card_in_body(&mut doc);
    let root = doc.attach_shadow(card, ShadowRootMode::Open).unwrap();
    let inner = doc.create_element("p");
    doc.set_attribute(inner, "class", "inner");
    doc.append_child(root, inner);

    // Descendant combinators stop at the shadow boundary.
    assert!(!doc.element_matches(inner, "body .inner").unwrap());
    assert!(doc.element_matches(inner, ".inner").unwrap());
  }

  #[test]
  fn attach_shadow_rejects_double_attachment() {
    let mut doc = Document::new();
    let card = card_in_body(&mut doc);
    doc.attach_shadow(card, ShadowRootMode::Open).unwrap();
    assert_eq!(
      doc.attach_shadow(card, ShadowRootMode::Open),
      Err(Error::ShadowRootExists)
    );
  }

  #[test]
  fn attach_shadow_rejects_non_elements() {
    let mut doc = Document::new();
    let text = doc.create_text("hi");
    assert_eq!(
      doc.attach_shadow(text, ShadowRootMode::Open),
      Err(Error::NotAnElement)
    );
  }

  #[test]
  fn mutation_records_batch_and_drain() {
    let mut doc = Document::new();
    let head = doc.head().unwrap();
    let style = doc.append_style(head, ".a { color: red; }");
    doc.set_attribute(style, "media", "--crossroot");

    let records = doc.take_mutations();
    assert!(records.iter().any(|r| r.kind == MutationKind::ChildList && r.target == head));
    assert!(records.iter().any(|r| r.kind == MutationKind::Attributes && r.target == style));
    assert!(doc.take_mutations().is_empty(), "drain leaves the log empty");
  }

  #[test]
  fn document_stylesheets_skip_shadow_subtrees() {
    let mut doc = Document::new();
    let head = doc.head().unwrap();
    doc.append_style(head, ".a { color: red; }");

    let body = doc.body().unwrap();
    let host = doc.create_element("x-widget");
    doc.append_child(body, host);
    let root = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    doc.append_style(root, ".hidden { color: blue; }");

    let sheets = doc.document_stylesheets();
    assert_eq!(sheets.len(), 1, "shadow style must not be scanned");
  }

  #[test]
  fn darkened_marker_attribute_and_property_are_equivalent() {
    let mut doc = Document::new();
    let card = card_in_body(&mut doc);
    assert!(!doc.is_marked_darkened(card));

    doc.set_attribute(card, DARKENED_ATTRIBUTE, "");
    assert!(doc.is_marked_darkened(card));
    doc.remove_attribute(card, DARKENED_ATTRIBUTE);
    assert!(!doc.is_marked_darkened(card));

    doc.set_darkened(card, true);
    assert!(doc.is_marked_darkened(card));
  }
}
