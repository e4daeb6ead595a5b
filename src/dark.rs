//! Dark-root detection
//!
//! A shadow subtree can opt out of cross-root propagation by marking its
//! host darkened (the `darkened` attribute or property). Whether a node is
//! inside such a subtree is decided by walking its ancestry outward, crossing
//! shadow boundaries at each shadow root's host, until either a darkened
//! host or the true top of the document is reached.

use crate::dom::{Document, NodeId};

/// One step of the ancestry walk, tagged by the kind of node under
/// inspection so each transition is explicit.
enum WalkStep {
  /// An ordinary node; step to its parent.
  Node(NodeId),
  /// A shadow root; inspect its host before stepping through the boundary.
  ShadowBoundary(NodeId),
  /// The document node; the walk reached the real top.
  Top,
  /// A parentless node that is not attached to the document.
  Detached,
}

fn classify(doc: &Document, node: NodeId) -> WalkStep {
  if doc.is_document_node(node) {
    WalkStep::Top
  } else if doc.is_shadow_root(node) {
    WalkStep::ShadowBoundary(node)
  } else if doc.parent(node).is_some() {
    WalkStep::Node(node)
  } else {
    WalkStep::Detached
  }
}

/// Reports whether `node` lies inside a darkened subtree.
///
/// The walk terminates at the first darkened host (darkened), at the
/// document node (not darkened), or at a detached top (darkened: a subtree
/// that never reaches the document root is treated as opted out).
pub fn is_darkened(doc: &Document, node: NodeId) -> bool {
  let mut current = node;
  loop {
    match classify(doc, current) {
      WalkStep::Top => return false,
      WalkStep::Detached => return true,
      WalkStep::ShadowBoundary(root) => {
        let Some(host) = doc.shadow_host(root) else {
          return true;
        };
        if doc.is_marked_darkened(host) {
          return true;
        }
        current = host;
      }
      WalkStep::Node(n) => {
        // Parent presence was checked during classification.
        match doc.parent(n) {
          Some(parent) => current = parent,
          None => return true,
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::{ShadowRootMode, DARKENED_ATTRIBUTE};

  fn host_with_shadow(doc: &mut Document) -> (NodeId, NodeId) {
    let body = doc.body().unwrap();
    let host = doc.create_element("x-widget");
    doc.append_child(body, host);
    let root = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    (host, root)
  }

  #[test]
  fn attached_light_nodes_are_not_darkened() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    assert!(!is_darkened(&doc, body));
    assert!(!is_darkened(&doc, doc.document_element()));
  }

  #[test]
  fn detached_subtrees_are_darkened() {
    let mut doc = Document::new();
    let orphan = doc.create_element("div");
    let child = doc.create_element("span");
    doc.append_child(orphan, child);
    assert!(is_darkened(&doc, orphan));
    assert!(is_darkened(&doc, child));
  }

  #[test]
  fn shadow_root_of_plain_host_is_not_darkened() {
    let mut doc = Document::new();
    let (_, root) = host_with_shadow(&mut doc);
    assert!(!is_darkened(&doc, root));
  }

  #[test]
  fn darkened_attribute_on_host_darkens_its_shadow_tree() {
    let mut doc = Document::new();
    let (host, root) = host_with_shadow(&mut doc);
    doc.set_attribute(host, DARKENED_ATTRIBUTE, "");

    let inner = doc.create_element("p");
    doc.append_child(root, inner);
    assert!(is_darkened(&doc, root));
    assert!(is_darkened(&doc, inner));
    // The host itself sits in the light tree and stays light.
    assert!(!is_darkened(&doc, host));
  }

  #[test]
  fn darkened_property_behaves_like_the_attribute() {
    let mut doc = Document::new();
    let (host, root) = host_with_shadow(&mut doc);
    doc.set_darkened(host, true);
    assert!(is_darkened(&doc, root));
  }

  #[test]
  fn walk_crosses_nested_shadow_boundaries_outward() {
    let mut doc = Document::new();
    let (outer_host, outer_root) = host_with_shadow(&mut doc);

    let inner_host = doc.create_element("x-inner");
    doc.append_child(outer_root, inner_host);
    let inner_root = doc.attach_shadow(inner_host, ShadowRootMode::Open).unwrap();

    // Nothing darkened: the walk escapes both boundaries to the top.
    assert!(!is_darkened(&doc, inner_root));

    // Darkening the outer host darkens the nested tree too.
    doc.set_attribute(outer_host, DARKENED_ATTRIBUTE, "");
    assert!(is_darkened(&doc, inner_root));
  }
}
