use halflight::{Document, NodeId, Session, ShadowRootMode};

const DARKENED: &str = "darkened";

fn page_with_universal_marker() -> (Document, Session) {
  let mut doc = Document::new();
  let head = doc.head().unwrap();
  let style = doc.append_style(head, "p { margin: 0; }");
  doc.set_attribute(style, "media", "--crossroot");

  let mut session = Session::new();
  session.run_frame(&mut doc);
  (doc, session)
}

fn host_in_body(doc: &mut Document, tag: &str) -> NodeId {
  let body = doc.body().unwrap();
  let host = doc.create_element(tag);
  doc.append_child(body, host);
  host
}

#[test]
fn darkened_host_is_skipped_and_never_tracked() {
  let (mut doc, mut session) = page_with_universal_marker();

  let host = host_in_body(&mut doc, "x-widget");
  doc.set_attribute(host, DARKENED, "");
  let root = session.attach_shadow(&mut doc, host, ShadowRootMode::Open).unwrap();
  session.run_frame(&mut doc);

  assert!(doc.adopted_stylesheets(root).is_empty());
  assert_eq!(session.tracked_hosts().count(), 0);

  // Later syncs keep ignoring it.
  session.sync(&mut doc);
  assert!(doc.adopted_stylesheets(root).is_empty());
}

#[test]
fn darkened_property_on_host_is_equivalent_to_the_attribute() {
  let (mut doc, mut session) = page_with_universal_marker();

  let host = host_in_body(&mut doc, "x-widget");
  doc.set_darkened(host, true);
  let root = session.attach_shadow(&mut doc, host, ShadowRootMode::Open).unwrap();
  session.run_frame(&mut doc);

  assert!(doc.adopted_stylesheets(root).is_empty());
}

#[test]
fn host_nested_inside_a_darkened_shadow_tree_is_excluded() {
  let (mut doc, mut session) = page_with_universal_marker();

  let outer = host_in_body(&mut doc, "x-outer");
  doc.set_attribute(outer, DARKENED, "");
  let outer_root = session.attach_shadow(&mut doc, outer, ShadowRootMode::Open).unwrap();

  // An inner component inside the darkened tree, itself unmarked.
  let inner = doc.create_element("x-inner");
  doc.append_child(outer_root, inner);
  let inner_root = session.attach_shadow(&mut doc, inner, ShadowRootMode::Open).unwrap();
  session.run_frame(&mut doc);

  assert!(doc.adopted_stylesheets(inner_root).is_empty());
  assert_eq!(session.tracked_hosts().count(), 0);
}

#[test]
fn host_inside_a_light_shadow_tree_still_receives_styles() {
  let (mut doc, mut session) = page_with_universal_marker();

  let outer = host_in_body(&mut doc, "x-outer");
  let outer_root = session.attach_shadow(&mut doc, outer, ShadowRootMode::Open).unwrap();

  let inner = doc.create_element("x-inner");
  doc.append_child(outer_root, inner);
  let inner_root = session.attach_shadow(&mut doc, inner, ShadowRootMode::Open).unwrap();
  session.run_frame(&mut doc);

  assert_eq!(doc.adopted_stylesheets(outer_root).len(), 1);
  assert_eq!(doc.adopted_stylesheets(inner_root).len(), 1);
  assert_eq!(session.tracked_hosts().count(), 2);
}

#[test]
fn darkening_applies_at_attachment_time_not_retroactively() {
  let (mut doc, mut session) = page_with_universal_marker();

  let host = host_in_body(&mut doc, "x-widget");
  let root = session.attach_shadow(&mut doc, host, ShadowRootMode::Open).unwrap();
  session.run_frame(&mut doc);
  assert_eq!(doc.adopted_stylesheets(root).len(), 1);

  // Marking the host afterwards does not untrack it; the darkened check
  // runs once, at shadow-root creation.
  doc.set_attribute(host, DARKENED, "");
  assert!(session.tracked_hosts().any(|h| h == host));
}
