//! halflight: cross-root stylesheet propagation for shadow DOM trees.
//!
//! Page-level CSS normally stops at shadow boundaries. This crate propagates
//! an opt-in subset of it into open shadow roots: rule blocks flagged with
//! the `--crossroot` condition marker are extracted from the document's
//! stylesheets, compiled into per-selector sheets wrapped in the
//! `half-light` cascade layer, and adopted by every matching shadow host:
//! at attachment time for new roots, and again on every stylesheet mutation
//! for tracked ones.
//!
//! ```
//! use halflight::{Document, Session, ShadowRootMode};
//!
//! let mut doc = Document::new();
//! let head = doc.head().unwrap();
//! let style = doc.append_style(head, ".title { color: red; }");
//! doc.set_attribute(style, "media", "--crossroot(.card)");
//!
//! let mut session = Session::new();
//! session.run_frame(&mut doc); // initial scan
//!
//! let body = doc.body().unwrap();
//! let card = doc.create_element("div");
//! doc.set_attribute(card, "class", "card");
//! doc.append_child(body, card);
//! let root = session.attach_shadow(&mut doc, card, ShadowRootMode::Open).unwrap();
//! session.run_frame(&mut doc); // deferred styling
//!
//! assert_eq!(doc.adopted_stylesheets(root).len(), 1);
//! ```

pub mod compile;
pub mod css;
pub mod dark;
pub mod dom;
pub mod error;
pub mod extract;
pub mod marker;
pub mod schedule;
pub mod session;

pub use dom::{Document, NodeId, ShadowRootMode, SheetHandle};
pub use error::{Error, Result};
pub use marker::{parse_marker, Marker};
pub use session::Session;
