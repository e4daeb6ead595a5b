//! Error types for halflight
//!
//! The propagation pipeline itself is best-effort and silently skips
//! malformed input (a condition string that is not a cross-root marker is
//! simply not cross-root; a rule that fails to re-parse is dropped). Errors
//! here cover misuse of the document model and the CSSOM-style entry points
//! that the platform would reject, such as attaching a second shadow root to
//! a host or inserting unparseable rule text.

use thiserror::Error;

/// Result type alias for halflight operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for halflight
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// A selector string could not be parsed
  #[error("invalid selector `{0}`")]
  InvalidSelector(String),

  /// Rule text passed to `insert_rule` did not parse as a single rule
  #[error("invalid rule text `{0}`")]
  InvalidRule(String),

  /// `insert_rule` index outside the rule list
  #[error("rule index {index} out of bounds (rule list has {len} rules)")]
  RuleIndexOutOfBounds { index: usize, len: usize },

  /// A node-kind mismatch, e.g. attaching a shadow root to a text node
  #[error("node is not an element")]
  NotAnElement,

  /// The host already has a shadow root attached
  #[error("shadow root already attached to host")]
  ShadowRootExists,
}
