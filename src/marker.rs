//! Cross-root marker parsing
//!
//! A stylesheet or conditional rule group is flagged for cross-root
//! propagation through its condition text: either exactly the reserved
//! `--crossroot` token, or the token followed by a parenthesized selector
//! argument, e.g. `--crossroot(.card)`. Anything else, including ordinary
//! media queries, is simply not cross-root; malformed input never errors.

/// The reserved condition token flagging a rule block as cross-root.
pub const CROSS_ROOT_MARKER: &str = "--crossroot";

/// Universal selector, the default propagation target.
pub const UNIVERSAL_SELECTOR: &str = "*";

/// Result of parsing one condition string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
  /// Whether the condition flags its rules for cross-root propagation
  pub cross_root: bool,
  /// The selector propagated rules should target (hosts matching it)
  pub selector: String,
}

impl Marker {
  fn cross_root(selector: &str) -> Self {
    Marker {
      cross_root: true,
      selector: selector.to_string(),
    }
  }

  fn not_cross_root() -> Self {
    Marker {
      cross_root: false,
      selector: UNIVERSAL_SELECTOR.to_string(),
    }
  }
}

/// Parses a media/container condition string into a [`Marker`].
///
/// A blank or missing selector argument falls back to the universal
/// selector, so `--crossroot` and `--crossroot(  )` both target every host.
pub fn parse_marker(condition: &str) -> Marker {
  let trimmed = condition.trim();
  if trimmed == CROSS_ROOT_MARKER {
    return Marker::cross_root(UNIVERSAL_SELECTOR);
  }

  let Some(pos) = trimmed.find(CROSS_ROOT_MARKER) else {
    return Marker::not_cross_root();
  };

  let rest = trimmed[pos + CROSS_ROOT_MARKER.len()..].trim_start();
  if let Some(args) = rest.strip_prefix('(') {
    if let Some(end) = args.rfind(')') {
      let selector = args[..end].trim();
      return if selector.is_empty() {
        Marker::cross_root(UNIVERSAL_SELECTOR)
      } else {
        Marker::cross_root(selector)
      };
    }
  }

  Marker::not_cross_root()
}
