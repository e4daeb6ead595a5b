//! Cross-root rule extraction
//!
//! Scans the document's stylesheets for rule blocks flagged with the
//! cross-root marker and accumulates their rules, keyed by target selector,
//! into per-selector accumulator sheets. The map is rebuilt from scratch on
//! every pass, so one pass's output fully and exclusively reflects the
//! stylesheets as they stood at that instant.

use indexmap::IndexMap;

use crate::css::{CssRule, StyleSheet};
use crate::dom::{Document, NO_HALF_LIGHT_ATTRIBUTE};
use crate::marker::parse_marker;

/// Selector → accumulator sheet holding every cross-root rule destined for
/// hosts matching that selector.
///
/// Insertion-ordered so downstream application order is deterministic.
pub type StyleMap = IndexMap<String, StyleSheet>;

/// Copies every rule in `rules` into the accumulator for `selector`.
///
/// Pure with respect to `map`: the input map is left untouched and a new map
/// is returned, so callers can retain the prior map for comparison. Rules are
/// copied by serialized text; a rule whose text fails to re-parse is dropped.
pub fn extract_rules(rules: &[CssRule], selector: &str, map: &StyleMap) -> StyleMap {
  let mut next = map.clone();
  let accumulator = next.entry(selector.to_string()).or_default();
  for rule in rules {
    let text = rule.css_text();
    if let Err(e) = accumulator.append_rule(&text) {
      log::debug!("dropping cross-root rule that failed to re-parse: {e}");
    }
  }
  next
}

/// Builds the cross-root style map for the document's current stylesheets.
///
/// Only stylesheets whose owner node is a direct child of `<head>` and does
/// not carry the `no-half-light` attribute participate. A stylesheet's own
/// condition (its owner's `media` attribute) and each nested conditional
/// rule group are evaluated independently against the marker syntax.
pub fn collect_document_styles(doc: &Document) -> StyleMap {
  let mut map = StyleMap::new();
  let Some(head) = doc.head() else {
    return map;
  };

  for entry in doc.document_stylesheets() {
    if doc.parent(entry.owner) != Some(head) {
      continue;
    }
    if doc.has_attribute(entry.owner, NO_HALF_LIGHT_ATTRIBUTE) {
      continue;
    }

    let condition = doc.attribute(entry.owner, "media").unwrap_or_default();
    let marker = parse_marker(condition);
    if marker.cross_root {
      map = extract_rules(&entry.sheet.rules, &marker.selector, &map);
    }

    map = extract_conditional_groups(&entry.sheet.rules, map);
  }

  map
}

/// Walks a rule list for conditional groups flagged cross-root, recursing
/// into unflagged groups of any kind to find nested flagged ones.
fn extract_conditional_groups(rules: &[CssRule], mut map: StyleMap) -> StyleMap {
  for rule in rules {
    match rule.condition_text() {
      Some(condition) => {
        let marker = parse_marker(condition);
        let nested = rule.nested_rules().unwrap_or_default();
        if marker.cross_root {
          map = extract_rules(nested, &marker.selector, &map);
        } else {
          map = extract_conditional_groups(nested, map);
        }
      }
      None => {
        if let Some(nested) = rule.nested_rules() {
          map = extract_conditional_groups(nested, map);
        }
      }
    }
  }
  map
}
