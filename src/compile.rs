//! Stylesheet compilation
//!
//! Turns the per-selector accumulators produced by extraction into finished,
//! adoptable stylesheets. Each compiled sheet wraps its rules in the
//! `half-light` cascade layer so propagated rules keep a stable, predictable
//! precedence below a component's own unlayered styles.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::dom::SheetHandle;
use crate::extract::StyleMap;

/// Name of the cascade layer every compiled sheet wraps its rules in.
pub const LAYER_NAME: &str = "half-light";

/// Selector → compiled, adoptable stylesheet. Regenerated wholesale
/// alongside the style map on every pass.
pub type CompiledMap = IndexMap<String, SheetHandle>;

/// Compiles the style map into one layer-wrapped sheet per selector.
///
/// Only the accumulator's first rule block is compiled. That matches the
/// source behavior this engine reproduces; accumulators holding multiple
/// blocks lose the later ones here (see DESIGN.md). Selectors whose
/// accumulator is empty produce no compiled sheet.
pub fn compile_style_map(map: &StyleMap) -> CompiledMap {
  let mut compiled = CompiledMap::new();
  for (selector, accumulator) in map {
    let Some(first) = accumulator.rules.first() else {
      continue;
    };
    let wrapped = format!("@layer {} {{ {} }}", LAYER_NAME, first.css_text());
    let sheet = crate::css::StyleSheet::parse(&wrapped);
    if sheet.rules.is_empty() {
      log::warn!("compiled sheet for selector `{selector}` parsed to nothing");
      continue;
    }
    compiled.insert(selector.clone(), Rc::new(sheet));
  }
  compiled
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::css::{CssRule, StyleSheet};

  fn map_with(selector: &str, css: &str) -> StyleMap {
    let mut map = StyleMap::new();
    map.insert(selector.to_string(), StyleSheet::parse(css));
    map
  }

  #[test]
  fn wraps_rules_in_the_half_light_layer() {
    let compiled = compile_style_map(&map_with(".card", ".title { color: red; }"));
    let sheet = compiled.get(".card").expect("compiled sheet for .card");
    assert_eq!(sheet.rules.len(), 1);
    match &sheet.rules[0] {
      CssRule::Layer(layer) => {
        assert_eq!(layer.name, LAYER_NAME);
        assert_eq!(layer.rules.len(), 1);
        assert_eq!(layer.rules[0].css_text(), ".title { color: red; }");
      }
      other => panic!("expected layer rule, got {other:?}"),
    }
  }

  #[test]
  fn empty_accumulators_compile_to_nothing() {
    let mut map = StyleMap::new();
    map.insert(".card".to_string(), StyleSheet::new());
    assert!(compile_style_map(&map).is_empty());
  }

  #[test]
  fn only_the_first_rule_block_is_compiled() {
    // Deliberate: later blocks in a multi-block accumulator are dropped at
    // compile time.
    let compiled = compile_style_map(&map_with(
      ".card",
      ".a { color: red; } .b { color: blue; }",
    ));
    let sheet = compiled.get(".card").unwrap();
    match &sheet.rules[0] {
      CssRule::Layer(layer) => {
        assert_eq!(layer.rules.len(), 1);
        assert_eq!(layer.rules[0].css_text(), ".a { color: red; }");
      }
      other => panic!("expected layer rule, got {other:?}"),
    }
  }

  #[test]
  fn map_iteration_order_is_preserved() {
    let mut map = StyleMap::new();
    map.insert("my-widget".to_string(), StyleSheet::parse(".a { }"));
    map.insert(".card".to_string(), StyleSheet::parse(".b { }"));
    let compiled = compile_style_map(&map);
    let keys: Vec<_> = compiled.keys().cloned().collect();
    assert_eq!(keys, vec!["my-widget".to_string(), ".card".to_string()]);
  }
}
