//! CSS rule object model
//!
//! The propagation pipeline consumes stylesheets through a CSSOM-like rule
//! object model rather than a full property-level parser: a stylesheet is a
//! list of rules, conditional rule groups expose their condition text and a
//! nested rule list, and every rule serializes back to CSS text. That text
//! round-trip is what extraction uses to copy rules between sheets.

use crate::css::parser;
use crate::error::{Error, Result};

/// A stylesheet: an ordered list of rules.
///
/// Covers both document stylesheets (parsed from `<style>` text) and
/// constructed sheets (accumulators and compiled cross-root sheets).
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
  /// All CSS rules in the stylesheet (style rules and @-rules)
  pub rules: Vec<CssRule>,
}

impl StyleSheet {
  /// Creates an empty stylesheet
  pub fn new() -> Self {
    Self { rules: Vec::new() }
  }

  /// Parses stylesheet text.
  ///
  /// Parsing is recovering: malformed rules are skipped, never fatal, so
  /// this mirrors how a browser builds a rule list from author CSS.
  pub fn parse(css: &str) -> Self {
    parser::parse_stylesheet(css)
  }

  /// Inserts serialized rule text at `index`.
  ///
  /// Fails if the text does not parse as exactly one rule, or if `index` is
  /// past the end of the rule list.
  pub fn insert_rule(&mut self, text: &str, index: usize) -> Result<()> {
    if index > self.rules.len() {
      return Err(Error::RuleIndexOutOfBounds {
        index,
        len: self.rules.len(),
      });
    }
    let rule = parser::parse_single_rule(text).ok_or_else(|| Error::InvalidRule(text.to_string()))?;
    self.rules.insert(index, rule);
    Ok(())
  }

  /// Appends serialized rule text to the end of the rule list.
  pub fn append_rule(&mut self, text: &str) -> Result<()> {
    self.insert_rule(text, self.rules.len())
  }

  /// Serializes the whole sheet back to CSS text.
  pub fn css_text(&self) -> String {
    rule_list_text(&self.rules)
  }
}

/// A single rule in a stylesheet.
///
/// Only the rule kinds the pipeline inspects are modelled structurally;
/// everything else is carried as raw serialized text so it survives the
/// copy-by-text round-trip untouched.
#[derive(Debug, Clone)]
pub enum CssRule {
  /// A style rule (selector list + raw declaration text)
  Style(StyleRule),
  /// A `@media` conditional rule group
  Media(ConditionalRule),
  /// A `@container` conditional rule group
  Container(ConditionalRule),
  /// A `@supports` conditional rule group
  Supports(ConditionalRule),
  /// A `@layer` block rule
  Layer(LayerRule),
  /// Any other at-rule, kept as raw text
  Other(String),
}

/// A style rule: selector text plus the raw declaration block text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
  pub selector_text: String,
  pub declarations: String,
}

/// A conditional rule group (`@media`, `@container`, `@supports`).
#[derive(Debug, Clone)]
pub struct ConditionalRule {
  /// The condition text, verbatim as authored
  pub condition_text: String,
  /// Nested rules (can themselves be conditional groups)
  pub rules: Vec<CssRule>,
}

/// A `@layer` block rule.
#[derive(Debug, Clone)]
pub struct LayerRule {
  /// Layer name (empty for an anonymous layer)
  pub name: String,
  pub rules: Vec<CssRule>,
}

impl CssRule {
  /// The condition text of a conditional rule group, if this rule has one.
  ///
  /// This is the capability extraction dispatches on: a rule is a candidate
  /// for cross-root marking exactly when it exposes a condition.
  pub fn condition_text(&self) -> Option<&str> {
    match self {
      CssRule::Media(g) | CssRule::Container(g) | CssRule::Supports(g) => Some(&g.condition_text),
      _ => None,
    }
  }

  /// The nested rule list, for any grouping rule.
  pub fn nested_rules(&self) -> Option<&[CssRule]> {
    match self {
      CssRule::Media(g) | CssRule::Container(g) | CssRule::Supports(g) => Some(&g.rules),
      CssRule::Layer(l) => Some(&l.rules),
      _ => None,
    }
  }

  /// Serializes this rule back to CSS text.
  pub fn css_text(&self) -> String {
    match self {
      CssRule::Style(rule) => {
        if rule.declarations.is_empty() {
          format!("{} {{ }}", rule.selector_text)
        } else {
          format!("{} {{ {} }}", rule.selector_text, rule.declarations)
        }
      }
      CssRule::Media(g) => group_text("@media", &g.condition_text, &g.rules),
      CssRule::Container(g) => group_text("@container", &g.condition_text, &g.rules),
      CssRule::Supports(g) => group_text("@supports", &g.condition_text, &g.rules),
      CssRule::Layer(l) => group_text("@layer", &l.name, &l.rules),
      CssRule::Other(text) => text.clone(),
    }
  }
}

fn group_text(at_keyword: &str, prelude: &str, rules: &[CssRule]) -> String {
  if prelude.is_empty() {
    format!("{} {{ {} }}", at_keyword, rule_list_text(rules))
  } else {
    format!("{} {} {{ {} }}", at_keyword, prelude, rule_list_text(rules))
  }
}

fn rule_list_text(rules: &[CssRule]) -> String {
  rules
    .iter()
    .map(|rule| rule.css_text())
    .collect::<Vec<_>>()
    .join(" ")
}
