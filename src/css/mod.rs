//! CSS rule object model, parsing, and selector matching.

pub mod parser;
pub mod selectors;
pub mod types;

pub use selectors::{parse_selector_list, CssString, HalflightSelectorImpl};
pub use types::{ConditionalRule, CssRule, LayerRule, StyleRule, StyleSheet};
