//! CSS selector support
//!
//! Implements selector parsing and matching using the selectors crate. Only
//! the selector features a page author can realistically key cross-root
//! propagation on are supported: type/class/id/attribute selectors, the
//! structural pseudo-classes, and the standard combinators. Unsupported
//! pseudo-classes fail selector parsing, which the pipeline treats as
//! "matches nothing".

use cssparser::{ParseError, Parser, ParserInput, ToCss, Token};
use selectors::parser::{ParseRelative, SelectorImpl, SelectorList, SelectorParseErrorKind};
use std::fmt;

use crate::error::{Error, Result};

// ============================================================================
// CssString wrapper for selectors crate compatibility
// ============================================================================

/// String newtype carrying the trait impls the selectors crate requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CssString(pub String);

impl CssString {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for CssString {
  fn from(s: &str) -> Self {
    CssString(s.to_string())
  }
}

impl From<String> for CssString {
  fn from(s: String) -> Self {
    CssString(s)
  }
}

impl std::ops::Deref for CssString {
  type Target = String;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl std::borrow::Borrow<str> for CssString {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl ToCss for CssString {
  fn to_css<W>(&self, dest: &mut W) -> fmt::Result
  where
    W: fmt::Write,
  {
    dest.write_str(&self.0)
  }
}

impl precomputed_hash::PrecomputedHash for CssString {
  fn precomputed_hash(&self) -> u32 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hash;
    use std::hash::Hasher;

    let mut hasher = DefaultHasher::new();
    self.0.hash(&mut hasher);
    hasher.finish() as u32
  }
}

// ============================================================================
// Selector implementation
// ============================================================================

/// Our custom SelectorImpl for halflight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalflightSelectorImpl;

impl SelectorImpl for HalflightSelectorImpl {
  type ExtraMatchingData<'a> = ();
  type AttrValue = CssString;
  type Identifier = CssString;
  type LocalName = CssString;
  type NamespacePrefix = CssString;
  type NamespaceUrl = CssString;
  type BorrowedLocalName = str;
  type BorrowedNamespaceUrl = str;

  type NonTSPseudoClass = PseudoClass;
  type PseudoElement = PseudoElement;
}

// ============================================================================
// Pseudo-classes
// ============================================================================

/// Pseudo-classes we support
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
  Root,
  FirstChild,
  LastChild,
  OnlyChild,
  Empty,
  Link,
}

impl selectors::parser::NonTSPseudoClass for PseudoClass {
  type Impl = HalflightSelectorImpl;

  fn is_active_or_hover(&self) -> bool {
    false
  }

  fn is_user_action_state(&self) -> bool {
    false
  }
}

impl ToCss for PseudoClass {
  fn to_css<W>(&self, dest: &mut W) -> fmt::Result
  where
    W: fmt::Write,
  {
    match self {
      PseudoClass::Root => dest.write_str(":root"),
      PseudoClass::FirstChild => dest.write_str(":first-child"),
      PseudoClass::LastChild => dest.write_str(":last-child"),
      PseudoClass::OnlyChild => dest.write_str(":only-child"),
      PseudoClass::Empty => dest.write_str(":empty"),
      PseudoClass::Link => dest.write_str(":link"),
    }
  }
}

// ============================================================================
// Pseudo-elements
// ============================================================================

/// Pseudo-elements we support
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {
  Before,
  After,
}

impl selectors::parser::PseudoElement for PseudoElement {
  type Impl = HalflightSelectorImpl;
}

impl ToCss for PseudoElement {
  fn to_css<W>(&self, dest: &mut W) -> fmt::Result
  where
    W: fmt::Write,
  {
    match self {
      PseudoElement::Before => dest.write_str("::before"),
      PseudoElement::After => dest.write_str("::after"),
    }
  }
}

// ============================================================================
// Pseudo-class parser
// ============================================================================

/// Custom parser for pseudo-classes
pub(crate) struct PseudoClassParser;

impl<'i> selectors::parser::Parser<'i> for PseudoClassParser {
  type Impl = HalflightSelectorImpl;
  type Error = SelectorParseErrorKind<'i>;

  fn parse_non_ts_pseudo_class(
    &self,
    _location: cssparser::SourceLocation,
    name: cssparser::CowRcStr<'i>,
  ) -> std::result::Result<PseudoClass, ParseError<'i, Self::Error>> {
    match &*name {
      "root" => Ok(PseudoClass::Root),
      "first-child" => Ok(PseudoClass::FirstChild),
      "last-child" => Ok(PseudoClass::LastChild),
      "only-child" => Ok(PseudoClass::OnlyChild),
      "empty" => Ok(PseudoClass::Empty),
      "link" => Ok(PseudoClass::Link),
      _ => Err(ParseError {
        kind: cssparser::ParseErrorKind::Basic(cssparser::BasicParseErrorKind::UnexpectedToken(
          Token::Ident(name),
        )),
        location: _location,
      }),
    }
  }

  fn parse_pseudo_element(
    &self,
    _location: cssparser::SourceLocation,
    name: cssparser::CowRcStr<'i>,
  ) -> std::result::Result<PseudoElement, ParseError<'i, Self::Error>> {
    match &*name {
      "before" => Ok(PseudoElement::Before),
      "after" => Ok(PseudoElement::After),
      _ => Err(ParseError {
        kind: cssparser::ParseErrorKind::Basic(cssparser::BasicParseErrorKind::UnexpectedToken(
          Token::Ident(name),
        )),
        location: _location,
      }),
    }
  }

  fn parse_is_and_where(&self) -> bool {
    true
  }
}

/// Parses a selector list string, e.g. the argument of a cross-root marker.
pub fn parse_selector_list(selector: &str) -> Result<SelectorList<HalflightSelectorImpl>> {
  let mut input = ParserInput::new(selector);
  let mut parser = Parser::new(&mut input);
  SelectorList::parse(&PseudoClassParser, &mut parser, ParseRelative::No)
    .map_err(|_| Error::InvalidSelector(selector.to_string()))
}
