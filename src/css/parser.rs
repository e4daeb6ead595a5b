//! CSS rule-list parsing
//!
//! Builds the rule object model from stylesheet text using `cssparser` for
//! tokenization. Declarations are not interpreted: a style rule keeps its
//! declaration block as raw text, and unrecognized at-rules are kept as raw
//! serialized text, because the pipeline only ever copies rules around by
//! their serialization.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

use super::types::{ConditionalRule, CssRule, LayerRule, StyleRule, StyleSheet};

/// Parses a CSS stylesheet.
///
/// Recovering: a malformed rule is skipped (up to the end of its block) and
/// parsing continues with the next rule, matching platform behavior.
pub fn parse_stylesheet(css: &str) -> StyleSheet {
  let mut input = ParserInput::new(css);
  let mut parser = Parser::new(&mut input);
  StyleSheet {
    rules: parse_rule_list(&mut parser),
  }
}

/// Parses text expected to contain exactly one rule.
///
/// Returns `None` if the text holds zero rules or more than one.
pub fn parse_single_rule(text: &str) -> Option<CssRule> {
  let sheet = parse_stylesheet(text);
  let mut rules = sheet.rules;
  if rules.len() == 1 {
    rules.pop()
  } else {
    None
  }
}

pub(crate) fn parse_rule_list(parser: &mut Parser) -> Vec<CssRule> {
  let mut rules = Vec::new();

  while !parser.is_exhausted() {
    parser.skip_whitespace();
    if parser.is_exhausted() {
      break;
    }

    match parse_rule(parser) {
      Ok(Some(rule)) => rules.push(rule),
      Ok(None) => {}
      Err(e) => {
        log::debug!("skipping malformed css rule: {e:?}");
        // Recover by skipping to the end of the offending rule.
        while !parser.is_exhausted() {
          match parser.next() {
            Ok(Token::CurlyBracketBlock) => {
              let _: std::result::Result<(), ParseError<()>> =
                parser.parse_nested_block(|_| Ok(()));
              break;
            }
            Ok(Token::Semicolon) => break,
            Err(_) => break,
            Ok(_) => {}
          }
        }
      }
    }
  }

  rules
}

fn parse_rule<'i>(
  parser: &mut Parser<'i, '_>,
) -> std::result::Result<Option<CssRule>, ParseError<'i, ()>> {
  parser.skip_whitespace();

  let is_at_rule = parser
    .try_parse(|p| match p.next_including_whitespace()? {
      Token::AtKeyword(_) => Ok(()),
      _ => Err(p.new_error_for_next_token::<()>()),
    })
    .is_ok();

  if is_at_rule {
    let at_keyword = match parser.next() {
      Ok(Token::AtKeyword(kw)) => kw.to_string(),
      _ => return Ok(None),
    };
    return parse_at_rule(parser, &at_keyword);
  }

  // Qualified rule: selector prelude up to the block, raw declarations inside.
  let prelude_start = parser.position();
  let _: std::result::Result<(), ParseError<()>> =
    parser.parse_until_before(Delimiter::CurlyBracketBlock, |p| {
      while p.next().is_ok() {}
      Ok(())
    });
  let selector_text = parser.slice_from(prelude_start).trim().to_string();
  if selector_text.is_empty() {
    return Err(parser.new_error_for_next_token::<()>());
  }

  parser.expect_curly_bracket_block()?;
  let declarations = parser.parse_nested_block(|p| {
    let start = p.position();
    while p.next().is_ok() {}
    Ok::<_, ParseError<()>>(p.slice_from(start).trim().to_string())
  })?;

  Ok(Some(CssRule::Style(StyleRule {
    selector_text,
    declarations,
  })))
}

fn parse_at_rule<'i>(
  parser: &mut Parser<'i, '_>,
  at_keyword: &str,
) -> std::result::Result<Option<CssRule>, ParseError<'i, ()>> {
  match at_keyword {
    "media" | "container" | "supports" => {
      let condition_start = parser.position();
      let _: std::result::Result<(), ParseError<()>> =
        parser.parse_until_before(Delimiter::CurlyBracketBlock, |p| {
          while p.next().is_ok() {}
          Ok(())
        });
      let condition_text = parser.slice_from(condition_start).trim().to_string();

      parser.expect_curly_bracket_block()?;
      let rules = parser.parse_nested_block(|p| Ok::<_, ParseError<()>>(parse_rule_list(p)))?;

      let group = ConditionalRule {
        condition_text,
        rules,
      };
      Ok(Some(match at_keyword {
        "media" => CssRule::Media(group),
        "container" => CssRule::Container(group),
        _ => CssRule::Supports(group),
      }))
    }
    "layer" => {
      let prelude_start = parser.position();
      let _: std::result::Result<(), ParseError<()>> = parser.parse_until_before(
        Delimiter::CurlyBracketBlock | Delimiter::Semicolon,
        |p| {
          while p.next().is_ok() {}
          Ok(())
        },
      );
      let name = parser.slice_from(prelude_start).trim().to_string();

      match parser.next() {
        Ok(Token::CurlyBracketBlock) => {
          let rules = parser.parse_nested_block(|p| Ok::<_, ParseError<()>>(parse_rule_list(p)))?;
          Ok(Some(CssRule::Layer(LayerRule { name, rules })))
        }
        // Statement form (`@layer a, b;`) establishes layer order only.
        _ => Ok(Some(CssRule::Other(format!("@layer {};", name)))),
      }
    }
    _ => {
      // Unmodelled at-rule: consume through its block or semicolon and keep
      // the raw serialization.
      let body_start = parser.position();
      loop {
        match parser.next() {
          Ok(Token::CurlyBracketBlock) => {
            let _: std::result::Result<(), ParseError<()>> = parser.parse_nested_block(|p| {
              while p.next().is_ok() {}
              Ok(())
            });
            break;
          }
          Ok(Token::Semicolon) => break,
          Err(_) => break,
          Ok(_) => {}
        }
      }
      let body = parser.slice_from(body_start);
      Ok(Some(CssRule::Other(
        format!("@{}{}", at_keyword, body).trim().to_string(),
      )))
    }
  }
}
