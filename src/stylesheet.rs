//! Stylesheet reader
//!
//! Splits stylesheet text into [`CssRule`]s: a selector list plus its
//! declarations, in source order. Tokenizing is done by `cssparser`; values
//! are kept as raw source text with comments blanked out and a trailing
//! `!important` dropped. At-rules are skipped entirely.
//!
//! Marker rules such as `START-PONYSCRIPT-IGNORE { }` come through as ordinary
//! rules with an identifier selector.

use crate::emote::{CssProperties, CssRule};
use cssparser::{
    parse_important, AtRuleParser, CowRcStr, DeclarationParser, Delimiter, ParseError,
    ParseErrorKind, Parser, ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser,
    RuleBodyParser, SourcePosition, StyleSheetParser, Token,
};
use thiserror::Error;

/// Error type for malformed stylesheet structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StylesheetError {
    #[error("line {line}: unterminated comment")]
    UnterminatedComment { line: usize },
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
    #[error("line {line}: block opened here is never closed")]
    UnterminatedBlock { line: usize },
    #[error("line {line}: unexpected '}}'")]
    UnexpectedCloseBrace { line: usize },
    #[error("line {line}: selector without a declaration block")]
    MissingBlock { line: usize },
    #[error("line {line}: malformed stylesheet")]
    Malformed { line: usize },
}

type CssParseError<'i> = ParseError<'i, StylesheetError>;

/// Parse stylesheet text into rules.
///
/// # Examples
///
/// ```
/// use emotecss::stylesheet::parse_stylesheet;
///
/// let rules = parse_stylesheet(
///     r#"a[href|="/a"], a[href|="/b"] { width: 10px; height: 10px }"#,
/// ).unwrap();
/// assert_eq!(rules.len(), 1);
/// assert_eq!(rules[0].selectors, vec![r#"a[href|="/a"]"#, r#"a[href|="/b"]"#]);
/// assert_eq!(rules[0].properties.get("width"), Some("10px"));
/// ```
pub fn parse_stylesheet(text: &str) -> Result<Vec<CssRule>, StylesheetError> {
    check_structure(text)?;

    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut rule_parser = RuleParser;
    let mut rules = Vec::new();

    for item in StyleSheetParser::new(&mut parser, &mut rule_parser) {
        match item {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => {}
            Err((err, _)) => return Err(into_stylesheet_error(err)),
        }
    }

    Ok(rules)
}

/// Parse the inside of a declaration block (`name: value; ...`).
///
/// Property names are lower-cased. A repeated property keeps its first
/// position and takes the last value. Invalid declarations are skipped.
pub fn parse_declarations(body: &str) -> CssProperties {
    let mut input = ParserInput::new(body);
    let mut parser = Parser::new(&mut input);
    read_declarations(&mut parser)
}

/// Split a selector list on top-level commas, normalising whitespace.
pub fn split_selectors(prelude: &str) -> Vec<String> {
    let mut input = ParserInput::new(prelude);
    let mut parser = Parser::new(&mut input);
    read_selectors(&mut parser).unwrap_or_default()
}

fn read_selectors<'i>(input: &mut Parser<'i, '_>) -> Result<Vec<String>, CssParseError<'i>> {
    let selectors = input.parse_comma_separated(|item| {
        let mut text = String::new();
        push_source(item, &mut text)?;
        Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
    })?;
    Ok(selectors.into_iter().filter(|s| !s.is_empty()).collect())
}

fn read_declarations(input: &mut Parser<'_, '_>) -> CssProperties {
    let mut parser = DeclarationListParser;
    RuleBodyParser::new(input, &mut parser).flatten().collect()
}

/// Append the source text of the remaining tokens to `out`, nested blocks
/// included. Comments become a single space.
fn push_source<'i>(input: &mut Parser<'i, '_>, out: &mut String) -> Result<(), CssParseError<'i>> {
    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };
        let close = match token {
            Token::Comment(_) => {
                out.push(' ');
                continue;
            }
            Token::Function(_) | Token::ParenthesisBlock => ')',
            Token::SquareBracketBlock => ']',
            Token::CurlyBracketBlock => '}',
            _ => {
                out.push_str(input.slice_from(start));
                continue;
            }
        };
        out.push_str(input.slice_from(start));
        input.parse_nested_block(|nested| push_source(nested, out))?;
        out.push(close);
    }
}

/// Top-level rules. At-rules yield `None`.
struct RuleParser;

impl<'i> QualifiedRuleParser<'i> for RuleParser {
    type Prelude = Vec<String>;
    type QualifiedRule = Option<CssRule>;
    type Error = StylesheetError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssParseError<'i>> {
        read_selectors(input)
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, CssParseError<'i>> {
        let properties = read_declarations(input);
        if selectors.is_empty() {
            return Ok(None);
        }
        Ok(Some(CssRule::new(selectors, properties)))
    }
}

impl<'i> AtRuleParser<'i> for RuleParser {
    type Prelude = ();
    type AtRule = Option<CssRule>;
    type Error = StylesheetError;

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssParseError<'i>> {
        while input.next().is_ok() {}
        Ok(())
    }

    fn rule_without_block(&mut self, _prelude: (), _start: &ParserState) -> Result<Self::AtRule, ()> {
        Ok(None)
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: (),
        _start: &ParserState,
        _input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, CssParseError<'i>> {
        Ok(None)
    }
}

/// `name: value` pairs inside a rule block
struct DeclarationListParser;

impl<'i> DeclarationParser<'i> for DeclarationListParser {
    type Declaration = (String, String);
    type Error = StylesheetError;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _declaration_start: &ParserState,
    ) -> Result<Self::Declaration, CssParseError<'i>> {
        let mut value = String::new();
        input.parse_until_before(Delimiter::Bang, |v| push_source(v, &mut value))?;
        input.try_parse(parse_important).ok();
        input.expect_exhausted()?;
        Ok((name.to_ascii_lowercase(), value.trim().to_string()))
    }
}

impl<'i> AtRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type AtRule = (String, String);
    type Error = StylesheetError;
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type QualifiedRule = (String, String);
    type Error = StylesheetError;
}

impl<'i> RuleBodyItemParser<'i, (String, String), StylesheetError> for DeclarationListParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Reject input that the CSS error recovery would otherwise quietly repair:
/// comments, strings and blocks cut off by the end of input, stray `}` and a
/// trailing selector with no block.
fn check_structure(text: &str) -> Result<(), StylesheetError> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    check_tokens(&mut parser, true)
        .map(|_| ())
        .map_err(into_stylesheet_error)
}

/// Walk the tokens of one nesting level. Returns the position the walk
/// stopped at, so the caller can tell whether a block was closed.
fn check_tokens<'i>(input: &mut Parser<'i, '_>, top_level: bool) -> Result<SourcePosition, CssParseError<'i>> {
    // line where a top-level prelude without a block yet began
    let mut pending: Option<usize> = None;

    loop {
        let start = input.position();
        let line = input.current_source_location().line as usize + 1;
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) => continue,
            Token::Comment(_) => {
                let text = input.slice_from(start);
                if text.len() < 4 || !text.ends_with("*/") {
                    return Err(input.new_custom_error(StylesheetError::UnterminatedComment { line }));
                }
                continue;
            }
            Token::QuotedString(_) => {
                let text = input.slice_from(start);
                let closed = text.len() >= 2 && text.chars().next() == text.chars().last();
                if !closed {
                    return Err(input.new_custom_error(StylesheetError::UnterminatedString { line }));
                }
            }
            Token::BadString(_) => {
                return Err(input.new_custom_error(StylesheetError::UnterminatedString { line }));
            }
            Token::CloseCurlyBracket if top_level => {
                return Err(input.new_custom_error(StylesheetError::UnexpectedCloseBrace { line }));
            }
            Token::Semicolon if top_level => {
                pending = None;
                continue;
            }
            Token::CurlyBracketBlock => {
                let inner_end = input.parse_nested_block(|nested| check_tokens(nested, false))?;
                // a closed block leaves the parser one past the inner end
                if input.position() == inner_end {
                    return Err(input.new_custom_error(StylesheetError::UnterminatedBlock { line }));
                }
                pending = None;
                continue;
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                input.parse_nested_block(|nested| check_tokens(nested, false))?;
            }
            _ => {}
        }

        if top_level && pending.is_none() {
            pending = Some(line);
        }
    }

    if let Some(line) = pending {
        return Err(input.new_custom_error(StylesheetError::MissingBlock { line }));
    }
    Ok(input.position())
}

fn into_stylesheet_error(err: CssParseError<'_>) -> StylesheetError {
    match err.kind {
        ParseErrorKind::Custom(e) => e,
        ParseErrorKind::Basic(_) => StylesheetError::Malformed {
            line: err.location.line as usize + 1,
        },
    }
}
