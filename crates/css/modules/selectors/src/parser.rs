//! CSS selector parsing.
//! Reference: <https://www.w3.org/TR/selectors-4/#grammar>

use crate::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, NthExpr,
    SelectorList, SimpleSelector, SyntaxError,
};

/// Default cap on `:not()` nesting.
pub const DEFAULT_MAX_NESTING: usize = 32;

/// Hard upper bound on any configured `:not()` nesting limit. Larger limits are
/// lowered to this so parsing recursion stays within a thread's stack.
pub const MAX_NESTING_CEILING: usize = 256;

/// Recursive-descent parser over a selector string.
struct SelectorParser<'input> {
    /// Source text.
    input: &'input str,
    /// Current cursor (byte offset) into `input`.
    index: usize,
    /// Current `:not()` nesting depth.
    depth: usize,
    /// Maximum permitted nesting depth.
    max_depth: usize,
}

impl<'input> SelectorParser<'input> {
    /// Construct a parser from input.
    #[inline]
    const fn new(input: &'input str, max_depth: usize) -> Self {
        Self {
            input,
            index: 0,
            depth: 0,
            max_depth,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input.get(self.index..)?.chars().next()
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.index).copied()
    }

    #[inline]
    fn bump(&mut self, character: char) {
        self.index = self.index.saturating_add(character.len_utf8());
    }

    /// Skip ASCII whitespace, returning whether any was consumed.
    #[inline]
    fn skip_whitespace(&mut self) -> bool {
        let start = self.index;
        while self.peek_byte().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.index = self.index.saturating_add(1);
        }
        self.index != start
    }

    fn unexpected(&self) -> SyntaxError {
        self.peek().map_or(
            SyntaxError::EmptyCompound {
                position: self.index,
            },
            |found| SyntaxError::UnexpectedCharacter {
                found,
                position: self.index,
            },
        )
    }

    /// Parse comma-separated complex selectors until end of input, or until `)` when nested.
    fn parse_list(&mut self, nested: bool) -> Result<SelectorList, SyntaxError> {
        let mut list = SelectorList::default();
        loop {
            self.skip_whitespace();
            list.selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.bump(','),
                Some(')') if nested => return Ok(list),
                None if !nested => return Ok(list),
                None => {
                    return Err(SyntaxError::UnbalancedParenthesis {
                        position: self.index,
                    });
                }
                Some(')') => {
                    return Err(SyntaxError::UnbalancedParenthesis {
                        position: self.index,
                    });
                }
                Some(found) => {
                    return Err(SyntaxError::UnexpectedCharacter {
                        found,
                        position: self.index,
                    });
                }
            }
        }
    }

    /// Parse one complex selector: compounds joined by combinators.
    fn parse_complex(&mut self) -> Result<ComplexSelector, SyntaxError> {
        let first = self.parse_required_compound()?;
        let mut rest = Vec::new();
        loop {
            let saw_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',' | ')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::AdjacentSibling,
                Some('~') => Combinator::GeneralSibling,
                Some(_) if saw_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.index = self.index.saturating_add(1);
                self.skip_whitespace();
            }
            rest.push((combinator, self.parse_required_compound()?));
        }
        Ok(ComplexSelector { first, rest })
    }

    /// Parse a compound selector, failing if it has no simple selectors.
    fn parse_required_compound(&mut self) -> Result<CompoundSelector, SyntaxError> {
        let position = self.index;
        let compound = self.parse_compound()?;
        if compound.simples.is_empty() {
            return match self.peek() {
                Some('>' | '+' | '~' | ',' | ')') | None => {
                    Err(SyntaxError::EmptyCompound { position })
                }
                Some(_) => Err(self.unexpected()),
            };
        }
        Ok(compound)
    }

    /// Parse simple selectors that follow each other with no separator.
    fn parse_compound(&mut self) -> Result<CompoundSelector, SyntaxError> {
        let mut compound = CompoundSelector::default();
        while let Some(current) = self.peek() {
            let simple = match current {
                '*' if compound.simples.is_empty() => {
                    self.bump('*');
                    SimpleSelector::Universal
                }
                '.' => {
                    self.bump('.');
                    SimpleSelector::Class(self.consume_required_ident()?)
                }
                '#' => {
                    self.bump('#');
                    SimpleSelector::IdSelector(self.consume_required_ident()?)
                }
                '[' => SimpleSelector::Attribute(self.consume_attr()?),
                ':' => self.consume_pseudo()?,
                _ if compound.simples.is_empty() && starts_ident(current) => {
                    SimpleSelector::Type(self.consume_ident())
                }
                _ => break,
            };
            compound.simples.push(simple);
        }
        Ok(compound)
    }

    /// Consume an identifier (possibly empty), resolving backslash escapes.
    fn consume_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(current) = self.peek() {
            if current == '\\' {
                self.bump('\\');
                if let Some(escaped) = self.consume_escape() {
                    out.push(escaped);
                }
            } else if continues_ident(current) {
                out.push(current);
                self.bump(current);
            } else {
                break;
            }
        }
        out
    }

    fn consume_required_ident(&mut self) -> Result<String, SyntaxError> {
        if !self.peek().is_some_and(starts_ident) {
            return Err(self.unexpected());
        }
        Ok(self.consume_ident())
    }

    /// Resolve the escape following a consumed backslash.
    /// Up to six hex digits name a code point; anything else is taken literally.
    /// A backslash at end of input stands for U+FFFD.
    fn consume_escape(&mut self) -> Option<char> {
        let rest = self.input.get(self.index..)?;
        let hex_len = rest
            .bytes()
            .take(6)
            .take_while(u8::is_ascii_hexdigit)
            .count();
        if hex_len == 0 {
            let Some(literal) = self.peek() else {
                return Some(char::REPLACEMENT_CHARACTER);
            };
            self.bump(literal);
            return Some(literal);
        }
        let code = u32::from_str_radix(rest.get(..hex_len)?, 16).ok()?;
        self.index = self.index.saturating_add(hex_len);
        if self.peek_byte().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.index = self.index.saturating_add(1);
        }
        Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Parse an attribute selector: `[name]` or `[name op value]`, value bare or quoted.
    fn consume_attr(&mut self) -> Result<AttributeSelector, SyntaxError> {
        let open = self.index;
        self.bump('[');
        self.skip_whitespace();
        let name = self.consume_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(SyntaxError::InvalidAttributeSelector { position: open });
        }
        self.skip_whitespace();
        let operator = match self.peek() {
            Some(']') => {
                self.bump(']');
                return Ok(AttributeSelector { name, value: None });
            }
            None => return Err(SyntaxError::UnbalancedBracket { position: open }),
            Some('=') => {
                self.bump('=');
                AttrOperator::Equals
            }
            Some(prefix @ ('~' | '|' | '^' | '$' | '*')) => {
                self.bump(prefix);
                if self.peek() != Some('=') {
                    return Err(SyntaxError::InvalidAttributeSelector { position: open });
                }
                self.bump('=');
                match prefix {
                    '~' => AttrOperator::Includes,
                    '|' => AttrOperator::DashMatch,
                    '^' => AttrOperator::Prefix,
                    '$' => AttrOperator::Suffix,
                    _ => AttrOperator::Substring,
                }
            }
            Some(_) => return Err(SyntaxError::InvalidAttributeSelector { position: open }),
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.consume_quoted(quote)?,
            Some(current) if starts_ident(current) || current.is_ascii_digit() => {
                self.consume_bare_value()
            }
            None => return Err(SyntaxError::UnbalancedBracket { position: open }),
            Some(_) => return Err(SyntaxError::InvalidAttributeSelector { position: open }),
        };
        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.bump(']');
                Ok(AttributeSelector {
                    name,
                    value: Some((operator, value)),
                })
            }
            None => Err(SyntaxError::UnbalancedBracket { position: open }),
            Some(_) => Err(SyntaxError::InvalidAttributeSelector { position: open }),
        }
    }

    /// Consume an unquoted attribute value until whitespace or a closing bracket.
    fn consume_bare_value(&mut self) -> String {
        let mut out = String::new();
        while let Some(current) = self.peek() {
            if current == '\\' {
                self.bump('\\');
                if let Some(escaped) = self.consume_escape() {
                    out.push(escaped);
                }
            } else if continues_ident(current) {
                out.push(current);
                self.bump(current);
            } else {
                break;
            }
        }
        out
    }

    /// Consume a quoted string, the cursor sitting on the opening quote.
    fn consume_quoted(&mut self, quote: char) -> Result<String, SyntaxError> {
        let start = self.index;
        self.bump(quote);
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(SyntaxError::UnterminatedString { position: start }),
                Some(current) if current == quote => {
                    self.bump(quote);
                    return Ok(out);
                }
                Some('\\') => {
                    self.bump('\\');
                    match self.peek() {
                        None => return Err(SyntaxError::UnterminatedString { position: start }),
                        // Escaped newline is a line continuation.
                        Some('\n') => self.bump('\n'),
                        Some(_) => {
                            if let Some(escaped) = self.consume_escape() {
                                out.push(escaped);
                            }
                        }
                    }
                }
                Some(current) => {
                    out.push(current);
                    self.bump(current);
                }
            }
        }
    }

    /// Parse a pseudo-class, the cursor sitting on ':'.
    fn consume_pseudo(&mut self) -> Result<SimpleSelector, SyntaxError> {
        let position = self.index;
        self.bump(':');
        let name = self.consume_required_ident()?.to_ascii_lowercase();
        let has_argument = self.peek() == Some('(');
        match (name.as_str(), has_argument) {
            ("not", true) => self.consume_not_argument(),
            ("nth-child", true) => Ok(SimpleSelector::NthChild(self.consume_nth_argument()?)),
            ("nth-last-child", true) => {
                Ok(SimpleSelector::NthLastChild(self.consume_nth_argument()?))
            }
            ("first-child", false) => Ok(SimpleSelector::FirstChild),
            ("last-child", false) => Ok(SimpleSelector::LastChild),
            ("only-child", false) => Ok(SimpleSelector::OnlyChild),
            ("not" | "nth-child" | "nth-last-child", false) => Err(self.unexpected()),
            ("first-child" | "last-child" | "only-child", true) => {
                Err(SyntaxError::UnexpectedCharacter {
                    found: '(',
                    position: self.index,
                })
            }
            _ => Err(SyntaxError::UnknownPseudoClass { name, position }),
        }
    }

    /// Parse `(selector-list)` for `:not`, recursing into the list grammar.
    fn consume_not_argument(&mut self) -> Result<SimpleSelector, SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(SyntaxError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        self.bump('(');
        self.depth = self.depth.saturating_add(1);
        let list = self.parse_list(true)?;
        self.depth = self.depth.saturating_sub(1);
        self.bump(')');
        Ok(SimpleSelector::Not(list))
    }

    /// Parse `(an+b)` up to the closing parenthesis.
    fn consume_nth_argument(&mut self) -> Result<NthExpr, SyntaxError> {
        let open = self.index;
        self.bump('(');
        let rest = self.input.get(self.index..).unwrap_or_default();
        let Some(close) = rest.find([')', '(']) else {
            return Err(SyntaxError::UnbalancedParenthesis { position: open });
        };
        let argument = rest.get(..close).unwrap_or_default();
        if rest.as_bytes().get(close) == Some(&b'(') {
            return Err(SyntaxError::InvalidNthExpression {
                argument: argument.trim().to_owned(),
            });
        }
        let expr = NthExpr::parse(argument)?;
        self.index = self.index.saturating_add(close).saturating_add(1);
        Ok(expr)
    }
}

/// True if `character` may start an identifier.
fn starts_ident(character: char) -> bool {
    character.is_ascii_alphabetic()
        || matches!(character, '-' | '_' | '\\')
        || !character.is_ascii()
}

/// True if `character` may continue an identifier.
fn continues_ident(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_') || !character.is_ascii()
}

/// Parse a selector list from CSS text with the default nesting limit.
///
/// # Errors
/// Returns a [`SyntaxError`] if `input` is not a valid selector list.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SyntaxError> {
    parse_selector_list_with_limit(input, DEFAULT_MAX_NESTING)
}

/// Parse a selector list, allowing at most `max_nesting` levels of `:not()`.
/// `max_nesting` is capped at [`MAX_NESTING_CEILING`].
///
/// # Errors
/// Returns a [`SyntaxError`] if `input` is not a valid selector list or nests too deeply.
pub fn parse_selector_list_with_limit(
    input: &str,
    max_nesting: usize,
) -> Result<SelectorList, SyntaxError> {
    if input.trim_ascii().is_empty() {
        return Err(SyntaxError::Empty);
    }
    let mut parser = SelectorParser::new(input, max_nesting.min(MAX_NESTING_CEILING));
    let list = parser.parse_list(false)?;
    log::trace!(target: "css_selectors", "parsed {input:?} into {} selector(s)", list.selectors.len());
    Ok(list)
}
