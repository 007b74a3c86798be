//! Canonical serialization of parsed selectors.
//! Reference: <https://drafts.csswg.org/cssom/#serializing-selectors>

use crate::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, NthExpr,
    SelectorList, SimpleSelector,
};
use core::fmt::{self, Display, Formatter, Write as _};

/// Write `ident` escaped so that it parses back to the same identifier.
fn write_ident(out: &mut Formatter<'_>, ident: &str) -> fmt::Result {
    for (index, character) in ident.chars().enumerate() {
        if index == 0 && character.is_ascii_digit() {
            write!(out, "\\{:x} ", u32::from(character))?;
        } else if character.is_ascii_alphanumeric()
            || matches!(character, '-' | '_')
            || !character.is_ascii()
        {
            out.write_char(character)?;
        } else {
            write!(out, "\\{character}")?;
        }
    }
    Ok(())
}

/// Write `value` as a double-quoted string.
fn write_string(out: &mut Formatter<'_>, value: &str) -> fmt::Result {
    out.write_char('"')?;
    for character in value.chars() {
        if matches!(character, '"' | '\\') {
            out.write_char('\\')?;
        }
        out.write_char(character)?;
    }
    out.write_char('"')
}

impl Display for NthExpr {
    fn fmt(&self, out: &mut Formatter<'_>) -> fmt::Result {
        match (self.step, self.offset) {
            (0, offset) => write!(out, "{offset}"),
            (step, 0) => write!(out, "{step}n"),
            (step, offset) => write!(out, "{step}n{offset:+}"),
        }
    }
}

impl Display for AttributeSelector {
    fn fmt(&self, out: &mut Formatter<'_>) -> fmt::Result {
        out.write_char('[')?;
        write_ident(out, &self.name)?;
        if let Some((operator, value)) = &self.value {
            out.write_str(match operator {
                AttrOperator::Equals => "=",
                AttrOperator::Includes => "~=",
                AttrOperator::DashMatch => "|=",
                AttrOperator::Prefix => "^=",
                AttrOperator::Suffix => "$=",
                AttrOperator::Substring => "*=",
            })?;
            write_string(out, value)?;
        }
        out.write_char(']')
    }
}

impl Display for SimpleSelector {
    fn fmt(&self, out: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write_ident(out, name),
            Self::Universal => out.write_char('*'),
            Self::IdSelector(id) => {
                out.write_char('#')?;
                write_ident(out, id)
            }
            Self::Class(class) => {
                out.write_char('.')?;
                write_ident(out, class)
            }
            Self::Attribute(attribute) => attribute.fmt(out),
            Self::Not(list) => write!(out, ":not({list})"),
            Self::NthChild(expr) => write!(out, ":nth-child({expr})"),
            Self::NthLastChild(expr) => write!(out, ":nth-last-child({expr})"),
            Self::FirstChild => out.write_str(":first-child"),
            Self::LastChild => out.write_str(":last-child"),
            Self::OnlyChild => out.write_str(":only-child"),
        }
    }
}

impl Display for CompoundSelector {
    fn fmt(&self, out: &mut Formatter<'_>) -> fmt::Result {
        self.simples.iter().try_for_each(|simple| simple.fmt(out))
    }
}

impl Display for Combinator {
    fn fmt(&self, out: &mut Formatter<'_>) -> fmt::Result {
        out.write_str(match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::AdjacentSibling => " + ",
            Self::GeneralSibling => " ~ ",
        })
    }
}

impl Display for ComplexSelector {
    fn fmt(&self, out: &mut Formatter<'_>) -> fmt::Result {
        self.first.fmt(out)?;
        for (combinator, compound) in &self.rest {
            write!(out, "{combinator}{compound}")?;
        }
        Ok(())
    }
}

impl Display for SelectorList {
    fn fmt(&self, out: &mut Formatter<'_>) -> fmt::Result {
        for (index, complex) in self.selectors.iter().enumerate() {
            if index > 0 {
                out.write_str(", ")?;
            }
            complex.fmt(out)?;
        }
        Ok(())
    }
}
