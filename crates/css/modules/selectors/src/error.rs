//! Selector syntax errors.

use thiserror::Error;

/// A malformed selector string. Offsets are byte offsets into the parsed text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("selector is empty")]
    Empty,

    #[error("expected a compound selector at offset {position}")]
    EmptyCompound { position: usize },

    #[error("unexpected character {found:?} at offset {position}")]
    UnexpectedCharacter { found: char, position: usize },

    #[error("unbalanced parenthesis at offset {position}")]
    UnbalancedParenthesis { position: usize },

    #[error("unclosed attribute selector at offset {position}")]
    UnbalancedBracket { position: usize },

    #[error("unterminated string starting at offset {position}")]
    UnterminatedString { position: usize },

    #[error("unknown pseudo-class ':{name}' at offset {position}")]
    UnknownPseudoClass { name: String, position: usize },

    #[error("invalid an+b expression {argument:?}")]
    InvalidNthExpression { argument: String },

    #[error("invalid attribute selector at offset {position}")]
    InvalidAttributeSelector { position: usize },

    #[error("selector nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}
