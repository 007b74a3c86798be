//! The `an+b` micro-syntax used by `:nth-child()` and `:nth-last-child()`.
//! Reference: <https://www.w3.org/TR/css-syntax-3/#anb-microsyntax>

use crate::SyntaxError;

/// `step * k + offset` for `k >= 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NthExpr {
    pub step: i32,
    pub offset: i32,
}

impl NthExpr {
    /// `odd`, i.e. `2n+1`.
    pub const ODD: Self = Self { step: 2, offset: 1 };
    /// `even`, i.e. `2n`.
    pub const EVEN: Self = Self { step: 2, offset: 0 };

    /// True if the 1-based `position` is selected.
    pub fn matches(self, position: usize) -> bool {
        let Ok(position) = i64::try_from(position) else {
            return false;
        };
        let step = i64::from(self.step);
        let diff = position - i64::from(self.offset);
        if step == 0 {
            return diff == 0;
        }
        diff % step == 0 && diff / step >= 0
    }

    /// Parse the text between the parentheses. Leading and trailing whitespace
    /// is ignored. Inside, whitespace may only surround the sign of `b`.
    ///
    /// # Errors
    /// Returns [`SyntaxError::InvalidNthExpression`] if the argument is not valid `an+b`.
    pub fn parse(argument: &str) -> Result<Self, SyntaxError> {
        let invalid = || SyntaxError::InvalidNthExpression {
            argument: argument.trim().to_owned(),
        };
        let lowered = argument.trim_ascii().to_ascii_lowercase();

        match lowered.as_str() {
            "" => Err(invalid()),
            "odd" => Ok(Self::ODD),
            "even" => Ok(Self::EVEN),
            other => {
                let Some((step_part, offset_part)) = other.split_once('n') else {
                    let offset = parse_signed(other).ok_or_else(invalid)?;
                    return Ok(Self { step: 0, offset });
                };
                let step = match step_part {
                    "" | "+" => 1,
                    "-" => -1,
                    digits => parse_signed(digits).ok_or_else(invalid)?,
                };
                let offset_part = offset_part.trim_ascii_start();
                if offset_part.is_empty() {
                    return Ok(Self { step, offset: 0 });
                }
                let (sign, digits) = if let Some(digits) = offset_part.strip_prefix('+') {
                    ('+', digits)
                } else if let Some(digits) = offset_part.strip_prefix('-') {
                    ('-', digits)
                } else {
                    return Err(invalid());
                };
                let offset = parse_signed(&format!("{sign}{}", digits.trim_ascii_start()))
                    .ok_or_else(invalid)?;
                Ok(Self { step, offset })
            }
        }
    }
}

/// Parse an optionally signed decimal integer made only of ASCII digits.
fn parse_signed(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_integers() -> Result<(), SyntaxError> {
        assert_eq!(NthExpr::parse("odd")?, NthExpr::ODD);
        assert_eq!(NthExpr::parse(" EVEN ")?, NthExpr::EVEN);
        assert_eq!(NthExpr::parse("\n3\n")?, NthExpr { step: 0, offset: 3 });
        assert_eq!(NthExpr::parse("-n + 3")?, NthExpr { step: -1, offset: 3 });
        assert_eq!(NthExpr::parse("3n-2")?, NthExpr { step: 3, offset: -2 });
        assert_eq!(NthExpr::parse("+n")?, NthExpr { step: 1, offset: 0 });
        assert_eq!(NthExpr::parse("2n+ 1")?, NthExpr { step: 2, offset: 1 });
        assert_eq!(NthExpr::parse(" -2n -\t4 ")?, NthExpr { step: -2, offset: -4 });
        Ok(())
    }

    #[test]
    fn rejects_malformed_arguments() {
        for argument in [
            "", "n+", "2n3", "foo", "3.5", "nn", "1-", "2 n", "- n+1", "1 0", "+ 3", "2n+ -1",
            "2n - - 1", "2n 1",
        ] {
            assert!(
                matches!(NthExpr::parse(argument), Err(_)),
                "{argument:?} should not parse"
            );
        }
    }

    #[test]
    fn positions_are_one_based() {
        let even = NthExpr::EVEN;
        assert!(!even.matches(1));
        assert!(even.matches(2));
        assert!(even.matches(4));

        let first_three = NthExpr { step: -1, offset: 3 };
        let selected: Vec<usize> = (1..=6).filter(|&pos| first_three.matches(pos)).collect();
        assert_eq!(selected, vec![1, 2, 3]);

        let exact = NthExpr { step: 0, offset: 2 };
        assert!(exact.matches(2));
        assert!(!exact.matches(4));
    }
}
