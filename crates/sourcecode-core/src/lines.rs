//! Parsing of the `highlight` attribute into a set of line numbers.
//!
//! The grammar is a `;`- or `,`-separated list of instructions, each either a
//! single 1-based line number or an inclusive range `A-B`. Ranges are
//! order-independent. Every instruction stands on its own: a malformed one is
//! skipped without affecting the rest.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use smol_str::ToSmolStr;

use crate::error::AttributeError;

/// One parsed instruction of the `highlight` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInstruction {
    Single(usize),
    Range(RangeInclusive<usize>),
}

impl LineInstruction {
    /// Parse one instruction such as `4` or `6-4`.
    pub fn parse(instruction: &str) -> Result<Self, AttributeError> {
        let instruction = instruction.trim();
        let invalid = || AttributeError::InvalidLineInstruction(instruction.to_smolstr());

        let parse_line = |s: &str| -> Result<usize, AttributeError> {
            let line = s.trim().parse::<usize>().map_err(|_| invalid())?;
            if line == 0 {
                return Err(AttributeError::ZeroLine(instruction.to_smolstr()));
            }
            Ok(line)
        };

        match instruction.split_once('-') {
            None => parse_line(instruction).map(LineInstruction::Single),
            Some((a, b)) => {
                let (a, b) = (parse_line(a)?, parse_line(b)?);
                Ok(LineInstruction::Range(a.min(b)..=a.max(b)))
            }
        }
    }

    /// Line numbers covered by this instruction that exist in a block of
    /// `line_count` lines.
    pub fn lines_within(&self, line_count: usize) -> RangeInclusive<usize> {
        let (start, end) = match self {
            LineInstruction::Single(line) => (*line, *line),
            LineInstruction::Range(range) => (*range.start(), *range.end()),
        };
        start..=end.min(line_count)
    }
}

/// Parse every instruction in a `highlight` attribute value, keeping the
/// well-formed ones.
pub fn parse_instructions(value: &str) -> Vec<LineInstruction> {
    value.split([';', ','])
        .filter(|part| !part.trim().is_empty())
        .filter_map(|part| match LineInstruction::parse(part) {
            Ok(instruction) => Some(instruction),
            Err(e) => {
                tracing::debug!("skipping highlight instruction: {e}");
                None
            }
        })
        .collect()
}

/// Resolve a `highlight` attribute value against a block of `line_count`
/// lines. Returns 1-based line numbers; lines past the end are dropped.
pub fn highlighted_lines(value: &str, line_count: usize) -> BTreeSet<usize> {
    parse_instructions(value)
        .iter()
        .flat_map(|instruction| instruction.lines_within(line_count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(value: &str, count: usize) -> Vec<usize> {
        highlighted_lines(value, count).into_iter().collect()
    }

    #[test]
    fn test_single_and_range() {
        assert_eq!(lines("2;4-6", 10), vec![2, 4, 5, 6]);
    }

    #[test]
    fn test_reversed_range_is_sorted() {
        assert_eq!(lines("6-4", 10), lines("4-6", 10));
    }

    #[test]
    fn test_out_of_range_ignored() {
        assert!(lines("99", 10).is_empty());
        assert_eq!(lines("8-12", 10), vec![8, 9, 10]);
    }

    #[test]
    fn test_comma_separator_and_whitespace() {
        assert_eq!(lines(" 1 , 3 - 4 ;", 5), vec![1, 3, 4]);
    }

    #[test]
    fn test_malformed_instructions_do_not_abort() {
        assert_eq!(lines("x;2;1-;0;3-a;5", 10), vec![2, 5]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            LineInstruction::parse("abc"),
            Err(AttributeError::InvalidLineInstruction("abc".into()))
        );
        assert_eq!(
            LineInstruction::parse("0-3"),
            Err(AttributeError::ZeroLine("0-3".into()))
        );
        assert_eq!(LineInstruction::parse("6-4"), Ok(LineInstruction::Range(4..=6)));
    }

    #[test]
    fn test_empty_block() {
        assert!(lines("1-3", 0).is_empty());
    }
}
