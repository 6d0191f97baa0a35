//! Champion grade ordering.
//!
//! Grades are a base letter (S best, D worst) with an optional modifier,
//! where `+` beats no modifier beats `-`. Comparison is letter first,
//! then modifier; a better grade compares as less, so ascending sorts
//! put the best grade first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned for grade strings outside the known rank table.
#[derive(Debug, Clone, Error)]
#[error("invalid grade: {0:?}")]
pub struct InvalidGrade(pub String);

/// Base grade letter, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GradeLetter {
    S,
    A,
    B,
    C,
    D,
}

impl GradeLetter {
    /// All letters, best first. Chart category axes use this order.
    pub fn all() -> &'static [GradeLetter] {
        &[
            GradeLetter::S,
            GradeLetter::A,
            GradeLetter::B,
            GradeLetter::C,
            GradeLetter::D,
        ]
    }
}

impl fmt::Display for GradeLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            GradeLetter::S => 'S',
            GradeLetter::A => 'A',
            GradeLetter::B => 'B',
            GradeLetter::C => 'C',
            GradeLetter::D => 'D',
        };
        write!(f, "{}", c)
    }
}

/// Grade modifier, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GradeModifier {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "")]
    Plain,
    #[serde(rename = "-")]
    Minus,
}

impl GradeModifier {
    /// All modifiers, best first. Stacked-series ordering uses this.
    pub fn all() -> &'static [GradeModifier] {
        &[GradeModifier::Plus, GradeModifier::Plain, GradeModifier::Minus]
    }

    /// Suffix as it appears in a grade string (empty for plain).
    pub fn suffix(&self) -> &'static str {
        match self {
            GradeModifier::Plus => "+",
            GradeModifier::Plain => "",
            GradeModifier::Minus => "-",
        }
    }
}

/// A full grade: base letter plus modifier.
///
/// Derived `Ord` compares the letter first, so any S outranks any A
/// regardless of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Grade {
    pub letter: GradeLetter,
    pub modifier: GradeModifier,
}

impl Grade {
    pub fn new(letter: GradeLetter, modifier: GradeModifier) -> Self {
        Self { letter, modifier }
    }

    /// The worst grade in the table, used when clamping unknown input.
    pub fn lowest() -> Self {
        Self::new(GradeLetter::D, GradeModifier::Minus)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.modifier.suffix())
    }
}

impl FromStr for Grade {
    type Err = InvalidGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = match chars.next() {
            Some('S') => GradeLetter::S,
            Some('A') => GradeLetter::A,
            Some('B') => GradeLetter::B,
            Some('C') => GradeLetter::C,
            Some('D') => GradeLetter::D,
            _ => return Err(InvalidGrade(s.to_string())),
        };
        let modifier = match chars.next() {
            None => GradeModifier::Plain,
            Some('+') => GradeModifier::Plus,
            Some('-') => GradeModifier::Minus,
            Some(_) => return Err(InvalidGrade(s.to_string())),
        };
        if chars.next().is_some() {
            return Err(InvalidGrade(s.to_string()));
        }
        Ok(Grade { letter, modifier })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(s: &str) -> Grade {
        s.parse().unwrap()
    }

    #[test]
    fn test_modifier_order_within_letter() {
        assert!(grade("S+") < grade("S"));
        assert!(grade("S") < grade("S-"));
    }

    #[test]
    fn test_letter_dominates_modifier() {
        // S- still beats A+
        assert!(grade("S-") < grade("A+"));
        assert!(grade("B+") < grade("C+"));
    }

    #[test]
    fn test_full_descending_sort() {
        let mut grades = vec![grade("C"), grade("S-"), grade("A+"), grade("S+"), grade("D-")];
        grades.sort();
        let shown: Vec<String> = grades.iter().map(|g| g.to_string()).collect();
        assert_eq!(shown, vec!["S+", "S-", "A+", "C", "D-"]);
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        for raw in ["S+", "S", "S-", "A", "B-", "C+", "D"] {
            assert_eq!(grade(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_invalid_grades_rejected() {
        for raw in ["", "E", "S*", "S+-", "null"] {
            assert!(raw.parse::<Grade>().is_err(), "{:?} should not parse", raw);
        }
    }

    #[test]
    fn test_lowest_is_d_minus() {
        assert_eq!(Grade::lowest(), grade("D-"));
        assert!(grade("D") < Grade::lowest());
    }
}
