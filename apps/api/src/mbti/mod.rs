//! MBTI quiz: fixed question bank, tally scoring, and the type description table.

pub mod descriptions;
pub mod handlers;
pub mod questions;
pub mod scoring;

use serde::{Deserialize, Serialize};

/// One of the eight preference letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    E,
    I,
    S,
    N,
    T,
    F,
    J,
    P,
}

impl Letter {
    pub fn as_char(self) -> char {
        match self {
            Letter::E => 'E',
            Letter::I => 'I',
            Letter::S => 'S',
            Letter::N => 'N',
            Letter::T => 'T',
            Letter::F => 'F',
            Letter::J => 'J',
            Letter::P => 'P',
        }
    }
}

/// The four opposing pairs, in type-code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dichotomy {
    #[serde(rename = "EI")]
    EnergyEI,
    #[serde(rename = "SN")]
    PerceptionSN,
    #[serde(rename = "TF")]
    JudgementTF,
    #[serde(rename = "JP")]
    LifestyleJP,
}

impl Dichotomy {
    pub const ALL: [Dichotomy; 4] = [
        Dichotomy::EnergyEI,
        Dichotomy::PerceptionSN,
        Dichotomy::JudgementTF,
        Dichotomy::LifestyleJP,
    ];

    pub fn letters(self) -> (Letter, Letter) {
        match self {
            Dichotomy::EnergyEI => (Letter::E, Letter::I),
            Dichotomy::PerceptionSN => (Letter::S, Letter::N),
            Dichotomy::JudgementTF => (Letter::T, Letter::F),
            Dichotomy::LifestyleJP => (Letter::J, Letter::P),
        }
    }
}

/// Normalizes a user-supplied code (`" intj "` → `"INTJ"`) if it is one of the 16
/// canonical types.
pub fn normalize_type_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    let bytes = code.as_bytes();
    if bytes.len() != 4 {
        return None;
    }
    let valid = Dichotomy::ALL.iter().zip(bytes).all(|(d, &b)| {
        let (first, second) = d.letters();
        b as char == first.as_char() || b as char == second.as_char()
    });
    valid.then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepts_canonical_codes() {
        assert_eq!(normalize_type_code("intj").as_deref(), Some("INTJ"));
        assert_eq!(normalize_type_code(" EsFp ").as_deref(), Some("ESFP"));
    }

    #[test]
    fn test_normalize_rejects_other_strings() {
        for raw in ["", "INT", "INTJX", "IETJ", "ABCD", "NITJ"] {
            assert_eq!(normalize_type_code(raw), None, "{raw} should be rejected");
        }
    }
}
