//! Tally scoring.
//!
//! Each answer casts one vote for one letter. Per dichotomy the letter with more votes
//! wins; on a tie the second letter of the pair (I, N, F, P) wins.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mbti::descriptions::{describe, TypeDescription};
use crate::mbti::questions::{find_question, QUESTION_BANK};
use crate::mbti::{Dichotomy, Letter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    A,
    B,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Answer {
    pub question_id: u32,
    #[serde(alias = "option")]
    pub choice: Choice,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("unknown question id {0}")]
    UnknownQuestion(u32),

    #[error("question {0} answered more than once")]
    Duplicate(u32),

    #[error("{answered} of {expected} questions answered")]
    Incomplete { answered: usize, expected: usize },
}

/// Vote counts for the eight letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LetterCounts {
    #[serde(rename = "E")]
    pub e: u32,
    #[serde(rename = "I")]
    pub i: u32,
    #[serde(rename = "S")]
    pub s: u32,
    #[serde(rename = "N")]
    pub n: u32,
    #[serde(rename = "T")]
    pub t: u32,
    #[serde(rename = "F")]
    pub f: u32,
    #[serde(rename = "J")]
    pub j: u32,
    #[serde(rename = "P")]
    pub p: u32,
}

impl LetterCounts {
    pub fn tally<I: IntoIterator<Item = Letter>>(votes: I) -> Self {
        let mut counts = Self::default();
        for letter in votes {
            *counts.slot(letter) += 1;
        }
        counts
    }

    fn slot(&mut self, letter: Letter) -> &mut u32 {
        match letter {
            Letter::E => &mut self.e,
            Letter::I => &mut self.i,
            Letter::S => &mut self.s,
            Letter::N => &mut self.n,
            Letter::T => &mut self.t,
            Letter::F => &mut self.f,
            Letter::J => &mut self.j,
            Letter::P => &mut self.p,
        }
    }

    pub fn get(&self, letter: Letter) -> u32 {
        match letter {
            Letter::E => self.e,
            Letter::I => self.i,
            Letter::S => self.s,
            Letter::N => self.n,
            Letter::T => self.t,
            Letter::F => self.f,
            Letter::J => self.j,
            Letter::P => self.p,
        }
    }

    /// Majority letter of one dichotomy. Ties go to the second letter.
    pub fn winner(&self, dichotomy: Dichotomy) -> Letter {
        let (first, second) = dichotomy.letters();
        if self.get(first) > self.get(second) {
            first
        } else {
            second
        }
    }

    pub fn type_code(&self) -> String {
        Dichotomy::ALL
            .iter()
            .map(|d| self.winner(*d).as_char())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MbtiResult {
    pub type_code: String,
    pub counts: LetterCounts,
    pub description: &'static TypeDescription,
}

/// Scores a complete answer sheet against the question bank.
pub fn score_answers(answers: &[Answer]) -> Result<MbtiResult, ScoreError> {
    let mut seen = HashSet::new();
    let mut votes = Vec::with_capacity(answers.len());

    for answer in answers {
        let question =
            find_question(answer.question_id).ok_or(ScoreError::UnknownQuestion(answer.question_id))?;
        if !seen.insert(answer.question_id) {
            return Err(ScoreError::Duplicate(answer.question_id));
        }
        votes.push(match answer.choice {
            Choice::A => question.a.letter,
            Choice::B => question.b.letter,
        });
    }

    if seen.len() != QUESTION_BANK.len() {
        return Err(ScoreError::Incomplete {
            answered: seen.len(),
            expected: QUESTION_BANK.len(),
        });
    }

    let counts = LetterCounts::tally(votes);
    let type_code = counts.type_code();
    Ok(MbtiResult {
        description: describe(&type_code),
        type_code,
        counts,
    })
}
