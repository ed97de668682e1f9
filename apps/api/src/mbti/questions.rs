use serde::Serialize;

use crate::mbti::{Dichotomy, Letter};

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOption {
    pub text: &'static str,
    pub letter: Letter,
}

/// A forced-choice question. Option `a` and option `b` vote for the two letters of
/// `dichotomy`, in either order.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub dichotomy: Dichotomy,
    pub a: AnswerOption,
    pub b: AnswerOption,
}

const fn q(
    id: u32,
    dichotomy: Dichotomy,
    text: &'static str,
    a: (&'static str, Letter),
    b: (&'static str, Letter),
) -> Question {
    Question {
        id,
        text,
        dichotomy,
        a: AnswerOption {
            text: a.0,
            letter: a.1,
        },
        b: AnswerOption {
            text: b.0,
            letter: b.1,
        },
    }
}

use Dichotomy::*;
use Letter::*;

pub static QUESTION_BANK: [Question; 20] = [
    q(1, EnergyEI, "After a long week, you recharge by",
        ("Going out with friends", E), ("Spending a quiet evening alone", I)),
    q(2, PerceptionSN, "When learning something new, you prefer",
        ("Concrete examples and step-by-step instructions", S), ("The big picture and underlying ideas", N)),
    q(3, JudgementTF, "When making an important decision, you rely more on",
        ("Logic and objective analysis", T), ("Values and how people will be affected", F)),
    q(4, LifestyleJP, "Your ideal work week is",
        ("Planned in advance with clear deadlines", J), ("Flexible, adapting as things come up", P)),
    q(5, EnergyEI, "In meetings, you usually",
        ("Think things through before speaking", I), ("Think out loud and speak up early", E)),
    q(6, PerceptionSN, "You are more drawn to",
        ("Possibilities and what could be", N), ("Facts and what actually is", S)),
    q(7, JudgementTF, "A colleague's work has a serious flaw. You",
        ("Point it out directly so it gets fixed", T), ("Raise it gently, considering their feelings", F)),
    q(8, LifestyleJP, "Before a trip, you",
        ("Leave room to decide things on the way", P), ("Book everything and make an itinerary", J)),
    q(9, EnergyEI, "At a networking event, you",
        ("Enjoy meeting many new people", E), ("Prefer a few deeper conversations", I)),
    q(10, PerceptionSN, "When describing an event, you focus on",
        ("What happened, in detail", S), ("What it meant and what it suggests", N)),
    q(11, JudgementTF, "You would rather be seen as",
        ("Warm and understanding", F), ("Competent and fair", T)),
    q(12, LifestyleJP, "Unfinished tasks make you feel",
        ("Uneasy until they are done", J), ("Fine, there is always time later", P)),
    q(13, EnergyEI, "You work best",
        ("Alone with focus time", I), ("Collaborating with a team", E)),
    q(14, PerceptionSN, "You trust",
        ("Your hunches and inspiration", N), ("Your experience and proven methods", S)),
    q(15, JudgementTF, "In a debate, winning the argument matters",
        ("More than keeping the peace", T), ("Less than keeping the peace", F)),
    q(16, LifestyleJP, "When starting a project, you",
        ("Dive in and figure it out as you go", P), ("Define the plan and milestones first", J)),
    q(17, EnergyEI, "People describe you as",
        ("Outgoing and energetic", E), ("Reserved and thoughtful", I)),
    q(18, PerceptionSN, "You prefer tasks that are",
        ("Practical with tangible results", S), ("Novel and conceptually challenging", N)),
    q(19, JudgementTF, "When a friend shares a problem, you first",
        ("Offer empathy and support", F), ("Offer a solution", T)),
    q(20, LifestyleJP, "Your workspace is usually",
        ("Organized, with everything in its place", J), ("Creative chaos that works for you", P)),
];

pub fn find_question(id: u32) -> Option<&'static Question> {
    QUESTION_BANK.iter().find(|q| q.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_question_ids_are_unique() {
        let ids: HashSet<u32> = QUESTION_BANK.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), QUESTION_BANK.len());
    }

    #[test]
    fn test_each_question_offers_both_letters_of_its_pair() {
        for question in &QUESTION_BANK {
            let (first, second) = question.dichotomy.letters();
            let offered = [question.a.letter, question.b.letter];
            assert!(offered.contains(&first), "q{} lacks {first:?}", question.id);
            assert!(offered.contains(&second), "q{} lacks {second:?}", question.id);
        }
    }

    #[test]
    fn test_bank_is_balanced_across_dichotomies() {
        for dichotomy in Dichotomy::ALL {
            let count = QUESTION_BANK
                .iter()
                .filter(|q| q.dichotomy == dichotomy)
                .count();
            assert_eq!(count, 5);
        }
    }

    #[test]
    fn test_find_question() {
        assert_eq!(find_question(7).map(|q| q.id), Some(7));
        assert!(find_question(99).is_none());
    }
}
