use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TypeDescription {
    pub code: &'static str,
    pub nickname: &'static str,
    pub summary: &'static str,
    pub strengths: &'static [&'static str],
    pub suited_roles: &'static [&'static str],
}

pub static FALLBACK_DESCRIPTION: TypeDescription = TypeDescription {
    code: "UNKNOWN",
    nickname: "Undetermined type",
    summary: "Your personality type could not be determined. Complete the quiz to get \
              tailored insights about your working style.",
    strengths: &["Adaptability"],
    suited_roles: &["Explore roles across different fields"],
};

pub static DESCRIPTIONS: [TypeDescription; 16] = [
    TypeDescription {
        code: "ISTJ",
        nickname: "The Inspector",
        summary: "Responsible, thorough and dependable. Values order, facts and clear procedures.",
        strengths: &["Reliability", "Attention to detail", "Organization"],
        suited_roles: &["Accountant", "Auditor", "Systems Administrator", "Quality Analyst"],
    },
    TypeDescription {
        code: "ISFJ",
        nickname: "The Protector",
        summary: "Warm, conscientious and loyal. Quietly committed to supporting others.",
        strengths: &["Supportiveness", "Patience", "Practical care"],
        suited_roles: &["Nurse", "HR Specialist", "Customer Success Manager", "Teacher"],
    },
    TypeDescription {
        code: "INFJ",
        nickname: "The Counselor",
        summary: "Insightful and principled. Seeks meaning and long-term impact for people.",
        strengths: &["Empathy", "Vision", "Written communication"],
        suited_roles: &["Psychologist", "UX Researcher", "Writer", "Counselor"],
    },
    TypeDescription {
        code: "INTJ",
        nickname: "The Architect",
        summary: "Strategic and independent. Builds long-range plans and improves systems.",
        strengths: &["Strategic thinking", "Independence", "Problem solving"],
        suited_roles: &["Software Architect", "Data Scientist", "Strategy Consultant", "Engineer"],
    },
    TypeDescription {
        code: "ISTP",
        nickname: "The Craftsman",
        summary: "Practical and analytical. Enjoys understanding how things work hands-on.",
        strengths: &["Troubleshooting", "Calm under pressure", "Technical skill"],
        suited_roles: &["Mechanical Engineer", "DevOps Engineer", "Technician", "Pilot"],
    },
    TypeDescription {
        code: "ISFP",
        nickname: "The Composer",
        summary: "Gentle, observant and creative. Expresses values through craft and action.",
        strengths: &["Aesthetic sense", "Flexibility", "Kindness"],
        suited_roles: &["Graphic Designer", "Photographer", "Veterinary Assistant", "Chef"],
    },
    TypeDescription {
        code: "INFP",
        nickname: "The Healer",
        summary: "Idealistic and curious. Driven by personal values and creative expression.",
        strengths: &["Creativity", "Empathy", "Open-mindedness"],
        suited_roles: &["Content Writer", "Social Worker", "Illustrator", "Community Manager"],
    },
    TypeDescription {
        code: "INTP",
        nickname: "The Thinker",
        summary: "Logical and inventive. Loves theories, models and abstract problems.",
        strengths: &["Analysis", "Originality", "Objectivity"],
        suited_roles: &["Researcher", "Backend Developer", "Mathematician", "Data Analyst"],
    },
    TypeDescription {
        code: "ESTP",
        nickname: "The Dynamo",
        summary: "Energetic and pragmatic. Acts fast and thrives on immediate results.",
        strengths: &["Negotiation", "Adaptability", "Action orientation"],
        suited_roles: &["Sales Executive", "Entrepreneur", "Paramedic", "Field Engineer"],
    },
    TypeDescription {
        code: "ESFP",
        nickname: "The Performer",
        summary: "Spontaneous and enthusiastic. Brings energy and fun to the people around them.",
        strengths: &["Charisma", "Teamwork", "Practical optimism"],
        suited_roles: &["Event Planner", "Brand Ambassador", "Trainer", "Hospitality Manager"],
    },
    TypeDescription {
        code: "ENFP",
        nickname: "The Champion",
        summary: "Enthusiastic and imaginative. Sees possibilities and inspires others.",
        strengths: &["Communication", "Creativity", "Enthusiasm"],
        suited_roles: &["Marketing Specialist", "Product Manager", "Journalist", "Recruiter"],
    },
    TypeDescription {
        code: "ENTP",
        nickname: "The Visionary",
        summary: "Quick, ingenious and outspoken. Enjoys challenging ideas and inventing.",
        strengths: &["Innovation", "Debate", "Resourcefulness"],
        suited_roles: &["Startup Founder", "Business Developer", "Consultant", "Lawyer"],
    },
    TypeDescription {
        code: "ESTJ",
        nickname: "The Supervisor",
        summary: "Organized and decisive. Turns plans into results through structure.",
        strengths: &["Leadership", "Organization", "Decisiveness"],
        suited_roles: &["Operations Manager", "Project Manager", "Financial Officer", "Judge"],
    },
    TypeDescription {
        code: "ESFJ",
        nickname: "The Provider",
        summary: "Caring and sociable. Creates harmony and looks after the team.",
        strengths: &["Cooperation", "Reliability", "Interpersonal skill"],
        suited_roles: &["Office Manager", "Public Relations Officer", "Healthcare Administrator", "Teacher"],
    },
    TypeDescription {
        code: "ENFJ",
        nickname: "The Teacher",
        summary: "Charismatic and empathetic. Motivates people towards shared goals.",
        strengths: &["Mentoring", "Persuasion", "Empathy"],
        suited_roles: &["Learning & Development Lead", "HR Manager", "Coach", "Diplomat"],
    },
    TypeDescription {
        code: "ENTJ",
        nickname: "The Commander",
        summary: "Bold and strategic. Organizes people and resources to reach ambitious goals.",
        strengths: &["Leadership", "Strategic planning", "Efficiency"],
        suited_roles: &["Executive", "Management Consultant", "Engineering Manager", "Investment Banker"],
    },
];

/// Looks up a type code case-insensitively. Anything that is not one of the 16
/// canonical codes gets `FALLBACK_DESCRIPTION`.
pub fn describe(code: &str) -> &'static TypeDescription {
    let code = code.trim();
    DESCRIPTIONS
        .iter()
        .find(|d| d.code.eq_ignore_ascii_case(code))
        .unwrap_or(&FALLBACK_DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbti::normalize_type_code;

    #[test]
    fn test_all_canonical_codes_have_descriptions() {
        for e in ['E', 'I'] {
            for s in ['S', 'N'] {
                for t in ['T', 'F'] {
                    for j in ['J', 'P'] {
                        let code: String = [e, s, t, j].iter().collect();
                        let d = describe(&code);
                        assert_eq!(d.code, code);
                        assert!(!d.summary.is_empty());
                        assert!(!d.strengths.is_empty());
                        assert!(!d.suited_roles.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(describe("enfp").code, "ENFP");
    }

    #[test]
    fn test_other_strings_get_fallback() {
        for raw in ["", "XXXX", "INTJX", "ABCD", "I N T J"] {
            assert_eq!(describe(raw), &FALLBACK_DESCRIPTION);
        }
    }

    #[test]
    fn test_table_codes_are_canonical() {
        for d in &DESCRIPTIONS {
            assert_eq!(normalize_type_code(d.code).as_deref(), Some(d.code));
        }
    }
}
