use serde::Serialize;

/// One quiz question. The reference answer never leaves the server; clients
/// learn it only through an incorrect submission.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: i64,
    pub question: &'static str,
    #[serde(skip_serializing)]
    pub answer: &'static str,
    pub options: [&'static str; 4],
}

const QUESTIONS: [Question; 5] = [
    Question {
        id: 1,
        question: "What is Python?",
        answer: "a programming language",
        options: ["a programming language", "a snake", "a fruit", "a game"],
    },
    Question {
        id: 2,
        question: "What is 2 + 2?",
        answer: "4",
        options: ["3", "4", "5", "6"],
    },
    Question {
        id: 3,
        question: "What does CPU stand for?",
        answer: "central processing unit",
        options: [
            "central processing unit",
            "computer personal unit",
            "central program utility",
            "core processing unit",
        ],
    },
    Question {
        id: 4,
        question: "What does HTML stand for?",
        answer: "hypertext markup language",
        options: [
            "hypertext markup language",
            "home tool markup language",
            "hyperlinks and text markup language",
            "hyperlinking text markup language",
        ],
    },
    Question {
        id: 5,
        question: "Which planet is closest to the sun?",
        answer: "mercury",
        options: ["venus", "mercury", "mars", "earth"],
    },
];

pub fn question_bank() -> &'static [Question] {
    &QUESTIONS
}

pub fn find_question(id: i64) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_ids_are_unique() {
        let mut ids: Vec<i64> = question_bank().iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), question_bank().len());
    }

    #[test]
    fn test_answer_is_always_among_options() {
        for q in question_bank() {
            assert!(q.options.contains(&q.answer), "question {}", q.id);
        }
    }

    #[test]
    fn test_answers_are_not_serialized() {
        let json = serde_json::to_string(&question_bank()[0]).expect("serializable");
        assert!(!json.contains("answer\""));
        assert!(json.contains("options"));
    }
}
