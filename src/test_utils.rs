#[cfg(test)]
pub mod fixtures {
    use chrono::NaiveDateTime;

    use crate::models::domain::{Answer, Assessment, Question, QuestionType, Submission};

    /// Parses `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS` local time.
    pub fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
            .unwrap_or_else(|_| panic!("bad fixture timestamp '{}'", value))
    }

    pub fn mcq_question(id: &str, marks: u32, options: &[&str], correct: &str) -> Question {
        Question {
            id: id.to_string(),
            question_type: QuestionType::MultipleChoice,
            text: format!("Question {}", id),
            marks,
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            correct_answer: Some(correct.to_string()),
        }
    }

    pub fn text_question(id: &str, marks: u32) -> Question {
        Question {
            id: id.to_string(),
            question_type: QuestionType::Text,
            text: format!("Question {}", id),
            marks,
            options: None,
            correct_answer: None,
        }
    }

    /// Ten marks: q-1 (MCQ, 2, "4"), q-2 (MCQ, 4, "Paris"), q-3 (text, 4).
    pub fn mixed_assessment(starts_at: NaiveDateTime, due_at: NaiveDateTime) -> Assessment {
        Assessment::new(
            "Term test",
            "Arithmetic, geography and biology",
            starts_at,
            due_at,
            vec![
                mcq_question("q-1", 2, &["3", "4", "5"], "4"),
                mcq_question("q-2", 4, &["London", "Paris", "Rome"], "Paris"),
                text_question("q-3", 4),
            ],
        )
    }

    /// Two marks: q-1 (MCQ, 2, "4").
    pub fn mcq_only_assessment(starts_at: NaiveDateTime, due_at: NaiveDateTime) -> Assessment {
        Assessment::new(
            "Quick quiz",
            "Arithmetic",
            starts_at,
            due_at,
            vec![mcq_question("q-1", 2, &["3", "4", "5"], "4")],
        )
    }

    pub fn graded_submission(
        assessment: &Assessment,
        student_id: &str,
        answers: Vec<Answer>,
        auto_graded_marks: u32,
        marks_awarded: Option<u32>,
    ) -> Submission {
        Submission::completed(
            &assessment.id,
            student_id,
            answers,
            false,
            auto_graded_marks,
            marks_awarded,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_at_accepts_optional_seconds() {
        assert_eq!(at("2024-01-01 10:00"), at("2024-01-01 10:00:00"));
        assert!(at("2024-01-01 10:00:01") > at("2024-01-01 10:00"));
    }

    #[test]
    fn test_mixed_assessment_questions() {
        let assessment = mixed_assessment(at("2024-01-01 09:00"), at("2024-01-01 10:00"));

        assert_eq!(assessment.questions.len(), 3);
        assert!(assessment.questions.iter().all(|q| q.validate().is_ok()));
    }
}
