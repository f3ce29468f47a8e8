use std::collections::{HashMap, HashSet};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Answer, Assessment, Question};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswers {
    pub answers: Vec<Answer>,
    pub auto_graded_marks: u32,
    /// Present when nothing is left for a teacher to grade.
    pub marks_awarded: Option<u32>,
}

pub struct GradingService;

impl GradingService {
    /// Auto-grade the multiple-choice part of a submission.
    ///
    /// Blank answers are dropped, answers to unknown questions or repeated
    /// answers to one question are rejected.
    pub fn grade_submission(assessment: &Assessment, submitted: Vec<Answer>) -> AppResult<GradedAnswers> {
        let question_map: HashMap<&str, &Question> = assessment
            .questions
            .iter()
            .map(|q| (q.id.as_str(), q))
            .collect();

        let mut seen = HashSet::new();
        let mut answers = Vec::with_capacity(submitted.len());
        let mut auto_graded_marks: u32 = 0;

        for answer in submitted {
            if answer.answer.trim().is_empty() {
                continue;
            }

            let question = question_map.get(answer.question_id.as_str()).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Question '{}' is not part of this assessment",
                    answer.question_id
                ))
            })?;

            if !seen.insert(answer.question_id.clone()) {
                return Err(AppError::ValidationError(format!(
                    "Question '{}' was answered more than once",
                    answer.question_id
                )));
            }

            if question.is_correct(&answer.answer) {
                auto_graded_marks = auto_graded_marks.saturating_add(question.marks);
            }

            answers.push(answer);
        }

        let marks_awarded = (!assessment.has_text_questions()).then_some(auto_graded_marks);

        Ok(GradedAnswers {
            answers,
            auto_graded_marks,
            marks_awarded,
        })
    }

    /// Total after a teacher has marked the text answers.
    pub fn apply_text_marks(
        assessment: &Assessment,
        auto_graded_marks: u32,
        text_marks: u32,
    ) -> AppResult<u32> {
        let available = assessment.text_marks();
        if text_marks > available {
            return Err(AppError::ValidationError(format!(
                "Text marks ({}) exceed the {} marks available for text answers",
                text_marks, available
            )));
        }
        Ok(auto_graded_marks.saturating_add(text_marks))
    }
}
