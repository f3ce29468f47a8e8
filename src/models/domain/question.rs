use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

pub const MAX_QUESTION_MARKS: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    Text,
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        self.question_type == QuestionType::MultipleChoice
    }

    /// Exact match against the stored correct option. Text questions never match.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.is_multiple_choice() && self.correct_answer.as_deref() == Some(answer)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.text.trim().is_empty() {
            return Err(AppError::ValidationError(format!(
                "Question '{}' has no text",
                self.id
            )));
        }

        if self.marks == 0 {
            return Err(AppError::ValidationError(format!(
                "Question '{}' must be worth at least one mark",
                self.id
            )));
        }

        if self.marks > MAX_QUESTION_MARKS {
            return Err(AppError::ValidationError(format!(
                "Question '{}' cannot be worth more than {} marks",
                self.id, MAX_QUESTION_MARKS
            )));
        }

        if self.is_multiple_choice() {
            let options = self.options.as_deref().unwrap_or_default();
            if options.len() < 2 {
                return Err(AppError::ValidationError(format!(
                    "Multiple-choice question '{}' needs at least two options",
                    self.id
                )));
            }

            match self.correct_answer.as_deref() {
                Some(correct) if options.iter().any(|o| o == correct) => {}
                _ => {
                    return Err(AppError::ValidationError(format!(
                        "Correct answer of question '{}' must be one of its options",
                        self.id
                    )))
                }
            }
        }

        Ok(())
    }
}
