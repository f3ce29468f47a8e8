use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::assessment::clock_time;
use crate::models::domain::{Answer, Assessment, Question, QuestionType};

// Required fields are `Option` so a missing key and an empty value are both
// reported through the same validation error instead of a JSON extractor error.

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(required, length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(required, length(min = 1), email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(required, length(min = 1))]
    pub description: Option<String>,

    #[validate(required, length(min = 1))]
    pub due_date: Option<String>,

    pub due_time: Option<String>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,

    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub marks: u32,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
}

impl From<QuestionInput> for Question {
    fn from(input: QuestionInput) -> Self {
        Question {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            question_type: input.question_type,
            text: input.text,
            marks: input.marks,
            options: input.options,
            correct_answer: input.correct_answer,
        }
    }
}

const DEFAULT_DUE_TIME: &str = "23:59";

impl CreateAssessmentRequest {
    /// Builds the stored assessment. `now` fills in a missing start.
    pub fn into_assessment(self, now: NaiveDateTime) -> AppResult<Assessment> {
        let (Some(title), Some(description), Some(due_date)) =
            (self.title, self.description, self.due_date)
        else {
            return Err(AppError::ValidationError(
                "Title, description and due date are required".to_string(),
            ));
        };

        let due_date = parse_date(&due_date)?;
        let due_time = parse_time(self.due_time.as_deref().unwrap_or(DEFAULT_DUE_TIME))?;
        let due_at = due_date.and_time(due_time);

        let starts_at = match (self.start_date.as_deref(), self.start_time.as_deref()) {
            (None, None) => now,
            (Some(date), time) => {
                parse_date(date)?.and_time(parse_time(time.unwrap_or("00:00"))?)
            }
            (None, Some(time)) => now.date().and_time(parse_time(time)?),
        };

        if starts_at > due_at {
            return Err(AppError::ValidationError(
                "Start date must not be after the due date".to_string(),
            ));
        }

        let questions: Vec<Question> = self.questions.into_iter().map(Question::from).collect();
        let mut ids = HashSet::new();
        for question in &questions {
            question.validate()?;
            if !ids.insert(question.id.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Question id '{}' is used more than once",
                    question.id
                )));
            }
        }

        Ok(Assessment::new(&title, &description, starts_at, due_at, questions))
    }
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("Invalid date '{}'", value)))
}

fn parse_time(value: &str) -> AppResult<NaiveTime> {
    clock_time::parse(value)
        .ok_or_else(|| AppError::ValidationError(format!("Invalid time '{}'", value)))
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    #[validate(required, length(min = 1))]
    pub student_id: Option<String>,

    #[serde(default)]
    pub answers: Vec<Answer>,

    #[serde(default)]
    pub tab_switched: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmissionRequest {
    #[validate(required)]
    pub text_marks: Option<u32>,
}
