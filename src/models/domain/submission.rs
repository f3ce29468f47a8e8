use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub assessment_id: String,
    pub student_id: String,
    pub answers: Vec<Answer>,
    pub is_completed: bool,
    pub tab_switched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_graded_marks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks_awarded: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub answer: String,
}

impl Answer {
    pub fn new(question_id: &str, answer: &str) -> Self {
        Answer {
            question_id: question_id.to_string(),
            answer: answer.to_string(),
        }
    }
}

impl Submission {
    /// A completed submission as persisted on submit.
    pub fn completed(
        assessment_id: &str,
        student_id: &str,
        answers: Vec<Answer>,
        tab_switched: bool,
        auto_graded_marks: u32,
        marks_awarded: Option<u32>,
    ) -> Self {
        Submission {
            id: Uuid::new_v4().to_string(),
            assessment_id: assessment_id.to_string(),
            student_id: student_id.to_string(),
            answers,
            is_completed: true,
            tab_switched,
            auto_graded_marks: Some(auto_graded_marks),
            marks_awarded,
            submitted_at: Some(Utc::now()),
        }
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.answer.as_str())
    }

    pub fn is_fully_graded(&self) -> bool {
        self.marks_awarded.is_some()
    }
}
