use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::{Question, QuestionType};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    pub due_date: NaiveDate,
    #[serde(with = "clock_time")]
    pub due_time: NaiveTime,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Assessment {
    pub fn new(
        title: &str,
        description: &str,
        starts_at: NaiveDateTime,
        due_at: NaiveDateTime,
        questions: Vec<Question>,
    ) -> Self {
        Assessment {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            start_date: starts_at.date(),
            start_time: starts_at.time(),
            due_date: due_at.date(),
            due_time: due_at.time(),
            questions,
            created_at: Some(Utc::now()),
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    pub fn due_at(&self) -> NaiveDateTime {
        self.due_date.and_time(self.due_time)
    }

    /// Inclusive on both ends.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.starts_at() <= now && now <= self.due_at()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn total_marks(&self) -> u32 {
        self.questions
            .iter()
            .map(|q| q.marks)
            .fold(0, u32::saturating_add)
    }

    pub fn mcq_marks(&self) -> u32 {
        self.questions
            .iter()
            .filter(|q| q.question_type == QuestionType::MultipleChoice)
            .map(|q| q.marks)
            .fold(0, u32::saturating_add)
    }

    pub fn text_marks(&self) -> u32 {
        self.total_marks().saturating_sub(self.mcq_marks())
    }

    pub fn has_text_questions(&self) -> bool {
        self.questions
            .iter()
            .any(|q| q.question_type == QuestionType::Text)
    }
}

/// `HH:MM` on output; `HH:MM` or `HH:MM:SS` on input.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<NaiveTime> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}'", raw)))
    }
}
