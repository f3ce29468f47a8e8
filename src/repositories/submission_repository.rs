use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Submission,
};

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn find_by_assessment_and_student(
        &self,
        assessment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>>;
    /// Fails with `AlreadyExists` when the (assessment, student) pair is taken.
    async fn create(&self, submission: Submission) -> AppResult<Submission>;
    /// Sets `marksAwarded` only if it has not been set yet.
    async fn record_marks_awarded(&self, id: &str, marks_awarded: u32) -> AppResult<bool>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<Submission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.submissions(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let assessment_student_index = IndexModel::builder()
            .keys(doc! { "assessmentId": 1, "studentId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("assessment_student_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(assessment_student_index).await?;

        log::info!("Successfully created indexes for submissions collection");
        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn find_by_assessment_and_student(
        &self,
        assessment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submission = self
            .collection
            .find_one(doc! {
                "assessmentId": assessment_id,
                "studentId": student_id
            })
            .await?;
        Ok(submission)
    }

    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        self.collection
            .insert_one(&submission)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::AlreadyExists(_) => AppError::AlreadyExists(
                    "Assessment has already been submitted".to_string(),
                ),
                other => other,
            })?;
        Ok(submission)
    }

    async fn record_marks_awarded(&self, id: &str, marks_awarded: u32) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "marksAwarded": { "$exists": false } },
                doc! { "$set": { "marksAwarded": marks_awarded as i64 } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }
}
