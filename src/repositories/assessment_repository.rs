use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Assessment};

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Assessment>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assessment>>;
    async fn create(&self, assessment: Assessment) -> AppResult<Assessment>;
    /// Returns `false` when no assessment had the id.
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MongoAssessmentRepository {
    collection: Collection<Assessment>,
}

impl MongoAssessmentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.assessments(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for assessments collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for assessments collection");
        Ok(())
    }
}

#[async_trait]
impl AssessmentRepository for MongoAssessmentRepository {
    async fn find_all(&self) -> AppResult<Vec<Assessment>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "dueDate": 1, "dueTime": 1 })
            .await?;
        let assessments: Vec<Assessment> = cursor.try_collect().await?;
        Ok(assessments)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assessment>> {
        let assessment = self.collection.find_one(doc! { "id": id }).await?;
        Ok(assessment)
    }

    async fn create(&self, assessment: Assessment) -> AppResult<Assessment> {
        self.collection.insert_one(&assessment).await?;
        Ok(assessment)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
