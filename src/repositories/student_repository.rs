use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Student};

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Student>>;
    async fn create(&self, student: Student) -> AppResult<Student>;
    /// Returns `false` when no student had the id.
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MongoStudentRepository {
    collection: Collection<Student>,
}

impl MongoStudentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.students(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
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
        log::info!("Created unique index on students.id");
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    async fn find_all(&self) -> AppResult<Vec<Student>> {
        let cursor = self.collection.find(doc! {}).await?;
        let students: Vec<Student> = cursor.try_collect().await?;
        Ok(students)
    }

    async fn create(&self, student: Student) -> AppResult<Student> {
        self.collection.insert_one(&student).await?;
        Ok(student)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
