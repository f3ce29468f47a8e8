use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Student,
        dto::{
            request::CreateStudentRequest,
            response::{MessageResponse, StudentDto},
        },
    },
    repositories::StudentRepository,
};

pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_students(&self) -> AppResult<Vec<StudentDto>> {
        let students = self.repository.find_all().await?;
        Ok(students.into_iter().map(StudentDto::from).collect())
    }

    pub async fn create_student(&self, request: CreateStudentRequest) -> AppResult<StudentDto> {
        let (Some(name), Some(email)) = (request.name.as_deref(), request.email.as_deref()) else {
            return Err(AppError::ValidationError(
                "Name and email are required".to_string(),
            ));
        };
        if name.is_empty() || email.is_empty() {
            return Err(AppError::ValidationError(
                "Name and email are required".to_string(),
            ));
        }
        request.validate()?;

        let student = self.repository.create(Student::new(name, email)).await?;
        log::info!("Created student {}", student.id);

        Ok(StudentDto::from(student))
    }

    pub async fn delete_student(&self, id: &str) -> AppResult<MessageResponse> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        log::info!("Deleted student {}", id);
        Ok(MessageResponse::new("Student deleted successfully"))
    }
}
