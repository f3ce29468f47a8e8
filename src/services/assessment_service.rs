use std::sync::Arc;

use validator::Validate;

use crate::{
    clock::Clock,
    errors::{AppError, AppResult},
    models::{
        domain::Assessment,
        dto::{
            request::CreateAssessmentRequest,
            response::{EligibilityResponse, MessageResponse},
        },
    },
    repositories::{AssessmentRepository, SubmissionRepository},
};

pub struct AssessmentService {
    repository: Arc<dyn AssessmentRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    clock: Arc<dyn Clock>,
}

impl AssessmentService {
    pub fn new(
        repository: Arc<dyn AssessmentRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            submissions,
            clock,
        }
    }

    pub async fn list_assessments(&self) -> AppResult<Vec<Assessment>> {
        self.repository.find_all().await
    }

    pub async fn get_assessment(&self, id: &str) -> AppResult<Assessment> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assessment not found".to_string()))
    }

    pub async fn create_assessment(&self, request: CreateAssessmentRequest) -> AppResult<Assessment> {
        request.validate().map_err(|_| {
            AppError::ValidationError("Title, description and due date are required".to_string())
        })?;

        let assessment = request.into_assessment(self.clock.now())?;
        let assessment = self.repository.create(assessment).await?;
        log::info!(
            "Created assessment {} ({} questions, due {})",
            assessment.id,
            assessment.questions.len(),
            assessment.due_at()
        );

        Ok(assessment)
    }

    pub async fn delete_assessment(&self, id: &str) -> AppResult<MessageResponse> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Assessment not found".to_string()));
        }

        log::info!("Deleted assessment {}", id);
        Ok(MessageResponse::new("Assessment deleted successfully"))
    }

    /// `isActive`: inside the window. `canTake`: not yet completed and not past due.
    pub async fn eligibility(&self, assessment_id: &str, student_id: &str) -> AppResult<EligibilityResponse> {
        let assessment = self.get_assessment(assessment_id).await?;
        let now = self.clock.now();

        let completed = self
            .submissions
            .find_by_assessment_and_student(assessment_id, student_id)
            .await?
            .is_some_and(|s| s.is_completed);

        Ok(EligibilityResponse {
            can_take: !completed && now <= assessment.due_at(),
            is_active: assessment.is_active_at(now),
        })
    }
}
