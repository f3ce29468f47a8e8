use std::sync::Arc;

use chrono::Duration;
use validator::Validate;

use crate::{
    clock::Clock,
    errors::{AppError, AppResult},
    models::{
        domain::{Assessment, Submission},
        dto::request::{GradeSubmissionRequest, SubmitAssessmentRequest},
    },
    repositories::{AssessmentRepository, SubmissionRepository},
    services::grading_service::GradingService,
};

pub const SUBMISSION_NOT_FOUND: &str = "Submission not found";
pub const ASSESSMENT_NOT_FOUND: &str = "Assessment not found";

pub struct SubmissionService {
    repository: Arc<dyn SubmissionRepository>,
    assessments: Arc<dyn AssessmentRepository>,
    clock: Arc<dyn Clock>,
    grace: Duration,
}

impl SubmissionService {
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        assessments: Arc<dyn AssessmentRepository>,
        clock: Arc<dyn Clock>,
        grace_seconds: i64,
    ) -> Self {
        Self {
            repository,
            assessments,
            clock,
            grace: Duration::seconds(grace_seconds.max(0)),
        }
    }

    /// A missing assessment and a missing submission are distinct 404s.
    pub async fn get_submission(&self, assessment_id: &str, student_id: &str) -> AppResult<Submission> {
        self.find_assessment(assessment_id).await?;
        self.find_submission(assessment_id, student_id).await
    }

    async fn find_assessment(&self, assessment_id: &str) -> AppResult<Assessment> {
        self.assessments
            .find_by_id(assessment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ASSESSMENT_NOT_FOUND.to_string()))
    }

    async fn find_submission(&self, assessment_id: &str, student_id: &str) -> AppResult<Submission> {
        self.repository
            .find_by_assessment_and_student(assessment_id, student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(SUBMISSION_NOT_FOUND.to_string()))
    }

    /// Grades and persists a completed attempt. Deadline-triggered submissions
    /// may land up to the grace period after the due time.
    pub async fn submit(&self, assessment_id: &str, request: SubmitAssessmentRequest) -> AppResult<Submission> {
        request
            .validate()
            .map_err(|_| AppError::ValidationError("Student id is required".to_string()))?;
        let student_id = request.student_id.unwrap_or_default();

        let assessment = self.find_assessment(assessment_id).await?;

        let now = self.clock.now();
        if now < assessment.starts_at() {
            return Err(AppError::ValidationError(
                "Assessment has not started yet".to_string(),
            ));
        }
        if now > assessment.due_at() + self.grace {
            return Err(AppError::ValidationError(
                "Assessment is past its due date".to_string(),
            ));
        }

        if self
            .repository
            .find_by_assessment_and_student(assessment_id, &student_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Assessment has already been submitted".to_string(),
            ));
        }

        let graded = GradingService::grade_submission(&assessment, request.answers)?;
        let submission = Submission::completed(
            assessment_id,
            &student_id,
            graded.answers,
            request.tab_switched,
            graded.auto_graded_marks,
            graded.marks_awarded,
        );

        let submission = self.repository.create(submission).await?;
        log::info!(
            "Student {} submitted assessment {} (auto-graded {}, tab switched: {})",
            student_id,
            assessment_id,
            graded.auto_graded_marks,
            submission.tab_switched
        );

        Ok(submission)
    }

    pub async fn grade(
        &self,
        assessment_id: &str,
        student_id: &str,
        request: GradeSubmissionRequest,
    ) -> AppResult<Submission> {
        request
            .validate()
            .map_err(|_| AppError::ValidationError("Text marks are required".to_string()))?;
        let text_marks = request.text_marks.unwrap_or_default();

        let assessment = self.find_assessment(assessment_id).await?;

        let mut submission = self.find_submission(assessment_id, student_id).await?;
        if submission.is_fully_graded() {
            return Err(AppError::AlreadyExists(
                "Submission has already been graded".to_string(),
            ));
        }

        let auto_graded = submission.auto_graded_marks.unwrap_or_default();
        let total = GradingService::apply_text_marks(&assessment, auto_graded, text_marks)?;

        if !self.repository.record_marks_awarded(&submission.id, total).await? {
            return Err(AppError::AlreadyExists(
                "Submission has already been graded".to_string(),
            ));
        }

        log::info!(
            "Graded submission {} for assessment {}: {} marks",
            submission.id,
            assessment_id,
            total
        );
        submission.marks_awarded = Some(total);
        Ok(submission)
    }
}
