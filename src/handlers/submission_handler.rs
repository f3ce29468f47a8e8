use actix_web::{get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_self_or_staff, AuthenticatedUser, RequireRoles},
    errors::AppError,
    models::dto::request::{GradeSubmissionRequest, SubmitAssessmentRequest},
};

#[get(
    "/assessments/{id}/submissions/{student_id}",
    wrap = "RequireRoles::any_role()"
)]
pub async fn get_submission(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (assessment_id, student_id) = path.into_inner();
    require_self_or_staff(&auth.0, &student_id)?;

    let submission = state
        .submission_service
        .get_submission(&assessment_id, &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[post("/assessments/{id}/submissions", wrap = "RequireRoles::student()")]
pub async fn submit_assessment(
    state: web::Data<AppState>,
    assessment_id: web::Path<String>,
    request: web::Json<SubmitAssessmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    if let Some(student_id) = request.student_id.as_deref() {
        require_self_or_staff(&auth.0, student_id)?;
    }

    let submission = state
        .submission_service
        .submit(&assessment_id, request)
        .await?;
    Ok(HttpResponse::Created().json(submission))
}

#[put(
    "/assessments/{id}/submissions/{student_id}/grade",
    wrap = "RequireRoles::staff()"
)]
pub async fn grade_submission(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<GradeSubmissionRequest>,
) -> Result<HttpResponse, AppError> {
    let (assessment_id, student_id) = path.into_inner();
    let submission = state
        .submission_service
        .grade(&assessment_id, &student_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[get(
    "/assessments/{id}/eligibility/{student_id}",
    wrap = "RequireRoles::any_role()"
)]
pub async fn eligibility(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (assessment_id, student_id) = path.into_inner();
    require_self_or_staff(&auth.0, &student_id)?;

    let response = state
        .assessment_service
        .eligibility(&assessment_id, &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
