use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::RequireRoles, errors::AppError,
    models::dto::request::CreateAssessmentRequest,
};

#[get("/assessments", wrap = "RequireRoles::any_role()")]
pub async fn list_assessments(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let assessments = state.assessment_service.list_assessments().await?;
    Ok(HttpResponse::Ok().json(assessments))
}

#[get("/assessments/{id}", wrap = "RequireRoles::any_role()")]
pub async fn get_assessment(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let assessment = state.assessment_service.get_assessment(&id).await?;
    Ok(HttpResponse::Ok().json(assessment))
}

#[post("/assessments", wrap = "RequireRoles::staff()")]
pub async fn create_assessment(
    state: web::Data<AppState>,
    request: web::Json<CreateAssessmentRequest>,
) -> Result<HttpResponse, AppError> {
    let assessment = state
        .assessment_service
        .create_assessment(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(assessment))
}

#[delete("/assessments/{id}", wrap = "RequireRoles::staff()")]
pub async fn delete_assessment(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.assessment_service.delete_assessment(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}
