use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::RequireRoles, errors::AppError,
    models::dto::request::CreateStudentRequest,
};

#[get("/students", wrap = "RequireRoles::staff()")]
pub async fn list_students(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let students = state.student_service.list_students().await?;
    Ok(HttpResponse::Ok().json(students))
}

#[post("/students", wrap = "RequireRoles::staff()")]
pub async fn create_student(
    state: web::Data<AppState>,
    request: web::Json<CreateStudentRequest>,
) -> Result<HttpResponse, AppError> {
    let student = state
        .student_service
        .create_student(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(student))
}

#[delete("/students/{id}", wrap = "RequireRoles::staff()")]
pub async fn delete_student(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.student_service.delete_student(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}
