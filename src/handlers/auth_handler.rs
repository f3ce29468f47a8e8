use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{request::LoginRequest, response::MessageResponse},
};

#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Tokens are stateless; the client discards its copy.
#[post("/auth/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new("Logged out successfully"))
}
