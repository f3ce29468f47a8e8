use actix_web::{get, web, HttpResponse};

use crate::app_state::AppState;

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.database {
        Some(db) => match db.health_check().await {
            Ok(()) => "ok",
            Err(e) => {
                log::warn!("Database health check failed: {}", e);
                "error"
            }
        },
        None => "not_configured",
    };

    let body = serde_json::json!({
        "status": if database == "error" { "degraded" } else { "healthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": { "mongodb": database }
    });

    if database == "error" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
