pub mod assessment_handler;
pub mod auth_handler;
pub mod health_handler;
pub mod student_handler;
pub mod submission_handler;

use actix_web::web;

use crate::errors::AppError;

/// Registers every route. The caller supplies `web::Data<AppState>` and
/// `web::Data<JwtService>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid request body: {}", err)).into()
    });

    cfg.app_data(json_config)
        .service(health_handler::health_check)
        .service(
            web::scope("/api")
                .service(auth_handler::login)
                .service(auth_handler::logout)
                .service(student_handler::list_students)
                .service(student_handler::create_student)
                .service(student_handler::delete_student)
                .service(assessment_handler::list_assessments)
                .service(assessment_handler::create_assessment)
                .service(assessment_handler::get_assessment)
                .service(assessment_handler::delete_assessment)
                .service(submission_handler::get_submission)
                .service(submission_handler::submit_assessment)
                .service(submission_handler::grade_submission)
                .service(submission_handler::eligibility),
        );
}
