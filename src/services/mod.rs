pub mod assessment_service;
pub mod auth_service;
pub mod grading_service;
pub mod student_service;
pub mod submission_service;
