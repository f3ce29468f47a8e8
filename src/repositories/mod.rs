pub mod assessment_repository;
pub mod student_repository;
pub mod submission_repository;
pub mod user_repository;

pub use assessment_repository::{AssessmentRepository, MongoAssessmentRepository};
pub use student_repository::{MongoStudentRepository, StudentRepository};
pub use submission_repository::{MongoSubmissionRepository, SubmissionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
