use std::sync::Arc;

use crate::{
    auth::JwtService,
    clock::{Clock, SystemClock},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AssessmentRepository, MongoAssessmentRepository, MongoStudentRepository,
        MongoSubmissionRepository, MongoUserRepository, StudentRepository, SubmissionRepository,
        UserRepository,
    },
    services::{
        assessment_service::AssessmentService, auth_service::AuthService,
        student_service::StudentService, submission_service::SubmissionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub student_service: Arc<StudentService>,
    pub assessment_service: Arc<AssessmentService>,
    pub submission_service: Arc<SubmissionService>,
    pub jwt_service: JwtService,
    pub database: Option<Database>,
    pub config: Arc<Config>,
}

pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub assessments: Arc<dyn AssessmentRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let users = Arc::new(MongoUserRepository::new(&db));
        users.ensure_indexes().await?;
        let students = Arc::new(MongoStudentRepository::new(&db));
        students.ensure_indexes().await?;
        let assessments = Arc::new(MongoAssessmentRepository::new(&db));
        assessments.ensure_indexes().await?;
        let submissions = Arc::new(MongoSubmissionRepository::new(&db));
        submissions.ensure_indexes().await?;

        let repositories = Repositories {
            users,
            students,
            assessments,
            submissions,
        };

        let mut state = Self::with_repositories(config, repositories, Arc::new(SystemClock));
        state.database = Some(db);
        Ok(state)
    }

    /// Wires services over the given repositories without touching a database.
    pub fn with_repositories(config: Config, repositories: Repositories, clock: Arc<dyn Clock>) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        let auth_service = Arc::new(AuthService::new(
            repositories.users,
            jwt_service.clone(),
            config.bcrypt_cost,
        ));
        let student_service = Arc::new(StudentService::new(repositories.students));
        let assessment_service = Arc::new(AssessmentService::new(
            repositories.assessments.clone(),
            repositories.submissions.clone(),
            clock.clone(),
        ));
        let submission_service = Arc::new(SubmissionService::new(
            repositories.submissions,
            repositories.assessments,
            clock,
            config.submission_grace_seconds,
        ));

        Self {
            auth_service,
            student_service,
            assessment_service,
            submission_service,
            jwt_service,
            database: None,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
