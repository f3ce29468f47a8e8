#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use assessment_server::{
    app_state::{AppState, Repositories},
    auth::Claims,
    clock::FixedClock,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Assessment, Student, Submission, User, UserRole},
    repositories::{AssessmentRepository, StudentRepository, SubmissionRepository, UserRepository},
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use secrecy::SecretString;
use tokio::sync::RwLock;

/// Builds an actix test service over the given `AppState`.
#[allow(unused_macros)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .app_data(actix_web::web::Data::new($state.jwt_service.clone()))
                .configure(assessment_server::handlers::configure),
        )
        .await
    };
}

pub fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .unwrap_or_else(|_| panic!("bad timestamp '{}'", value))
}

pub fn test_config() -> Config {
    Config {
        app_env: "test".to_string(),
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "assessments-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 5000,
        cors_allowed_origin: "http://localhost:5173".to_string(),
        jwt_secret: SecretString::from("integration_test_secret".to_string()),
        jwt_expiration_hours: 1,
        bcrypt_cost: 4,
        submission_grace_seconds: 60,
        admin_email: None,
        admin_password: None,
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(
                "A record with this value already exists".to_string(),
            ));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryStudentRepository {
    students: RwLock<HashMap<String, Student>>,
}

impl InMemoryStudentRepository {
    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_all(&self) -> AppResult<Vec<Student>> {
        let students = self.students.read().await;
        let mut items: Vec<_> = students.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn create(&self, student: Student) -> AppResult<Student> {
        let mut students = self.students.write().await;
        students.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.students.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryAssessmentRepository {
    assessments: RwLock<HashMap<String, Assessment>>,
}

impl InMemoryAssessmentRepository {
    pub async fn len(&self) -> usize {
        self.assessments.read().await.len()
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn find_all(&self) -> AppResult<Vec<Assessment>> {
        let assessments = self.assessments.read().await;
        let mut items: Vec<_> = assessments.values().cloned().collect();
        items.sort_by_key(|a| a.due_at());
        Ok(items)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assessment>> {
        Ok(self.assessments.read().await.get(id).cloned())
    }

    async fn create(&self, assessment: Assessment) -> AppResult<Assessment> {
        let mut assessments = self.assessments.write().await;
        assessments.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.assessments.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: RwLock<HashMap<(String, String), Submission>>,
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn find_by_assessment_and_student(
        &self,
        assessment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .get(&(assessment_id.to_string(), student_id.to_string()))
            .cloned())
    }

    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;
        let key = (
            submission.assessment_id.clone(),
            submission.student_id.clone(),
        );
        if submissions.contains_key(&key) {
            return Err(AppError::AlreadyExists(
                "Assessment has already been submitted".to_string(),
            ));
        }
        submissions.insert(key, submission.clone());
        Ok(submission)
    }

    async fn record_marks_awarded(&self, id: &str, marks_awarded: u32) -> AppResult<bool> {
        let mut submissions = self.submissions.write().await;
        match submissions
            .values_mut()
            .find(|s| s.id == id && s.marks_awarded.is_none())
        {
            Some(submission) => {
                submission.marks_awarded = Some(marks_awarded);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Application state over in-memory repositories with the clock fixed at `now`.
pub struct TestContext {
    pub state: AppState,
    pub students: Arc<InMemoryStudentRepository>,
    pub assessments: Arc<InMemoryAssessmentRepository>,
    pub submissions: Arc<InMemorySubmissionRepository>,
}

impl TestContext {
    pub fn at(now: &str) -> Self {
        let students = Arc::new(InMemoryStudentRepository::default());
        let assessments = Arc::new(InMemoryAssessmentRepository::default());
        let submissions = Arc::new(InMemorySubmissionRepository::default());

        let repositories = Repositories {
            users: Arc::new(InMemoryUserRepository::default()),
            students: students.clone(),
            assessments: assessments.clone(),
            submissions: submissions.clone(),
        };

        let state = AppState::with_repositories(
            test_config(),
            repositories,
            Arc::new(FixedClock(at(now))),
        );

        Self {
            state,
            students,
            assessments,
            submissions,
        }
    }

    pub fn token(&self, user_id: &str, role: UserRole) -> String {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            email: format!("{}@school.test", user_id),
            role,
            iat: now,
            exp: now + 3600,
        };
        self.state
            .jwt_service
            .encode_claims(&claims)
            .expect("token encodes")
    }

    pub fn bearer(&self, user_id: &str, role: UserRole) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token(user_id, role)))
    }
}
