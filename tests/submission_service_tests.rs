mod common;

use assessment_server::{
    errors::AppError,
    models::{
        domain::{Answer, Assessment, Question, QuestionType},
        dto::request::{GradeSubmissionRequest, SubmitAssessmentRequest},
    },
    repositories::AssessmentRepository,
    services::submission_service::{ASSESSMENT_NOT_FOUND, SUBMISSION_NOT_FOUND},
};

use common::{at, TestContext};

fn question(id: &str, question_type: QuestionType, marks: u32, correct: Option<&str>) -> Question {
    Question {
        id: id.to_string(),
        question_type,
        text: format!("Question {}", id),
        marks,
        options: correct.map(|c| vec![c.to_string(), "other".to_string()]),
        correct_answer: correct.map(str::to_string),
    }
}

async fn seed_assessment(ctx: &TestContext) -> Assessment {
    let assessment = Assessment::new(
        "Term test",
        "Mixed questions",
        at("2024-01-01 09:00"),
        at("2024-01-01 10:00"),
        vec![
            question("q-1", QuestionType::MultipleChoice, 2, Some("4")),
            question("q-2", QuestionType::MultipleChoice, 4, Some("Paris")),
            question("q-3", QuestionType::Text, 4, None),
        ],
    );
    ctx.assessments.create(assessment).await.unwrap()
}

fn submit_request(student_id: &str, answers: Vec<Answer>, tab_switched: bool) -> SubmitAssessmentRequest {
    SubmitAssessmentRequest {
        student_id: Some(student_id.to_string()),
        answers,
        tab_switched,
    }
}

#[tokio::test]
async fn test_submission_before_start_is_rejected() {
    let ctx = TestContext::at("2024-01-01 08:59");
    let assessment = seed_assessment(&ctx).await;

    let result = ctx
        .state
        .submission_service
        .submit(&assessment.id, submit_request("s-1", vec![], false))
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_deadline_submission_inside_grace_is_accepted() {
    let ctx = TestContext::at("2024-01-01 10:00:30");
    let assessment = seed_assessment(&ctx).await;

    let submission = ctx
        .state
        .submission_service
        .submit(
            &assessment.id,
            submit_request("s-1", vec![Answer::new("q-2", "Paris")], false),
        )
        .await
        .unwrap();

    assert_eq!(submission.auto_graded_marks, Some(4));
    assert!(submission.is_completed);
}

#[tokio::test]
async fn test_submission_after_grace_is_rejected() {
    let ctx = TestContext::at("2024-01-01 10:01:01");
    let assessment = seed_assessment(&ctx).await;

    let result = ctx
        .state
        .submission_service
        .submit(&assessment.id, submit_request("s-1", vec![], false))
        .await;

    match result {
        Err(AppError::ValidationError(message)) => {
            assert_eq!(message, "Assessment is past its due date")
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tab_switched_flag_is_stored() {
    let ctx = TestContext::at("2024-01-01 09:30");
    let assessment = seed_assessment(&ctx).await;

    ctx.state
        .submission_service
        .submit(&assessment.id, submit_request("s-1", vec![], true))
        .await
        .unwrap();

    let stored = ctx
        .state
        .submission_service
        .get_submission(&assessment.id, "s-1")
        .await
        .unwrap();
    assert!(stored.tab_switched);
    assert_eq!(stored.auto_graded_marks, Some(0));
}

#[tokio::test]
async fn test_second_submission_conflicts() {
    let ctx = TestContext::at("2024-01-01 09:30");
    let assessment = seed_assessment(&ctx).await;
    let service = &ctx.state.submission_service;

    service
        .submit(&assessment.id, submit_request("s-1", vec![], false))
        .await
        .unwrap();
    let second = service
        .submit(&assessment.id, submit_request("s-1", vec![], false))
        .await;

    assert!(matches!(second, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_submit_without_student_is_rejected() {
    let ctx = TestContext::at("2024-01-01 09:30");
    let assessment = seed_assessment(&ctx).await;

    let result = ctx
        .state
        .submission_service
        .submit(&assessment.id, SubmitAssessmentRequest::default())
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_submit_to_unknown_assessment_is_not_found() {
    let ctx = TestContext::at("2024-01-01 09:30");

    let result = ctx
        .state
        .submission_service
        .submit("missing", submit_request("s-1", vec![], false))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_missing_assessment_and_missing_submission_are_told_apart() {
    let ctx = TestContext::at("2024-01-01 09:30");
    let assessment = seed_assessment(&ctx).await;
    let service = &ctx.state.submission_service;

    let no_submission = service.get_submission(&assessment.id, "s-1").await;
    assert!(
        matches!(&no_submission, Err(AppError::NotFound(msg)) if msg == SUBMISSION_NOT_FOUND)
    );

    let no_assessment = service.get_submission("missing", "s-1").await;
    assert!(
        matches!(&no_assessment, Err(AppError::NotFound(msg)) if msg == ASSESSMENT_NOT_FOUND)
    );
}

#[tokio::test]
async fn test_text_marks_above_text_total_are_rejected() {
    let ctx = TestContext::at("2024-01-01 09:30");
    let assessment = seed_assessment(&ctx).await;
    let service = &ctx.state.submission_service;

    service
        .submit(
            &assessment.id,
            submit_request("s-1", vec![Answer::new("q-1", "4")], false),
        )
        .await
        .unwrap();

    let too_many = service
        .grade(
            &assessment.id,
            "s-1",
            GradeSubmissionRequest {
                text_marks: Some(5),
            },
        )
        .await;
    assert!(matches!(too_many, Err(AppError::ValidationError(_))));

    let graded = service
        .grade(
            &assessment.id,
            "s-1",
            GradeSubmissionRequest {
                text_marks: Some(4),
            },
        )
        .await
        .unwrap();
    assert_eq!(graded.marks_awarded, Some(6));
}

#[tokio::test]
async fn test_eligibility_after_due_date() {
    let ctx = TestContext::at("2024-01-01 10:00:01");
    let assessment = seed_assessment(&ctx).await;

    let eligibility = ctx
        .state
        .assessment_service
        .eligibility(&assessment.id, "s-1")
        .await
        .unwrap();

    assert!(!eligibility.can_take);
    assert!(!eligibility.is_active);
}
