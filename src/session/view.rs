use std::fmt;

use chrono::NaiveDateTime;

use crate::{
    client::{ApiClientError, AssessmentApi},
    models::{
        domain::{Assessment, Submission},
        dto::response::EligibilityResponse,
    },
};

/// Why a student may not open the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockedReason {
    TabSwitched,
    NotStartedYet { starts_at: NaiveDateTime },
    PastDue,
    Ineligible,
}

impl BlockedReason {
    pub fn title(&self) -> &'static str {
        match self {
            BlockedReason::TabSwitched => "Assessment Auto-Submitted",
            _ => "Cannot Take Assessment",
        }
    }
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockedReason::TabSwitched => write!(
                f,
                "This assessment was auto-submitted due to tab switching or navigating away."
            ),
            BlockedReason::NotStartedYet { starts_at } => write!(
                f,
                "This assessment will start on {} at {}.",
                starts_at.format("%B %-d, %Y"),
                starts_at.format("%-I:%M %p")
            ),
            BlockedReason::PastDue => write!(f, "This assessment is past its due date."),
            BlockedReason::Ineligible => write!(
                f,
                "You have already completed this assessment or you are not eligible to take it."
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Blocked(BlockedReason),
    /// "Assessment Will Start Soon".
    NotYetOpen { starts_at: NaiveDateTime },
    /// Answers are accepted; the countdown only runs while `is_active`.
    Open { is_active: bool },
    /// Results view.
    Completed,
}

/// Decides what the attempt page shows when it is loaded at `now`.
pub fn evaluate(
    assessment: &Assessment,
    submission: Option<&Submission>,
    eligibility: EligibilityResponse,
    now: NaiveDateTime,
) -> SessionStatus {
    let starts_at = assessment.starts_at();
    let is_past_due = now > assessment.due_at();
    let not_started_yet = now < starts_at;
    let is_completed = submission.map(|s| s.is_completed).unwrap_or(false);

    if !eligibility.can_take && !is_completed {
        let reason = if submission.map(|s| s.tab_switched).unwrap_or(false) {
            BlockedReason::TabSwitched
        } else if not_started_yet {
            BlockedReason::NotStartedYet { starts_at }
        } else if is_past_due {
            BlockedReason::PastDue
        } else {
            BlockedReason::Ineligible
        };
        return SessionStatus::Blocked(reason);
    }

    if is_completed {
        SessionStatus::Completed
    } else if not_started_yet {
        SessionStatus::NotYetOpen { starts_at }
    } else {
        SessionStatus::Open {
            is_active: eligibility.is_active,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionView {
    pub assessment: Assessment,
    pub submission: Option<Submission>,
    pub status: SessionStatus,
}

/// Fetches everything the attempt page needs and evaluates it at `now`.
pub async fn load_session(
    api: &dyn AssessmentApi,
    assessment_id: &str,
    student_id: &str,
    now: NaiveDateTime,
) -> Result<SessionView, ApiClientError> {
    let (assessment, submission, eligibility) = tokio::try_join!(
        api.get_assessment(assessment_id),
        api.get_submission(assessment_id, student_id),
        api.eligibility(assessment_id, student_id),
    )?;

    let status = evaluate(&assessment, submission.as_ref(), eligibility, now);
    log::debug!(
        "Loaded assessment {} for student {}: {:?}",
        assessment_id,
        student_id,
        status
    );

    Ok(SessionView {
        assessment,
        submission,
        status,
    })
}
