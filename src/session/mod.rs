//! A single student's attempt at an assessment: what the page shows on load,
//! the countdown and tab-switch state machine, and the result view.

pub mod controller;
pub mod driver;
pub mod scoring;
pub mod view;

pub use controller::{
    Reaction, SessionController, SessionEvent, SessionNotice, SessionPhase, SessionSnapshot,
    SubmitRequest, SubmitTrigger,
};
pub use driver::{SessionDriver, SessionOutcome};
pub use scoring::{FeedbackVerdict, QuestionFeedback, ResultsView, ScoreSummary};
pub use view::{evaluate, load_session, BlockedReason, SessionStatus, SessionView};

/// Renders seconds as `HH:MM:SS`; negative values render as zero.
pub fn format_time_remaining(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
