use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::{
    models::domain::{Answer, Assessment, Submission},
    session::format_time_remaining,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    InProgress,
    Submitting,
    Done,
}

/// Input from the UI layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    AnswerChanged { question_id: String, answer: String },
    VisibilityChanged { hidden: bool },
    WindowBlur,
    BeforeUnload,
    SubmitRequested,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    TimeExpired,
    TabSwitch,
}

impl SubmitTrigger {
    pub fn is_automatic(&self) -> bool {
        !matches!(self, SubmitTrigger::Manual)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitRequest {
    pub trigger: SubmitTrigger,
    pub answers: Vec<Answer>,
    pub tab_switched: bool,
}

/// Output for the UI layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionNotice {
    TabSwitchWarning { switch_count: u32 },
    ConfirmLeave,
    Submitted {
        trigger: SubmitTrigger,
        submission: Submission,
    },
    SubmitFailed {
        trigger: SubmitTrigger,
        message: String,
    },
}

impl SessionNotice {
    pub fn message(&self) -> String {
        match self {
            SessionNotice::TabSwitchWarning { .. } => {
                "You switched tabs or navigated away from this assessment. \
                 Further tab switching may result in automatic submission."
                    .to_string()
            }
            SessionNotice::ConfirmLeave => {
                "Leave the assessment? Your answers have not been submitted.".to_string()
            }
            SessionNotice::Submitted { trigger: SubmitTrigger::TabSwitch, .. } => {
                "Assessment auto-submitted due to tab switching".to_string()
            }
            SessionNotice::Submitted { .. } => "Assessment submitted successfully".to_string(),
            SessionNotice::SubmitFailed { message, .. } => message.clone(),
        }
    }
}

/// What one input produced: notices to render and at most one submit call.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    pub notices: Vec<SessionNotice>,
    pub submit: Option<SubmitRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub remaining_seconds: Option<i64>,
    pub time_remaining: Option<String>,
    pub answered: usize,
    pub total_questions: usize,
    pub progress_percent: u32,
    pub tab_switch_count: u32,
}

/// Countdown, answer buffer and the one-shot submission guard for one attempt.
///
/// Only `InProgress` may move into `Submitting`, so a timer expiry and a
/// visibility event arriving together produce a single submit request.
pub struct SessionController {
    assessment: Assessment,
    phase: SessionPhase,
    answers: HashMap<String, String>,
    remaining_seconds: Option<i64>,
    countdown_running: bool,
    listening: bool,
    auto_submit_spent: bool,
    tab_switch_count: u32,
    pending: Option<SubmitTrigger>,
    submission: Option<Submission>,
}

impl SessionController {
    /// Answers from a prior, unfinished submission are loaded into the buffer.
    pub fn new(assessment: Assessment, prior: Option<&Submission>) -> Self {
        let answers = prior
            .map(|s| {
                s.answers
                    .iter()
                    .map(|a| (a.question_id.clone(), a.answer.clone()))
                    .collect()
            })
            .unwrap_or_default();

        SessionController {
            assessment,
            phase: SessionPhase::Idle,
            answers,
            remaining_seconds: None,
            countdown_running: false,
            listening: false,
            auto_submit_spent: false,
            tab_switch_count: 0,
            pending: None,
            submission: None,
        }
    }

    /// Opens the attempt. Timer and tab-switch detection only run while active.
    pub fn start(&mut self, now: NaiveDateTime, is_active: bool) {
        if self.phase != SessionPhase::Idle {
            return;
        }
        self.phase = SessionPhase::InProgress;

        if !is_active {
            return;
        }
        self.listening = true;

        let seconds = (self.assessment.due_at() - now).num_seconds();
        if seconds > 0 {
            self.remaining_seconds = Some(seconds);
            self.countdown_running = true;
        } else {
            self.remaining_seconds = Some(0);
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown_running
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn tab_switch_count(&self) -> u32 {
        self.tab_switch_count
    }

    /// One second elapsed. The countdown holds while a submit is in flight.
    pub fn tick(&mut self) -> Reaction {
        let mut reaction = Reaction::default();
        if !self.countdown_running || self.phase != SessionPhase::InProgress {
            return reaction;
        }

        match self.remaining_seconds {
            Some(remaining) if remaining > 1 => {
                self.remaining_seconds = Some(remaining - 1);
            }
            _ => {
                self.remaining_seconds = Some(0);
                self.countdown_running = false;
                reaction.submit = self.begin_submit(SubmitTrigger::TimeExpired);
            }
        }

        reaction
    }

    pub fn handle(&mut self, event: SessionEvent) -> Reaction {
        let mut reaction = Reaction::default();

        match event {
            SessionEvent::AnswerChanged {
                question_id,
                answer,
            } => {
                if self.phase != SessionPhase::Done {
                    self.answers.insert(question_id, answer);
                }
            }
            SessionEvent::VisibilityChanged { hidden: false } => {}
            SessionEvent::VisibilityChanged { hidden: true } | SessionEvent::WindowBlur => {
                if !self.listening {
                    return reaction;
                }

                self.tab_switch_count += 1;
                reaction.notices.push(SessionNotice::TabSwitchWarning {
                    switch_count: self.tab_switch_count,
                });
                reaction.submit = self.begin_submit(SubmitTrigger::TabSwitch);
            }
            SessionEvent::BeforeUnload => {
                if matches!(
                    self.phase,
                    SessionPhase::InProgress | SessionPhase::Submitting
                ) {
                    reaction.notices.push(SessionNotice::ConfirmLeave);
                }
            }
            SessionEvent::SubmitRequested => {
                reaction.submit = self.begin_submit(SubmitTrigger::Manual);
            }
        }

        reaction
    }

    /// Moves into `Submitting` and packages the buffered answers. Automatic
    /// triggers fire at most once per attempt and stop the countdown.
    pub fn begin_submit(&mut self, trigger: SubmitTrigger) -> Option<SubmitRequest> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }

        if trigger.is_automatic() {
            if self.auto_submit_spent {
                return None;
            }
            self.auto_submit_spent = true;
            self.countdown_running = false;
        }

        self.phase = SessionPhase::Submitting;
        self.pending = Some(trigger);

        Some(SubmitRequest {
            trigger,
            answers: self.packaged_answers(),
            tab_switched: trigger == SubmitTrigger::TabSwitch,
        })
    }

    /// Applies the outcome of the in-flight submit call.
    pub fn complete(&mut self, result: Result<Submission, String>) -> Reaction {
        let mut reaction = Reaction::default();
        let Some(trigger) = self.pending.take() else {
            return reaction;
        };

        match result {
            Ok(submission) => {
                self.phase = SessionPhase::Done;
                self.countdown_running = false;
                self.listening = false;
                self.submission = Some(submission.clone());
                reaction.notices.push(SessionNotice::Submitted {
                    trigger,
                    submission,
                });
            }
            Err(message) => {
                self.phase = SessionPhase::InProgress;
                reaction
                    .notices
                    .push(SessionNotice::SubmitFailed { trigger, message });
            }
        }

        reaction
    }

    /// Non-empty answers in question order.
    pub fn packaged_answers(&self) -> Vec<Answer> {
        self.assessment
            .questions
            .iter()
            .filter_map(|q| {
                let answer = self.answers.get(&q.id)?;
                if answer.trim().is_empty() {
                    None
                } else {
                    Some(Answer::new(&q.id, answer))
                }
            })
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let total_questions = self.assessment.questions.len();
        let answered = self.packaged_answers().len();
        let progress_percent = if total_questions == 0 {
            0
        } else {
            (answered as f64 / total_questions as f64 * 100.0).round() as u32
        };

        SessionSnapshot {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            time_remaining: self.remaining_seconds.map(format_time_remaining),
            answered,
            total_questions,
            progress_percent,
            tab_switch_count: self.tab_switch_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{at, graded_submission, mixed_assessment};

    fn assessment() -> Assessment {
        mixed_assessment(at("2024-01-01 09:00"), at("2024-01-01 10:00"))
    }

    fn started_at(now: &str) -> SessionController {
        let mut controller = SessionController::new(assessment(), None);
        controller.start(at(now), true);
        controller
    }

    fn answer(question_id: &str, answer: &str) -> SessionEvent {
        SessionEvent::AnswerChanged {
            question_id: question_id.to_string(),
            answer: answer.to_string(),
        }
    }

    fn submitted(controller: &SessionController) -> Submission {
        graded_submission(controller.assessment(), "s-1", vec![], 0, None)
    }

    #[test]
    fn start_inside_window_runs_countdown() {
        let controller = started_at("2024-01-01 09:30");
        let snapshot = controller.snapshot();

        assert_eq!(snapshot.phase, SessionPhase::InProgress);
        assert_eq!(snapshot.remaining_seconds, Some(1800));
        assert_eq!(snapshot.time_remaining.as_deref(), Some("00:30:00"));
        assert!(controller.countdown_running());
    }

    #[test]
    fn start_at_due_shows_zero_without_timer() {
        let controller = started_at("2024-01-01 10:00");

        assert_eq!(controller.snapshot().remaining_seconds, Some(0));
        assert!(!controller.countdown_running());
    }

    #[test]
    fn inactive_start_ignores_visibility() {
        let mut controller = SessionController::new(assessment(), None);
        controller.start(at("2024-01-01 09:30"), false);

        let reaction = controller.handle(SessionEvent::VisibilityChanged { hidden: true });
        assert_eq!(reaction, Reaction::default());
        assert!(!controller.countdown_running());
    }

    #[test]
    fn countdown_expiry_submits_once() {
        let mut controller = started_at("2024-01-01 09:59:58");
        controller.handle(answer("q-1", "4"));

        assert!(controller.tick().submit.is_none());
        let request = controller.tick().submit.expect("expiry submits");

        assert_eq!(request.trigger, SubmitTrigger::TimeExpired);
        assert!(!request.tab_switched);
        assert_eq!(request.answers, vec![Answer::new("q-1", "4")]);
        assert_eq!(controller.phase(), SessionPhase::Submitting);
        assert!(controller.tick().submit.is_none());
    }

    #[test]
    fn expiry_then_visibility_in_same_tick_submits_once() {
        let mut controller = started_at("2024-01-01 09:59:59");

        let first = controller.tick();
        let second = controller.handle(SessionEvent::VisibilityChanged { hidden: true });

        assert!(first.submit.is_some());
        assert!(second.submit.is_none());
        assert_eq!(
            second.notices,
            vec![SessionNotice::TabSwitchWarning { switch_count: 1 }]
        );
    }

    #[test]
    fn visibility_then_expiry_in_same_tick_submits_once() {
        let mut controller = started_at("2024-01-01 09:59:59");

        let first = controller.handle(SessionEvent::WindowBlur);
        let second = controller.tick();

        let request = first.submit.expect("tab switch submits");
        assert!(request.tab_switched);
        assert_eq!(request.trigger, SubmitTrigger::TabSwitch);
        assert!(second.submit.is_none());
    }

    #[test]
    fn only_first_tab_switch_submits() {
        let mut controller = started_at("2024-01-01 09:30");

        assert!(controller.handle(SessionEvent::WindowBlur).submit.is_some());
        let reaction = controller.complete(Err("Network down".to_string()));
        assert_eq!(
            reaction.notices,
            vec![SessionNotice::SubmitFailed {
                trigger: SubmitTrigger::TabSwitch,
                message: "Network down".to_string()
            }]
        );
        assert_eq!(controller.phase(), SessionPhase::InProgress);

        let again = controller.handle(SessionEvent::VisibilityChanged { hidden: true });
        assert!(again.submit.is_none());
        assert_eq!(controller.tab_switch_count(), 2);
        assert!(!controller.countdown_running());

        let manual = controller.handle(SessionEvent::SubmitRequested);
        assert_eq!(
            manual.submit.map(|r| (r.trigger, r.tab_switched)),
            Some((SubmitTrigger::Manual, false))
        );
    }

    #[test]
    fn failed_manual_submit_keeps_countdown() {
        let mut controller = started_at("2024-01-01 09:30");

        assert!(controller.handle(SessionEvent::SubmitRequested).submit.is_some());
        controller.complete(Err("Server unavailable".to_string()));

        assert_eq!(controller.phase(), SessionPhase::InProgress);
        assert!(controller.countdown_running());
    }

    #[test]
    fn countdown_holds_while_manual_submit_is_in_flight() {
        let mut controller = started_at("2024-01-01 09:59:59");
        assert_eq!(controller.snapshot().remaining_seconds, Some(1));

        assert!(controller.handle(SessionEvent::SubmitRequested).submit.is_some());
        assert!(controller.tick().submit.is_none());
        assert!(controller.countdown_running());
        assert_eq!(controller.snapshot().remaining_seconds, Some(1));

        controller.complete(Err("Server unavailable".to_string()));
        assert_eq!(controller.phase(), SessionPhase::InProgress);

        let expired = controller.tick();
        assert_eq!(
            expired.submit.map(|r| r.trigger),
            Some(SubmitTrigger::TimeExpired)
        );
        assert!(!controller.countdown_running());
    }

    #[test]
    fn success_stops_everything() {
        let mut controller = started_at("2024-01-01 09:30");

        controller.handle(SessionEvent::SubmitRequested);
        let submission = submitted(&controller);
        let reaction = controller.complete(Ok(submission.clone()));

        assert_eq!(
            reaction.notices,
            vec![SessionNotice::Submitted {
                trigger: SubmitTrigger::Manual,
                submission
            }]
        );
        assert_eq!(controller.phase(), SessionPhase::Done);
        assert!(!controller.countdown_running());
        assert!(controller.tick().submit.is_none());
        assert!(controller
            .handle(SessionEvent::VisibilityChanged { hidden: true })
            .notices
            .is_empty());
        assert!(controller.handle(SessionEvent::SubmitRequested).submit.is_none());
    }

    #[test]
    fn packaging_skips_blank_answers_and_keeps_question_order() {
        let mut controller = started_at("2024-01-01 09:30");
        controller.handle(answer("q-3", "Leaves make food"));
        controller.handle(answer("q-2", "   "));
        controller.handle(answer("q-1", "4"));

        assert_eq!(
            controller.packaged_answers(),
            vec![
                Answer::new("q-1", "4"),
                Answer::new("q-3", "Leaves make food")
            ]
        );
        assert_eq!(controller.snapshot().progress_percent, 67);
    }

    #[test]
    fn before_unload_asks_for_confirmation_while_in_progress() {
        let mut controller = SessionController::new(assessment(), None);
        assert!(controller.handle(SessionEvent::BeforeUnload).notices.is_empty());

        controller.start(at("2024-01-01 09:30"), true);
        assert_eq!(
            controller.handle(SessionEvent::BeforeUnload).notices,
            vec![SessionNotice::ConfirmLeave]
        );
    }

    #[test]
    fn prior_answers_are_restored() {
        let prior = graded_submission(
            &assessment(),
            "s-1",
            vec![Answer::new("q-2", "Paris")],
            4,
            None,
        );
        let controller = SessionController::new(assessment(), Some(&prior));

        assert_eq!(controller.packaged_answers(), vec![Answer::new("q-2", "Paris")]);
    }
}
