use std::{sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use tokio::{
    sync::mpsc,
    time::{self, Instant},
};

use crate::{
    client::AssessmentApi,
    models::domain::Submission,
    session::{
        controller::{Reaction, SessionController, SessionEvent, SessionNotice, SessionPhase},
        view::{SessionStatus, SessionView},
    },
};

const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    pub phase: SessionPhase,
    pub submission: Option<Submission>,
    pub tab_switch_count: u32,
}

/// Runs a [`SessionController`] against a 1 Hz interval and a stream of UI
/// events, forwarding submit requests to the API.
pub struct SessionDriver {
    api: Arc<dyn AssessmentApi>,
    student_id: String,
    controller: SessionController,
    notices: mpsc::UnboundedSender<SessionNotice>,
}

impl SessionDriver {
    pub fn new(
        api: Arc<dyn AssessmentApi>,
        student_id: &str,
        controller: SessionController,
        notices: mpsc::UnboundedSender<SessionNotice>,
    ) -> Self {
        SessionDriver {
            api,
            student_id: student_id.to_string(),
            controller,
            notices,
        }
    }

    /// Starts an attempt for a loaded view; `None` unless the view is open.
    pub fn open(
        api: Arc<dyn AssessmentApi>,
        student_id: &str,
        view: SessionView,
        now: NaiveDateTime,
        notices: mpsc::UnboundedSender<SessionNotice>,
    ) -> Option<Self> {
        let SessionStatus::Open { is_active } = view.status else {
            return None;
        };

        let mut controller = SessionController::new(view.assessment, view.submission.as_ref());
        controller.start(now, is_active);

        Some(Self::new(api, student_id, controller, notices))
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Returns once the attempt is submitted or the event source is dropped.
    pub async fn run(mut self, mut events: mpsc::Receiver<SessionEvent>) -> SessionOutcome {
        let mut interval = time::interval_at(Instant::now() + TICK, TICK);

        log::info!(
            "Session started for assessment {} (student {})",
            self.controller.assessment().id,
            self.student_id
        );

        loop {
            let reaction = tokio::select! {
                _ = interval.tick(), if self.controller.countdown_running() => {
                    self.controller.tick()
                }
                event = events.recv() => match event {
                    Some(event) => self.controller.handle(event),
                    None => {
                        log::debug!("Session event source closed");
                        break;
                    }
                },
            };

            self.dispatch(reaction).await;

            if self.controller.phase() == SessionPhase::Done {
                break;
            }
        }

        SessionOutcome {
            phase: self.controller.phase(),
            submission: self.controller.submission().cloned(),
            tab_switch_count: self.controller.tab_switch_count(),
        }
    }

    async fn dispatch(&mut self, reaction: Reaction) {
        self.emit(reaction.notices);

        let Some(request) = reaction.submit else {
            return;
        };

        let assessment_id = self.controller.assessment().id.clone();
        log::info!(
            "Submitting assessment {} for student {} ({:?})",
            assessment_id,
            self.student_id,
            request.trigger
        );

        let result = self
            .api
            .submit_assessment(
                &assessment_id,
                &self.student_id,
                request.answers,
                request.tab_switched,
            )
            .await
            .map_err(|e| {
                log::warn!("Submission of assessment {} failed: {}", assessment_id, e);
                e.to_string()
            });

        let reaction = self.controller.complete(result);
        self.emit(reaction.notices);
    }

    fn emit(&self, notices: Vec<SessionNotice>) {
        for notice in notices {
            if self.notices.send(notice).is_err() {
                log::debug!("Session notice dropped, receiver closed");
            }
        }
    }
}
