//! Session runtime executor

use super::traits::{Collaborators, ResultSink};
use super::{SessionCommand, SessionUpdate};

use crate::state_machine::state::TimerView;
use crate::state_machine::{transition, Effect, Event, Session, TransitionError};
use crate::timer::{CountdownTimer, TimerSignal};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Drives one session: owns its state, runs transitions and executes effects.
///
/// Input sources are polled in a fixed priority order (caller commands,
/// then collaborator results, then timer signals), so a manual submit always
/// beats an expiry that became ready at the same instant.
pub struct SessionRuntime<C, P>
where
    C: Collaborators + ?Sized + 'static,
    P: ResultSink + ?Sized + 'static,
{
    session: Session,
    collaborators: Arc<C>,
    sink: Arc<P>,
    timer: CountdownTimer,
    command_rx: mpsc::Receiver<SessionCommand>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    timer_rx: mpsc::Receiver<TimerSignal>,
    timer_tx: mpsc::Sender<TimerSignal>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
}

impl<C, P> SessionRuntime<C, P>
where
    C: Collaborators + ?Sized + 'static,
    P: ResultSink + ?Sized + 'static,
{
    pub fn new(
        session: Session,
        collaborators: Arc<C>,
        sink: Arc<P>,
        tick: Duration,
        command_rx: mpsc::Receiver<SessionCommand>,
        broadcast_tx: broadcast::Sender<SessionUpdate>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (timer_tx, timer_rx) = mpsc::channel(64);
        Self {
            session,
            collaborators,
            sink,
            timer: CountdownTimer::new(tick),
            command_rx,
            event_rx,
            event_tx,
            timer_rx,
            timer_tx,
            broadcast_tx,
        }
    }

    /// Sender feeding the timer input, for injecting signals in tests
    #[cfg(test)]
    pub fn timer_sender(&self) -> mpsc::Sender<TimerSignal> {
        self.timer_tx.clone()
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session.id, "Starting session runtime");

        if let Err(e) = self.process_event(Event::Start).await {
            tracing::error!(session_id = %self.session.id, error = %e, "Failed to start session");
        }

        loop {
            tokio::select! {
                biased;

                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    // All handles dropped: the session was abandoned
                    None => break,
                },

                Some(event) = self.event_rx.recv() => {
                    if let Err(e) = self.process_event(event).await {
                        tracing::warn!(session_id = %self.session.id, error = %e, "Rejected internal event");
                    }
                }

                Some(signal) = self.timer_rx.recv() => {
                    let event = match signal {
                        TimerSignal::Tick { question_index, remaining } => {
                            Event::TimerTick { question_index, remaining }
                        }
                        TimerSignal::Expired { question_index } => {
                            tracing::info!(session_id = %self.session.id, question_index, "Answer time expired");
                            Event::TimerExpired { question_index }
                        }
                    };
                    if let Err(e) = self.process_event(event).await {
                        tracing::warn!(session_id = %self.session.id, error = %e, "Rejected timer event");
                    }
                }
            }
        }

        self.timer.stop();
        tracing::info!(
            session_id = %self.session.id,
            state = self.session.state.name(),
            "Session runtime stopped"
        );
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::UpdateDraft { text, reply } => {
                let result = self.process_event(Event::DraftUpdated { text }).await;
                let _ = reply.send(result.map(|()| self.session.snapshot()));
            }
            SessionCommand::Submit { reply } => {
                tracing::info!(
                    session_id = %self.session.id,
                    question_index = ?self.session.state.question_index(),
                    "Manual submit"
                );
                let result = self.process_event(Event::Submit).await;
                let _ = reply.send(result.map(|()| self.session.snapshot()));
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
        }
    }

    /// Run `event` and everything it chains into.
    ///
    /// Only a rejection of `event` itself is returned; rejections further down
    /// the chain are logged and broadcast.
    async fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let mut queue = VecDeque::from([event]);
        let mut first = true;

        while let Some(current) = queue.pop_front() {
            let event_name = current.name();
            let result = match transition(&self.session, current) {
                Ok(r) => r,
                Err(e) => {
                    if first {
                        return Err(e);
                    }
                    tracing::error!(session_id = %self.session.id, event = event_name, error = %e, "Chained event rejected");
                    let _ = self.broadcast_tx.send(SessionUpdate::Error {
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            first = false;

            let old_state = self.session.state.name();
            self.session = result.new_session;
            if old_state != self.session.state.name() {
                tracing::info!(
                    session_id = %self.session.id,
                    from = old_state,
                    to = self.session.state.name(),
                    event = event_name,
                    "State transition"
                );
            }

            for effect in result.effects {
                match self.execute_effect(effect).await {
                    Ok(Some(generated)) => queue.push_back(generated),
                    Ok(None) => {}
                    Err(message) => {
                        // Remaining effects belong to a step that can no longer be recorded
                        let _ = self.broadcast_tx.send(SessionUpdate::Error {
                            message: message.clone(),
                        });
                        queue.push_back(Event::PersistenceFailed { message });
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Execute an effect and optionally return a generated event.
    /// `Err` means the result sink rejected a write.
    async fn execute_effect(&mut self, effect: Effect) -> Result<Option<Event>, String> {
        match effect {
            Effect::GenerateQuestions(request) => {
                let collaborators = self.collaborators.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let event = match collaborators.generate_questions(&request).await {
                        Ok(questions) => Event::QuestionsGenerated { questions },
                        Err(e) => Event::GenerationFailed { message: e.message },
                    };
                    // Closed channel means the session is gone; drop the result
                    let _ = event_tx.send(event).await;
                });
                Ok(None)
            }

            Effect::Evaluate {
                question_index,
                request,
            } => {
                let collaborators = self.collaborators.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let event = match collaborators.evaluate(&request).await {
                        Ok(evaluation) => Event::Evaluated {
                            question_index,
                            score: evaluation.score,
                            feedback: evaluation.feedback,
                        },
                        Err(e) => Event::EvaluationFailed {
                            question_index,
                            message: e.message,
                        },
                    };
                    let _ = event_tx.send(event).await;
                });
                Ok(None)
            }

            Effect::Summarize(request) => {
                let collaborators = self.collaborators.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let event = match collaborators.summarize(&request).await {
                        Ok(summary) => Event::Summarized {
                            score: summary.score,
                            summary: summary.summary,
                        },
                        Err(e) => Event::SummaryFailed { message: e.message },
                    };
                    let _ = event_tx.send(event).await;
                });
                Ok(None)
            }

            Effect::StartTimer {
                question_index,
                duration_units,
            } => {
                self.timer
                    .start(question_index, duration_units, self.timer_tx.clone());
                Ok(None)
            }

            Effect::StopTimer => {
                self.timer.stop();
                Ok(None)
            }

            Effect::PersistCandidate(record) => {
                self.sink.record_candidate(&record).await.map(|()| None)
            }

            Effect::PersistResponse(record) => {
                self.sink.record_response(&record).await.map(|()| None)
            }

            Effect::PersistOutcome(record) => {
                self.sink.record_outcome(&record).await.map(|()| None)
            }

            Effect::Continue => Ok(Some(Event::Continue)),

            Effect::NotifyMessage(message) => {
                let _ = self.broadcast_tx.send(SessionUpdate::Message { message });
                Ok(None)
            }

            Effect::NotifyState => {
                let _ = self.broadcast_tx.send(SessionUpdate::StateChange {
                    state: self.session.state.clone(),
                    current_index: self.session.current_index(),
                });
                Ok(None)
            }

            Effect::NotifyTimer(timer) => {
                let _ = self.broadcast_tx.send(SessionUpdate::Timer {
                    timer: TimerView::from(timer),
                });
                Ok(None)
            }
        }
    }
}
