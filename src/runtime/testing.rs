//! Mock implementations for testing
//!
//! These mocks let the executor run end to end without network or disk.

use super::traits::*;
use super::{
    RuntimeSettings, SessionCommand, SessionError, SessionManager, SessionRuntime, SessionUpdate,
};
use crate::collaborators::{
    AnswerEvaluator, CollaboratorError, Evaluation, EvaluationRequest, QuestionGenerator,
    QuestionRequest, Summarizer, Summary, SummaryRequest,
};
use crate::db::{CandidateRecord, OutcomeRecord, ResponseRecord};
use crate::state_machine::state::{Candidate, Question};
use crate::state_machine::{Session, SessionSnapshot, SessionState, TransitionError};
use crate::timer::TimerSignal;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

// ============================================================================
// Mock Collaborators
// ============================================================================

/// Collaborators that return queued results and record every request
#[allow(dead_code)]
#[derive(Default)]
pub struct MockCollaborators {
    questions: Mutex<VecDeque<Result<Vec<Question>, CollaboratorError>>>,
    evaluations: Mutex<VecDeque<Result<Evaluation, CollaboratorError>>>,
    summaries: Mutex<VecDeque<Result<Summary, CollaboratorError>>>,
    /// Simulated latency applied to every call
    delay: Option<Duration>,
    pub question_requests: Mutex<Vec<QuestionRequest>>,
    pub evaluation_requests: Mutex<Vec<EvaluationRequest>>,
    pub summary_requests: Mutex<Vec<SummaryRequest>>,
}

#[allow(dead_code)]
impl MockCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_questions(&self, questions: Vec<Question>) {
        self.questions.lock().unwrap().push_back(Ok(questions));
    }

    pub fn queue_questions_error(&self, error: CollaboratorError) {
        self.questions.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_evaluation(&self, score: u8, feedback: &str) {
        self.evaluations.lock().unwrap().push_back(Ok(Evaluation {
            score,
            feedback: feedback.to_string(),
        }));
    }

    pub fn queue_evaluation_error(&self, error: CollaboratorError) {
        self.evaluations.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_summary(&self, score: u8, summary: &str) {
        self.summaries.lock().unwrap().push_back(Ok(Summary {
            score,
            summary: summary.to_string(),
        }));
    }

    pub fn queue_summary_error(&self, error: CollaboratorError) {
        self.summaries.lock().unwrap().push_back(Err(error));
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluation_requests.lock().unwrap().len()
    }

    pub fn recorded_evaluations(&self) -> Vec<EvaluationRequest> {
        self.evaluation_requests.lock().unwrap().clone()
    }

    async fn simulate_latency(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl QuestionGenerator for MockCollaborators {
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, CollaboratorError> {
        self.question_requests.lock().unwrap().push(request.clone());
        self.simulate_latency().await;
        self.questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::network("No mock questions queued")))
    }
}

#[async_trait]
impl AnswerEvaluator for MockCollaborators {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, CollaboratorError> {
        self.evaluation_requests.lock().unwrap().push(request.clone());
        self.simulate_latency().await;
        self.evaluations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::network("No mock evaluation queued")))
    }
}

#[async_trait]
impl Summarizer for MockCollaborators {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary, CollaboratorError> {
        self.summary_requests.lock().unwrap().push(request.clone());
        self.simulate_latency().await;
        self.summaries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::network("No mock summary queued")))
    }
}

// ============================================================================
// In-Memory Sink
// ============================================================================

#[derive(Default)]
pub struct InMemorySink {
    pub candidates: Mutex<Vec<CandidateRecord>>,
    pub responses: Mutex<Vec<ResponseRecord>>,
    pub outcomes: Mutex<Vec<OutcomeRecord>>,
    fail_responses: AtomicBool,
    fail_outcomes: AtomicBool,
}

#[allow(dead_code)]
impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `record_response` call fail
    pub fn fail_responses(&self) {
        self.fail_responses.store(true, Ordering::SeqCst);
    }

    /// Make every `record_outcome` call fail
    pub fn fail_outcomes(&self) {
        self.fail_outcomes.store(true, Ordering::SeqCst);
    }

    pub fn recorded_responses(&self) -> Vec<ResponseRecord> {
        self.responses.lock().unwrap().clone()
    }

    pub fn recorded_outcomes(&self) -> Vec<OutcomeRecord> {
        self.outcomes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSink for InMemorySink {
    async fn record_candidate(&self, record: &CandidateRecord) -> Result<(), String> {
        self.candidates.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn record_response(&self, record: &ResponseRecord) -> Result<(), String> {
        if self.fail_responses.load(Ordering::SeqCst) {
            return Err("Sink unavailable".to_string());
        }
        self.responses.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn record_outcome(&self, record: &OutcomeRecord) -> Result<(), String> {
        if self.fail_outcomes.load(Ordering::SeqCst) {
            return Err("disk full".to_string());
        }
        self.outcomes.lock().unwrap().push(record.clone());
        Ok(())
    }
}

// ============================================================================
// Test Session Harness
// ============================================================================

pub fn test_candidate() -> Candidate {
    Candidate {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        resume_text: "Analytical engines".to_string(),
    }
}

/// A running session wired to mocks
pub struct TestSession {
    pub collaborators: Arc<MockCollaborators>,
    pub sink: Arc<InMemorySink>,
    pub command_tx: mpsc::Sender<SessionCommand>,
    pub broadcast_rx: broadcast::Receiver<SessionUpdate>,
    /// Feeds the runtime's timer input directly
    pub timer_tx: mpsc::Sender<TimerSignal>,
    _runtime_handle: tokio::task::JoinHandle<()>,
}

impl TestSession {
    /// Start a session against `collaborators` with one-second timer units
    pub fn start(collaborators: MockCollaborators) -> Self {
        Self::start_with_sink(collaborators, InMemorySink::new())
    }

    pub fn start_with_sink(collaborators: MockCollaborators, sink: InMemorySink) -> Self {
        let collaborators = Arc::new(collaborators);
        let sink = Arc::new(sink);
        let (command_tx, command_rx) = mpsc::channel(32);
        let (broadcast_tx, broadcast_rx) = broadcast::channel(1024);

        let runtime = SessionRuntime::new(
            Session::new("test-session", test_candidate()),
            collaborators.clone(),
            sink.clone(),
            Duration::from_secs(1),
            command_rx,
            broadcast_tx,
        );
        let timer_tx = runtime.timer_sender();
        let handle = tokio::spawn(runtime.run());

        Self {
            collaborators,
            sink,
            command_tx,
            broadcast_rx,
            timer_tx,
            _runtime_handle: handle,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Snapshot { reply })
            .await
            .unwrap();
        rx.await.unwrap()
    }

    pub async fn draft(&self, text: &str) -> Result<SessionSnapshot, TransitionError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::UpdateDraft {
                text: text.to_string(),
                reply,
            })
            .await
            .unwrap();
        rx.await.unwrap()
    }

    pub async fn submit(&self) -> Result<SessionSnapshot, TransitionError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Submit { reply })
            .await
            .unwrap();
        rx.await.unwrap()
    }

    /// Wait for a broadcast state change matching `predicate`
    pub async fn wait_for(
        &mut self,
        predicate: impl Fn(&SessionState) -> bool,
        timeout: Duration,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.broadcast_rx.recv()).await {
                Ok(Ok(SessionUpdate::StateChange { state, .. })) if predicate(&state) => {
                    return true;
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => return false,
                _ => {}
            }
        }
        false
    }

    /// Wait for a broadcast timer update showing `remaining`
    pub async fn wait_for_timer(&mut self, remaining: u32) -> bool {
        loop {
            match tokio::time::timeout(Duration::from_secs(5), self.broadcast_rx.recv()).await {
                Ok(Ok(SessionUpdate::Timer { timer })) if timer.remaining == remaining => {
                    return true;
                }
                Ok(Ok(_) | Err(broadcast::error::RecvError::Lagged(_))) => {}
                Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return false,
            }
        }
    }

    pub async fn wait_for_question(&mut self, index: usize) -> bool {
        self.wait_for(
            |s| *s == SessionState::AwaitingAnswer { index },
            Duration::from_secs(600),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{SubmitTrigger, NO_ANSWER_PLACEHOLDER};
    use crate::state_machine::state::{Difficulty, FailureKind};

    const WAIT: Duration = Duration::from_secs(600);

    fn two_questions() -> Vec<Question> {
        vec![
            Question::new("What is ownership?", Difficulty::Easy),
            Question::new("Explain Send and Sync", Difficulty::Medium),
        ]
    }

    fn mocks_with_questions() -> MockCollaborators {
        let mocks = MockCollaborators::new();
        mocks.queue_questions(two_questions());
        mocks
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_answers_complete_the_interview() {
        let mocks = mocks_with_questions();
        mocks.queue_evaluation(80, "Clear explanation");
        mocks.queue_evaluation(60, "Missed auto traits");
        mocks.queue_summary(70, "Good fundamentals");
        let mut session = TestSession::start(mocks);

        assert!(session.wait_for_question(0).await);
        session.draft("Each value has one owner").await.unwrap();
        let snapshot = session.submit().await.unwrap();
        assert!(matches!(snapshot.state, SessionState::Evaluating { index: 0, .. }));

        assert!(session.wait_for_question(1).await);
        session.draft("Thread-safety markers").await.unwrap();
        session.submit().await.unwrap();

        assert!(session.wait_for(|s| *s == SessionState::Completed, WAIT).await);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.responses.len(), 2);
        assert_eq!(snapshot.responses[0].score, Some(80));
        assert_eq!(snapshot.outcome.as_ref().map(|o| o.score), Some(70));
        assert_eq!(
            snapshot.messages.last().map(|m| m.content.as_str()),
            Some("Thank you for completing the interview! Your score: 70/100\n\nGood fundamentals")
        );
        assert_eq!(snapshot.timer.total, 0);

        assert_eq!(session.collaborators.evaluation_count(), 2);
        let summaries = session.collaborators.summary_requests.lock().unwrap().clone();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].responses.len(), 2);
        assert_eq!(session.sink.candidates.lock().unwrap().len(), 1);
        let responses = session.sink.recorded_responses();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1].question_index, 1);
        assert_eq!(session.sink.recorded_outcomes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_timeout_records_placeholder_without_evaluation() {
        let mut session = TestSession::start(mocks_with_questions());

        assert!(session.wait_for_question(0).await);
        // Let the 20-unit countdown run out with nothing typed
        assert!(session.wait_for_question(1).await);

        assert_eq!(session.collaborators.evaluation_count(), 0);
        let responses = session.sink.recorded_responses();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].answer, NO_ANSWER_PLACEHOLDER);
        assert_eq!(responses[0].time_taken_units, 20);
        assert_eq!(responses[0].score, None);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.timer.total, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_with_draft_is_evaluated() {
        let mocks = mocks_with_questions();
        mocks.queue_evaluation(40, "Partial");
        let mut session = TestSession::start(mocks);

        assert!(session.wait_for_question(0).await);
        session.draft("Values are moved").await.unwrap();
        assert!(session.wait_for_question(1).await);

        let evaluations = session.collaborators.recorded_evaluations();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0].answer, "Values are moved");
        assert_eq!(evaluations[0].difficulty, Difficulty::Easy);

        let responses = session.sink.recorded_responses();
        assert_eq!(responses[0].time_taken_units, 20);
        assert_eq!(responses[0].score, Some(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_manual_submit_is_rejected() {
        let mut session = TestSession::start(mocks_with_questions());
        assert!(session.wait_for_question(0).await);

        session.draft(" \n ").await.unwrap();
        let err = session.submit().await.unwrap_err();
        assert_eq!(err.kind(), "validation");

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.state, SessionState::AwaitingAnswer { index: 0 });
        assert_eq!(session.collaborators.evaluation_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluation_failure_fails_session() {
        let mocks = mocks_with_questions();
        mocks.queue_evaluation(90, "Great");
        mocks.queue_evaluation_error(CollaboratorError::server_error("503"));
        let mut session = TestSession::start(mocks);

        assert!(session.wait_for_question(0).await);
        session.draft("first").await.unwrap();
        session.submit().await.unwrap();
        assert!(session.wait_for_question(1).await);
        session.draft("second").await.unwrap();
        session.submit().await.unwrap();

        assert!(
            session
                .wait_for(|s| matches!(s, SessionState::Failed { .. }), WAIT)
                .await
        );
        let snapshot = session.snapshot().await;
        assert!(matches!(
            snapshot.state,
            SessionState::Failed {
                kind: FailureKind::EvaluationFailed,
                question_index: Some(1),
                ..
            }
        ));
        assert_eq!(snapshot.responses.len(), 1);
        assert_eq!(session.collaborators.evaluation_count(), 2);

        let err = session.submit().await.unwrap_err();
        assert_eq!(err.kind(), "invalid_state");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_failure_fails_session() {
        let mocks = MockCollaborators::new();
        mocks.queue_questions_error(CollaboratorError::auth("bad key"));
        let mut session = TestSession::start(mocks);

        assert!(
            session
                .wait_for(|s| matches!(s, SessionState::Failed { .. }), WAIT)
                .await
        );
        let snapshot = session.snapshot().await;
        assert!(matches!(
            snapshot.state,
            SessionState::Failed {
                kind: FailureKind::GenerationFailed,
                ..
            }
        ));
        assert_eq!(session.sink.candidates.lock().unwrap().len(), 1);
        assert_eq!(
            session.collaborators.question_requests.lock().unwrap()[0].candidate_name,
            "Ada"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_evaluating_is_busy() {
        let mocks = mocks_with_questions().with_delay(Duration::from_secs(5));
        mocks.queue_evaluation(50, "Fine");
        let mut session = TestSession::start(mocks);

        assert!(session.wait_for_question(0).await);
        session.draft("answer").await.unwrap();
        session.submit().await.unwrap();

        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, TransitionError::Busy { .. }));
        let err = session.draft("more").await.unwrap_err();
        assert!(matches!(err, TransitionError::Busy { .. }));

        assert!(session.wait_for_question(1).await);
        assert_eq!(session.collaborators.evaluation_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistence_failure_fails_session() {
        let sink = InMemorySink::new();
        sink.fail_responses();
        let mocks = mocks_with_questions();
        mocks.queue_evaluation(70, "Ok");
        let mut session = TestSession::start_with_sink(mocks, sink);

        assert!(session.wait_for_question(0).await);
        session.draft("answer").await.unwrap();
        session.submit().await.unwrap();

        assert!(
            session
                .wait_for(
                    |s| matches!(
                        s,
                        SessionState::Failed {
                            kind: FailureKind::PersistenceFailed,
                            ..
                        }
                    ),
                    WAIT
                )
                .await
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_submit_beats_queued_expiry() {
        let mocks = mocks_with_questions();
        mocks.queue_evaluation(55, "Borderline");
        let mut session = TestSession::start(mocks);

        assert!(session.wait_for_question(0).await);
        session.draft("last second answer").await.unwrap();

        // Final tick lands first
        session
            .timer_tx
            .send(TimerSignal::Tick {
                question_index: 0,
                remaining: 0,
            })
            .await
            .unwrap();
        assert!(session.wait_for_timer(0).await);

        // Expiry and manual submit are both pending before the runtime runs again
        session
            .timer_tx
            .try_send(TimerSignal::Expired { question_index: 0 })
            .unwrap();
        let (reply, rx) = oneshot::channel();
        session
            .command_tx
            .try_send(SessionCommand::Submit { reply })
            .unwrap();

        let snapshot = rx.await.unwrap().unwrap();
        match &snapshot.state {
            SessionState::Evaluating { index: 0, submission } => {
                assert_eq!(submission.trigger, SubmitTrigger::Manual);
                assert_eq!(submission.time_taken_units, 20);
                assert_eq!(submission.answer_text, "last second answer");
            }
            other => panic!("expected evaluating, got {other:?}"),
        }

        assert!(session.wait_for_question(1).await);
        assert_eq!(session.collaborators.evaluation_count(), 1);
        let responses = session.sink.recorded_responses();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].time_taken_units, 20);
        assert_eq!(responses[0].score, Some(55));
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcome_write_failure_fails_session() {
        let sink = InMemorySink::new();
        sink.fail_outcomes();
        let mocks = MockCollaborators::new();
        mocks.queue_questions(vec![Question::new("What is a trait?", Difficulty::Easy)]);
        mocks.queue_evaluation(70, "Fine");
        mocks.queue_summary(70, "Solid");
        let mut session = TestSession::start_with_sink(mocks, sink);

        assert!(session.wait_for_question(0).await);
        session.draft("Shared behavior").await.unwrap();
        session.submit().await.unwrap();

        let mut updates = Vec::new();
        let deadline = tokio::time::Instant::now() + WAIT;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_secs(1), session.broadcast_rx.recv()).await {
                Ok(Ok(update)) => {
                    let done = matches!(
                        update,
                        SessionUpdate::StateChange {
                            state: SessionState::Failed { .. },
                            ..
                        }
                    );
                    updates.push(update);
                    if done {
                        break;
                    }
                }
                Ok(Err(broadcast::error::RecvError::Lagged(_))) | Err(_) => {}
                Ok(Err(broadcast::error::RecvError::Closed)) => break,
            }
        }

        assert!(updates.iter().any(|u| matches!(
            u,
            SessionUpdate::Error { message } if message == "disk full"
        )));
        assert!(!updates.iter().any(|u| matches!(
            u,
            SessionUpdate::StateChange {
                state: SessionState::Completed,
                ..
            }
        )));
        assert!(!updates.iter().any(|u| matches!(
            u,
            SessionUpdate::Message { message } if message.content.starts_with("Thank you")
        )));

        let snapshot = session.snapshot().await;
        assert!(matches!(
            snapshot.state,
            SessionState::Failed {
                kind: FailureKind::PersistenceFailed,
                ..
            }
        ));
        assert_eq!(snapshot.outcome, None);
        assert!(session.sink.recorded_outcomes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manager_abandon_discards_late_results() {
        let mocks = Arc::new(mocks_with_questions().with_delay(Duration::from_secs(3)));
        mocks.queue_evaluation(99, "Too late");
        let sink = Arc::new(InMemorySink::new());
        let manager = SessionManager::new(mocks.clone(), sink.clone(), RuntimeSettings::default());

        let snapshot = manager.create_session(test_candidate()).await.unwrap();
        let id = snapshot.id.clone();
        let (_, mut updates) = manager.subscribe(&id).await.unwrap();
        loop {
            match updates.recv().await.unwrap() {
                SessionUpdate::StateChange {
                    state: SessionState::AwaitingAnswer { .. },
                    ..
                } => break,
                _ => continue,
            }
        }

        manager.update_draft(&id, "answer".to_string()).await.unwrap();
        manager.submit(&id).await.unwrap();
        manager.abandon(&id).await.unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(mocks.evaluation_count(), 1);
        assert!(sink.recorded_responses().is_empty());
        assert!(matches!(
            manager.snapshot(&id).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(manager.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manager_rejects_invalid_candidate() {
        let manager = SessionManager::new(
            Arc::new(MockCollaborators::new()),
            Arc::new(InMemorySink::new()),
            RuntimeSettings::default(),
        );
        let mut candidate = test_candidate();
        candidate.name = String::new();
        assert!(matches!(
            manager.create_session(candidate).await,
            Err(SessionError::InvalidCandidate(_))
        ));
        assert!(matches!(
            manager.submit("missing").await,
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manager_retires_finished_sessions() {
        let mocks = MockCollaborators::new();
        mocks.queue_questions_error(CollaboratorError::server_error("502"));
        let settings = RuntimeSettings {
            tick: Duration::from_secs(1),
            retain_finished: Duration::from_secs(60),
        };
        let manager = SessionManager::new(Arc::new(mocks), Arc::new(InMemorySink::new()), settings);

        let id = manager.create_session(test_candidate()).await.unwrap().id;

        tokio::time::sleep(Duration::from_secs(1)).await;
        let snapshot = manager.snapshot(&id).await.unwrap();
        assert!(snapshot.state.is_terminal());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(matches!(
            manager.snapshot(&id).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(manager.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manager_keeps_active_sessions() {
        let mocks = MockCollaborators::new();
        mocks.queue_questions(vec![Question::new("Explain Pin", Difficulty::Hard)]);
        let settings = RuntimeSettings {
            tick: Duration::from_secs(1),
            retain_finished: Duration::from_secs(1),
        };
        let manager = SessionManager::new(Arc::new(mocks), Arc::new(InMemorySink::new()), settings);

        let id = manager.create_session(test_candidate()).await.unwrap().id;
        tokio::time::sleep(Duration::from_secs(30)).await;

        let snapshot = manager.snapshot(&id).await.unwrap();
        assert_eq!(snapshot.state, SessionState::AwaitingAnswer { index: 0 });
    }
}
