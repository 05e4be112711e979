//! Classifier service: session lifecycle and answer processing.

use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::catalog::{Catalog, Question};
use crate::domain::classification::{
    policy, ClassificationResult, Policy, PolicyInput, SessionState, StopReason,
};
use crate::domain::foundation::{Confidence, LikertResponse, SessionId, ValidationError};
use crate::ports::SessionStore;

/// Recoverable, caller-surfaced errors. None of these mutate the session.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Question '{0}' has already been answered in this session")]
    QuestionAlreadyAnswered(String),

    #[error("Session {0} is already complete")]
    SessionComplete(SessionId),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Point-in-time session status for callers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: SessionId,
    pub state: SessionState,
    pub questions_answered: usize,
    pub seed_questions_total: usize,
    pub current_leader: String,
    pub top_probability: f64,
    pub created_at: crate::domain::foundation::Timestamp,
    pub last_activity: crate::domain::foundation::Timestamp,
    pub completed_at: Option<crate::domain::foundation::Timestamp>,
}

/// The classification engine exposed to the transport layer.
///
/// Holds the immutable catalog, the pure policy inputs, and the keyed
/// session store. All decision logic is in-memory and bounded, so no
/// operation blocks indefinitely.
pub struct Classifier {
    catalog: Arc<Catalog>,
    policy: Policy,
    store: Arc<dyn SessionStore>,
}

impl Classifier {
    pub fn new(catalog: Arc<Catalog>, policy: Policy, store: Arc<dyn SessionStore>) -> Self {
        Self {
            catalog,
            policy,
            store,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Starts a new session and returns its id with the first seed question.
    ///
    /// The catalog guarantees at least one seed question at load time.
    pub async fn start_session(&self) -> (SessionId, Question) {
        let session = crate::domain::classification::ClassificationSession::new(&self.catalog);
        let session_id = session.id();
        self.store.insert(session).await;

        info!(%session_id, "session started");
        (session_id, self.catalog.first_seed().clone())
    }

    /// Processes one answer: updates traits, recomputes probabilities, and
    /// either returns the next question or a terminal result.
    ///
    /// # Errors
    ///
    /// Rejects, without touching the session: unknown session or question
    /// ids, responses outside 1..=5, confidence outside [0, 1], repeated
    /// answers, and answers to completed sessions.
    pub async fn process_response(
        &self,
        session_id: SessionId,
        question_id: &str,
        response: u8,
        confidence: f64,
    ) -> Result<(Option<Question>, ClassificationResult), ClassifierError> {
        let response = LikertResponse::try_from_u8(response)?;
        let confidence = Confidence::try_new(confidence)?;
        let question = self
            .catalog
            .question_by_id(question_id)
            .ok_or_else(|| ClassifierError::QuestionNotFound(question_id.to_string()))?;

        let handle = self
            .store
            .find(&session_id)
            .await
            .ok_or(ClassifierError::SessionNotFound(session_id))?;
        let mut session = handle.lock().await;

        if session.is_complete() {
            return Err(ClassifierError::SessionComplete(session_id));
        }
        if session.has_asked(question_id) {
            return Err(ClassifierError::QuestionAlreadyAnswered(
                question_id.to_string(),
            ));
        }

        session.absorb_response(
            &self.catalog,
            question,
            response,
            confidence,
            self.policy.learning_rate,
        );

        let decision = policy::next_step(
            PolicyInput {
                answered: session.answered(),
                trait_scores: session.trait_scores(),
                probabilities: session.probabilities(),
                questions_asked: session.questions_asked(),
            },
            &self.catalog,
            &self.policy,
        );

        match decision {
            policy::Decision::Ask(next) => {
                session.advance_phase(self.catalog.seed_len());
                let result =
                    ClassificationResult::build(&session, &self.catalog, &self.policy, true);
                Ok((Some(next.clone()), result))
            }
            policy::Decision::Stop(reason) => {
                session.complete();
                let result =
                    ClassificationResult::build(&session, &self.catalog, &self.policy, false);
                match reason {
                    StopReason::EarlyTermination => info!(
                        %session_id,
                        top_probability = result.top_probability,
                        "early termination after seed questions"
                    ),
                    _ => info!(
                        %session_id,
                        top_department = %result.top_department,
                        reason = ?reason,
                        questions = result.questions_asked,
                        "classification complete"
                    ),
                }
                Ok((None, result))
            }
        }
    }

    /// Returns a status snapshot, or `None` for an unknown session id.
    pub async fn session_status(&self, session_id: &SessionId) -> Option<SessionStatus> {
        let handle = self.store.find(session_id).await?;
        let session = handle.lock().await;
        let ((top_index, top_prob), _) = session.top_two();

        Some(SessionStatus {
            session_id: session.id(),
            state: session.state(),
            questions_answered: session.answered(),
            seed_questions_total: self.catalog.seed_len(),
            current_leader: self.catalog.department(top_index).id().to_string(),
            top_probability: top_prob,
            created_at: session.created_at(),
            last_activity: session.last_activity(),
            completed_at: session.completed_at(),
        })
    }

    /// Removes sessions inactive for longer than `max_age`; returns the
    /// number removed.
    pub async fn cleanup_expired_sessions(&self, max_age: Duration) -> usize {
        self.store.remove_inactive(max_age).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::catalog::{DepartmentRecord, QuestionRecord, QuestionStage, TraitCatalog};

    fn dept(id: &str, weights: &[(&str, f64)]) -> DepartmentRecord {
        DepartmentRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: None,
            trait_weights: weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn question(id: &str, stage: QuestionStage, primary: &str) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            text: format!("Question {}", id),
            category: None,
            stage,
            primary_trait: primary.to_string(),
            secondary_traits: vec![],
            information_value: 1.0,
        }
    }

    fn classifier(adaptive: Vec<QuestionRecord>, seeds: Vec<QuestionRecord>) -> Classifier {
        let catalog = Catalog::from_records(
            TraitCatalog::canonical(),
            vec![
                dept("technicals", &[("technical", 1.0), ("analytical", 0.8)]),
                dept("events", &[("organized", 1.0), ("leadership", 0.8)]),
            ],
            adaptive,
            seeds,
        )
        .unwrap();

        Classifier::new(
            Arc::new(catalog),
            Policy::default(),
            Arc::new(InMemorySessionStore::new()),
        )
    }

    fn one_seed_classifier() -> Classifier {
        classifier(
            vec![
                question("a1", QuestionStage::Adaptive, "creative"),
                question("a2", QuestionStage::Adaptive, "social"),
            ],
            vec![question("s1", QuestionStage::Seed, "technical")],
        )
    }

    #[tokio::test]
    async fn start_session_returns_first_seed_question() {
        let classifier = one_seed_classifier();
        let (_, first) = classifier.start_session().await;
        assert_eq!(first.id(), "s1");
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let classifier = one_seed_classifier();
        let result = classifier
            .process_response(SessionId::new(), "s1", 3, 1.0)
            .await;
        assert!(matches!(result, Err(ClassifierError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn unknown_question_is_rejected_without_mutation() {
        let classifier = one_seed_classifier();
        let (session_id, _) = classifier.start_session().await;

        let result = classifier
            .process_response(session_id, "nope", 3, 1.0)
            .await;
        assert!(matches!(result, Err(ClassifierError::QuestionNotFound(_))));

        let status = classifier.session_status(&session_id).await.unwrap();
        assert_eq!(status.questions_answered, 0);
    }

    #[tokio::test]
    async fn out_of_range_response_is_rejected() {
        let classifier = one_seed_classifier();
        let (session_id, _) = classifier.start_session().await;

        for bad in [0u8, 6, 200] {
            let result = classifier
                .process_response(session_id, "s1", bad, 1.0)
                .await;
            assert!(matches!(result, Err(ClassifierError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn out_of_range_confidence_is_rejected() {
        let classifier = one_seed_classifier();
        let (session_id, _) = classifier.start_session().await;

        for bad in [-0.1, 1.5, f64::NAN] {
            let result = classifier
                .process_response(session_id, "s1", 3, bad)
                .await;
            assert!(matches!(result, Err(ClassifierError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn repeated_answer_is_rejected() {
        let classifier = one_seed_classifier();
        let (session_id, _) = classifier.start_session().await;

        classifier
            .process_response(session_id, "s1", 5, 1.0)
            .await
            .unwrap();
        let result = classifier
            .process_response(session_id, "s1", 5, 1.0)
            .await;
        assert!(matches!(
            result,
            Err(ClassifierError::QuestionAlreadyAnswered(_))
        ));
    }

    #[tokio::test]
    async fn seed_answer_shifts_probabilities_toward_matching_department() {
        let classifier = one_seed_classifier();
        let (session_id, first) = classifier.start_session().await;

        let (_, result) = classifier
            .process_response(session_id, first.id(), 5, 1.0)
            .await
            .unwrap();

        assert_eq!(result.top_department, "technicals");
        assert!(result.top_probability > 0.5);
        assert!(result.top_probability > result.secondary_probability.unwrap());
    }

    #[tokio::test]
    async fn completed_session_rejects_further_answers() {
        // Single department: probability is 1.0 after the seed answer, so
        // the early-termination check completes the session at the boundary.
        let catalog = Catalog::from_records(
            TraitCatalog::canonical(),
            vec![dept("technicals", &[("technical", 1.0)])],
            vec![question("a1", QuestionStage::Adaptive, "creative")],
            vec![question("s1", QuestionStage::Seed, "technical")],
        )
        .unwrap();
        let classifier = Classifier::new(
            Arc::new(catalog),
            Policy::default(),
            Arc::new(InMemorySessionStore::new()),
        );

        let (session_id, _) = classifier.start_session().await;
        let (next, result) = classifier
            .process_response(session_id, "s1", 5, 1.0)
            .await
            .unwrap();
        assert!(next.is_none());
        assert!(result.is_complete);

        let after = classifier
            .process_response(session_id, "a1", 3, 1.0)
            .await;
        assert!(matches!(after, Err(ClassifierError::SessionComplete(_))));
    }

    #[tokio::test]
    async fn status_reports_progress_and_leader() {
        let classifier = one_seed_classifier();
        let (session_id, _) = classifier.start_session().await;

        let status = classifier.session_status(&session_id).await.unwrap();
        assert_eq!(status.state, SessionState::SeedQuestions);
        assert_eq!(status.questions_answered, 0);
        assert_eq!(status.seed_questions_total, 1);

        classifier
            .process_response(session_id, "s1", 5, 1.0)
            .await
            .unwrap();

        let status = classifier.session_status(&session_id).await.unwrap();
        assert_eq!(status.questions_answered, 1);
        assert_eq!(status.current_leader, "technicals");
    }

    #[tokio::test]
    async fn status_of_unknown_session_is_none() {
        let classifier = one_seed_classifier();
        assert!(classifier.session_status(&SessionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn cleanup_with_zero_age_removes_all_sessions() {
        let classifier = one_seed_classifier();
        classifier.start_session().await;
        classifier.start_session().await;

        let removed = classifier.cleanup_expired_sessions(Duration::zero()).await;
        assert_eq!(removed, 2);
    }
}
