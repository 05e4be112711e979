//! End-to-end classification flow tests.
//!
//! These tests drive the classifier service through whole sessions:
//! 1. Seed questions go out in fixed order
//! 2. Adaptive questions follow, chosen by information gain
//! 3. A stopping rule fires and the session reports a final department
//!
//! The shipped catalog files under data/ are exercised directly; scenario
//! tests build small inline catalogs where exact numbers matter.

use std::sync::Arc;

use dept_compass::adapters::InMemorySessionStore;
use dept_compass::application::Classifier;
use dept_compass::domain::catalog::{
    Catalog, DepartmentRecord, QuestionRecord, QuestionStage, TraitCatalog,
};
use dept_compass::domain::classification::{ClassificationResult, Policy};

// =============================================================================
// Test Infrastructure
// =============================================================================

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

fn service(catalog: Catalog, policy: Policy) -> Classifier {
    Classifier::new(
        Arc::new(catalog),
        policy,
        Arc::new(InMemorySessionStore::new()),
    )
}

fn shipped_catalog() -> Catalog {
    Catalog::load(
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/departments.json"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/question_bank.json"),
    )
    .unwrap()
}

/// Answers every question with the same response until the engine stops.
/// Returns the asked question ids in order and the terminal result.
async fn run_to_completion(
    classifier: &Classifier,
    answer: u8,
    confidence: f64,
) -> (Vec<String>, ClassificationResult) {
    let (session_id, mut current) = classifier.start_session().await;
    let mut asked = Vec::new();

    loop {
        asked.push(current.id().to_string());
        let (next, result) = classifier
            .process_response(session_id, current.id(), answer, confidence)
            .await
            .unwrap();
        match next {
            Some(q) => current = q,
            None => return (asked, result),
        }
    }
}

// =============================================================================
// Shipped catalog
// =============================================================================

#[test]
fn shipped_catalog_loads_and_validates() {
    let catalog = shipped_catalog();
    assert_eq!(catalog.department_count(), 8);
    assert_eq!(catalog.seed_len(), 4);
    assert_eq!(catalog.questions().len(), 14);
    assert!(catalog.department_by_id("technicals").is_some());
    assert!(catalog.department_by_id("hospitality").is_some());
}

#[tokio::test]
async fn seed_questions_are_served_first_in_fixed_order() {
    let classifier = service(shipped_catalog(), Policy::default());
    let (asked, _) = run_to_completion(&classifier, 3, 1.0).await;

    let catalog = classifier.catalog();
    for i in 0..catalog.seed_len() {
        assert_eq!(asked[i], catalog.seed_question(i).id());
    }
}

#[tokio::test]
async fn no_question_is_asked_twice() {
    let classifier = service(shipped_catalog(), Policy::default());
    let (asked, _) = run_to_completion(&classifier, 5, 1.0).await;

    let mut unique = asked.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), asked.len());
}

#[tokio::test]
async fn neutral_answers_run_to_the_question_cap() {
    // All-neutral answers keep traits at the midpoint and probabilities
    // uniform, so no threshold or gap stop ever fires.
    let classifier = service(shipped_catalog(), Policy::default());
    let (asked, result) = run_to_completion(&classifier, 3, 1.0).await;

    assert_eq!(asked.len(), 12);
    assert_eq!(result.questions_asked, 12);
    assert!(result.is_complete);
    assert!(!result.should_continue);
    assert!(result.reasoning.starts_with("Maximum questions"));
}

#[tokio::test]
async fn result_payload_covers_every_department() {
    let classifier = service(shipped_catalog(), Policy::default());
    let (_, result) = run_to_completion(&classifier, 4, 0.8).await;

    assert_eq!(result.all_probabilities.len(), 8);
    let sum: f64 = result.all_probabilities.values().sum();
    assert!((sum - 1.0).abs() < 0.01, "rounded probabilities sum to ~1");
    assert_eq!(result.top_traits.len(), 5);
    assert!(result.secondary_department.is_some());
}

// =============================================================================
// Scenario catalogs
// =============================================================================

#[tokio::test]
async fn agreeing_with_a_matching_seed_raises_that_department() {
    let catalog = Catalog::from_records(
        TraitCatalog::canonical(),
        vec![
            dept("technicals", &[("technical", 1.0)]),
            dept("blank", &[]),
        ],
        vec![question("a1", QuestionStage::Adaptive, "creative")],
        vec![question("s1", QuestionStage::Seed, "technical")],
    )
    .unwrap();
    let classifier = service(catalog, Policy::default());

    let (session_id, first) = classifier.start_session().await;
    let (_, result) = classifier
        .process_response(session_id, first.id(), 5, 1.0)
        .await
        .unwrap();

    assert_eq!(result.top_department, "technicals");
    assert!(result.top_probability > 0.5);
}

#[tokio::test]
async fn lower_confidence_shifts_probabilities_less() {
    let catalog = Catalog::from_records(
        TraitCatalog::canonical(),
        vec![
            dept("technicals", &[("technical", 1.0)]),
            dept("blank", &[]),
        ],
        vec![question("a1", QuestionStage::Adaptive, "creative")],
        vec![question("s1", QuestionStage::Seed, "technical")],
    )
    .unwrap();
    let classifier = service(catalog, Policy::default());

    let (certain_id, q) = classifier.start_session().await;
    let (_, certain) = classifier
        .process_response(certain_id, q.id(), 5, 1.0)
        .await
        .unwrap();

    let (hesitant_id, q) = classifier.start_session().await;
    let (_, hesitant) = classifier
        .process_response(hesitant_id, q.id(), 5, 0.2)
        .await
        .unwrap();

    assert!(certain.top_probability > hesitant.top_probability);
}

#[tokio::test]
async fn aligned_seed_answers_terminate_at_the_seed_boundary() {
    // Two orthogonal trait axes; agreeing with one side and rejecting the
    // other drives the leader's probability past a lowered threshold on
    // the exact round the seed phase ends.
    let traits = TraitCatalog::new(vec!["hands_on".into(), "planning".into()]).unwrap();
    let catalog = Catalog::from_records(
        traits,
        vec![
            dept("crew", &[("hands_on", 1.0)]),
            dept("office", &[("planning", 1.0)]),
        ],
        vec![
            question("a1", QuestionStage::Adaptive, "hands_on"),
            question("a2", QuestionStage::Adaptive, "planning"),
        ],
        vec![
            question("s1", QuestionStage::Seed, "hands_on"),
            question("s2", QuestionStage::Seed, "hands_on"),
            question("s3", QuestionStage::Seed, "planning"),
            question("s4", QuestionStage::Seed, "planning"),
        ],
    )
    .unwrap();
    let policy = Policy {
        early_termination_threshold: 0.55,
        ..Policy::default()
    };
    let classifier = service(catalog, policy);

    let (session_id, mut current) = classifier.start_session().await;
    let answers = [5u8, 5, 1, 1];

    for (i, &answer) in answers.iter().enumerate() {
        let (next, result) = classifier
            .process_response(session_id, current.id(), answer, 1.0)
            .await
            .unwrap();

        if i < answers.len() - 1 {
            assert!(result.should_continue, "round {} must continue", i);
            current = next.unwrap();
        } else {
            assert!(next.is_none());
            assert!(result.is_complete);
            assert_eq!(result.questions_asked, 4);
            assert_eq!(result.top_department, "crew");
        }
    }
}

#[tokio::test]
async fn exhausted_question_pool_completes_the_session() {
    // Two seeds plus a single adaptive question; indistinguishable
    // departments keep every other stop out of reach.
    let catalog = Catalog::from_records(
        TraitCatalog::canonical(),
        vec![
            dept("events", &[("organized", 1.0)]),
            dept("logistics", &[("organized", 1.0)]),
        ],
        vec![question("a1", QuestionStage::Adaptive, "creative")],
        vec![
            question("s1", QuestionStage::Seed, "organized"),
            question("s2", QuestionStage::Seed, "social"),
        ],
    )
    .unwrap();
    let classifier = service(catalog, Policy::default());
    let (asked, result) = run_to_completion(&classifier, 3, 1.0).await;

    assert_eq!(asked, vec!["s1", "s2", "a1"]);
    assert!(result.is_complete);
    assert_eq!(result.questions_asked, 3);
}

// =============================================================================
// Housekeeping
// =============================================================================

#[tokio::test]
async fn cleanup_forgets_removed_sessions() {
    let classifier = service(shipped_catalog(), Policy::default());
    let (first, _) = classifier.start_session().await;
    let (second, _) = classifier.start_session().await;

    let removed = classifier
        .cleanup_expired_sessions(chrono::Duration::zero())
        .await;
    assert_eq!(removed, 2);

    assert!(classifier.session_status(&first).await.is_none());
    assert!(classifier.session_status(&second).await.is_none());
}
