//! Interactive quiz runner for the classification engine.
//!
//! Loads the catalog, starts a session, and drives it from stdin until the
//! engine reports a final department. The HTTP transport of the deployed
//! system lives outside this crate; this binary is its stand-in caller.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;
use tracing_subscriber::EnvFilter;

use dept_compass::adapters::InMemorySessionStore;
use dept_compass::application::{Classifier, ClassifierError};
use dept_compass::config::AppConfig;
use dept_compass::domain::catalog::Catalog;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("fatal: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let catalog = Arc::new(Catalog::load(
        &config.catalog.departments_file,
        &config.catalog.questions_file,
    )?);
    let classifier = Arc::new(Classifier::new(
        catalog,
        config.policy.to_policy(),
        Arc::new(InMemorySessionStore::new()),
    ));

    // Hourly GC sweep for abandoned sessions.
    let sweeper = classifier.clone();
    let max_age = chrono::Duration::hours(config.session.max_age_hours);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(3600));
        tick.tick().await;
        loop {
            tick.tick().await;
            sweeper.cleanup_expired_sessions(max_age).await;
        }
    });

    run_quiz(&classifier).await
}

async fn run_quiz(classifier: &Classifier) -> Result<(), Box<dyn std::error::Error>> {
    let (session_id, mut question) = classifier.start_session().await;
    println!("Answer each statement from 1 (strongly disagree) to 5 (strongly agree).\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("{}", question.text());

        let Some(line) = lines.next_line().await? else {
            println!("\nNo more input; leaving the session unfinished.");
            return Ok(());
        };
        let response: u8 = match line.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                println!("Please enter a number from 1 to 5.\n");
                continue;
            }
        };

        match classifier
            .process_response(session_id, question.id(), response, 1.0)
            .await
        {
            Ok((Some(next), result)) => {
                println!("{}\n", result.reasoning);
                question = next;
            }
            Ok((None, result)) => {
                let name = classifier
                    .catalog()
                    .department_by_id(&result.top_department)
                    .map(|d| d.name().to_string())
                    .unwrap_or_else(|| result.top_department.clone());

                println!("\nYour department: {}", name);
                println!("{}", result.reasoning);
                println!("\nFinal probabilities:");
                let mut ranked: Vec<_> = result.all_probabilities.iter().collect();
                ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
                for (dept, prob) in ranked {
                    println!("  {:<20} {:>5.1}%", dept, prob * 100.0);
                }
                return Ok(());
            }
            Err(err @ ClassifierError::Validation(_)) => {
                println!("{}\n", err);
            }
            Err(err) => return Err(err.into()),
        }
    }
}
