//! Semantic match command.

use crate::{corpus, render};
use anyhow::Context;
use careline_core::{Config, Credentials, RetryPolicy};
use careline_memory::embeddings::validate_text;
use careline_memory::{HuggingFaceEmbeddings, MatchResult, MemoryError, SemanticMatcher};
use clap::builder::RangedU64ValueParser;
use clap::Args;
use std::sync::Arc;

/// Match command arguments.
#[derive(Args)]
pub struct MatchArgs {
    /// Query to match (repeatable). Defaults to the built-in questions.
    #[arg(short, long = "query")]
    pub queries: Vec<String>,

    /// Number of documents to show per query
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub top: usize,

    /// Print one JSON object per match instead of text
    #[arg(long)]
    pub json: bool,
}

impl MatchArgs {
    /// Queries to run, falling back to the built-in set.
    pub fn queries(&self) -> Vec<String> {
        if self.queries.is_empty() {
            corpus::QUERIES.iter().map(|q| q.to_string()).collect()
        } else {
            self.queries.clone()
        }
    }

    /// Queries to run, rejecting blank ones before any network call.
    pub fn validated_queries(&self) -> Result<Vec<String>, MemoryError> {
        let queries = self.queries();
        for query in &queries {
            validate_text(query)?;
        }
        Ok(queries)
    }
}

/// Run the match command.
pub async fn run(args: MatchArgs, config: &Config) -> anyhow::Result<()> {
    let token = Credentials::from_env().require_embedding()?;
    config.validate().context("Invalid configuration")?;
    let queries = args.validated_queries()?;

    let embeddings = HuggingFaceEmbeddings::new(token)?
        .with_base_url(config.embeddings.base_url.as_str())
        .with_model(config.embeddings.model.as_str())
        .with_dimension(config.embeddings.dimension)
        .with_timeout(config.embeddings.timeout_secs)?;

    let documents = corpus::DOCUMENTS.iter().map(|d| d.to_string()).collect();
    let matcher = SemanticMatcher::with_retry(
        Arc::new(embeddings),
        documents,
        RetryPolicy::from(&config.retry),
    )
    .await?;

    if args.top == 1 {
        for result in matcher.match_all(&queries).await? {
            print_results(&[result], args.json)?;
        }
    } else {
        for query in &queries {
            let ranked = matcher.rank(query, args.top).await?;
            print_results(&ranked, args.json)?;
        }
    }

    Ok(())
}

fn print_results(results: &[MatchResult], json: bool) -> anyhow::Result<()> {
    if json {
        for result in results {
            println!("{}", serde_json::to_string(result)?);
        }
        return Ok(());
    }

    if let Some(first) = results.first() {
        println!();
        println!("{}", render::format_query(&first.query));
    }
    for result in results {
        println!("{}", render::format_match(result));
    }
    Ok(())
}
