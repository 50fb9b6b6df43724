//! Sync orchestration.
//!
//! Runs one full cycle: for each configured issue thread, fetch the latest
//! comment window, render it, and write the document; then persist the sync
//! state, rebuild the retrieval index if anything changed, and print a run
//! summary. Threads are processed strictly sequentially and in isolation —
//! one thread's failure never blocks the rest.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fetch::CommentSource;
use crate::indexer;
use crate::models::{IndexerOutcome, RunSummary, SyncState, ThreadOutcome};
use crate::render;
use crate::state;

/// Execute one full sync cycle.
///
/// Returns an error only for startup-class failures (the documents
/// directory cannot be created); everything downstream is folded into the
/// returned [`RunSummary`].
pub async fn run_sync(config: &Config, source: &dyn CommentSource) -> Result<RunSummary> {
    let started_at = Utc::now();

    std::fs::create_dir_all(&config.documents.dir).with_context(|| {
        format!(
            "Failed to create documents directory: {}",
            config.documents.dir.display()
        )
    })?;

    let previous = state::load_state(&config.state.path);
    for (issue, last_sync) in &previous {
        debug!(issue = *issue, last_sync = %last_sync, "previous sync record");
    }

    let mut threads = Vec::with_capacity(config.github.issues.len());
    let mut next_state = SyncState::new();

    for &issue in &config.github.issues {
        let outcome = sync_thread(config, source, issue).await;
        if matches!(outcome, ThreadOutcome::Written { .. }) {
            // Wholesale-replace policy: the persisted state holds exactly
            // this run's successes, stamped with the orchestration time.
            next_state.insert(issue, started_at);
        }
        threads.push((issue, outcome));
    }

    if let Err(e) = state::save_state(&config.state.path, &next_state) {
        warn!("failed to persist sync state: {:#}", e);
    }

    let written = threads
        .iter()
        .filter(|(_, o)| matches!(o, ThreadOutcome::Written { .. }))
        .count();

    let indexer = if written == 0 {
        info!("no documents written, skipping indexer");
        IndexerOutcome::Skipped {
            reason: "no documents written".to_string(),
        }
    } else if !config.indexer.enabled {
        IndexerOutcome::Skipped {
            reason: format!(
                "disabled by config; run `{} {}` manually",
                config.indexer.executable.display(),
                config.indexer.argument
            ),
        }
    } else {
        indexer::run_indexer(&config.indexer, &config.documents.dir).await
    };

    let summary = RunSummary {
        started_at,
        threads,
        indexer,
    };
    print_summary(config, &summary);
    Ok(summary)
}

/// Fetch, render, and write one issue thread, resolving to a single outcome.
async fn sync_thread(config: &Config, source: &dyn CommentSource, issue: u64) -> ThreadOutcome {
    info!(issue, "syncing thread");

    let comments = source.latest_comments(issue).await;

    let Some(doc) = render::render_document(issue, &config.github.repo, &comments, Utc::now())
    else {
        // Empty window: failed fetch and legitimately comment-free threads
        // both land here, and the existing document (if any) is left alone.
        info!(issue, "no comments, skipping write");
        return ThreadOutcome::Skipped;
    };

    let path = config.documents.dir.join(render::document_filename(issue));
    match std::fs::write(&path, &doc) {
        Ok(()) => {
            info!(issue, path = %path.display(), comments = comments.len(), "document written");
            ThreadOutcome::Written {
                comments: comments.len(),
            }
        }
        Err(e) => {
            warn!(issue, path = %path.display(), "document write failed: {}", e);
            ThreadOutcome::Failed(format!("write {}: {}", path.display(), e))
        }
    }
}

fn print_summary(config: &Config, summary: &RunSummary) {
    println!("sync github-issues");
    println!("  repository: {}", config.github.repo);
    println!(
        "  started: {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S")
    );

    for (issue, outcome) in &summary.threads {
        match outcome {
            ThreadOutcome::Written { comments } => {
                println!("  issue #{}: written ({} comments)", issue, comments);
            }
            ThreadOutcome::Skipped => {
                println!("  issue #{}: skipped (no comments)", issue);
            }
            ThreadOutcome::Failed(reason) => {
                println!("  issue #{}: failed ({})", issue, reason);
            }
        }
    }

    println!(
        "  documents written: {}/{}",
        summary.written(),
        summary.threads.len()
    );
    if summary.failed() > 0 {
        println!("  failed threads: {}", summary.failed());
    }
    println!("  documents dir: {}", config.documents.dir.display());
    println!("  state file: {}", config.state.path.display());

    match &summary.indexer {
        IndexerOutcome::Succeeded { stdout, stderr } => {
            println!("  indexer: succeeded");
            print_captured(stdout, stderr);
        }
        IndexerOutcome::Failed {
            code,
            stdout,
            stderr,
        } => {
            match code {
                Some(code) => println!("  indexer: failed (exit code {})", code),
                None => println!("  indexer: failed"),
            }
            print_captured(stdout, stderr);
        }
        IndexerOutcome::TimedOut => {
            println!(
                "  indexer: timed out after {}s (killed)",
                config.indexer.timeout_secs
            );
        }
        IndexerOutcome::Skipped { reason } => {
            println!("  indexer: skipped ({})", reason);
        }
    }

    println!("ok");
}

fn print_captured(stdout: &str, stderr: &str) {
    if !stdout.trim().is_empty() {
        println!("{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        eprintln!("{}", stderr.trim_end());
    }
}
