//! External indexer invocation.
//!
//! The retrieval index is owned by a separate executable (e.g. `devrag`);
//! this module runs it with its fixed "rebuild" subcommand after documents
//! change. The invocation is a scoped operation: by the time it returns the
//! child has either exited or been killed and reaped, and all three results
//! (success, failure, timeout) come back as [`IndexerOutcome`] variants
//! rather than errors.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::IndexerConfig;
use crate::models::IndexerOutcome;

/// Run the configured indexer once, with `workdir` (the directory holding
/// the just-written documents) as its working directory.
pub async fn run_indexer(config: &IndexerConfig, workdir: &Path) -> IndexerOutcome {
    info!(
        executable = %config.executable.display(),
        argument = %config.argument,
        timeout_secs = config.timeout_secs,
        "invoking indexer"
    );

    let child = Command::new(&config.executable)
        .arg(&config.argument)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            warn!(executable = %config.executable.display(), "indexer failed to start: {}", e);
            return IndexerOutcome::Failed {
                code: None,
                stdout: String::new(),
                stderr: format!("failed to start {}: {}", config.executable.display(), e),
            };
        }
    };

    // Drain both pipes concurrently so a chatty child cannot block on a full
    // pipe buffer and outlive its own work.
    let stdout_task = drain(child.stdout.take());
    let stderr_task = drain(child.stderr.take());

    let timeout = Duration::from_secs(config.timeout_secs);
    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = stdout_task.await.unwrap_or_default();
            let stderr = stderr_task.await.unwrap_or_default();
            if status.success() {
                IndexerOutcome::Succeeded { stdout, stderr }
            } else {
                warn!(code = ?status.code(), "indexer exited nonzero");
                IndexerOutcome::Failed {
                    code: status.code(),
                    stdout,
                    stderr,
                }
            }
        }
        Ok(Err(e)) => {
            warn!("indexer wait failed: {}", e);
            let _ = child.start_kill();
            let _ = child.wait().await;
            IndexerOutcome::Failed {
                code: None,
                stdout: String::new(),
                stderr: e.to_string(),
            }
        }
        Err(_) => {
            warn!(
                timeout_secs = config.timeout_secs,
                "indexer timed out, killing"
            );
            // Kill and reap before returning; a timed-out indexer must never
            // be left running behind the batch job.
            let _ = child.start_kill();
            let _ = child.wait().await;
            stdout_task.abort();
            stderr_task.abort();
            IndexerOutcome::TimedOut
        }
    }
}

fn drain(
    pipe: Option<impl AsyncRead + Unpin + Send + 'static>,
) -> tokio::task::JoinHandle<String> {
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}
