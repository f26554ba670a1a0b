//! Isolated render executor.
//!
//! The encode runs in its own spawned task and reports back over a
//! oneshot channel: exactly one terminal message per invocation, success
//! with the output path or failure with the reason. A dropped channel
//! (task panic or runtime shutdown) surfaces as a failure rather than a
//! hang, so the caller never waits indefinitely.

use std::path::PathBuf;

use tokio::sync::{oneshot, watch};
use tracing::{error, info};

use newsreel_models::RenderPlan;

use crate::command::FfmpegRunner;
use crate::compose::build_render_command;
use crate::error::{MediaError, MediaResult};

/// Spawns encodes into isolated tasks. Safe to share across concurrent
/// article runs; each spawn gets its own channel and cancel signal.
#[derive(Debug, Clone)]
pub struct RenderExecutor {
    /// Encode timeout in seconds
    timeout_secs: u64,
}

impl RenderExecutor {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Start an encode. Returns immediately; the terminal outcome is
    /// delivered through the returned handle.
    pub fn spawn(&self, plan: RenderPlan, output: PathBuf) -> RenderHandle {
        let (tx, rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let timeout_secs = self.timeout_secs;

        tokio::spawn(async move {
            let result = encode(plan, output, timeout_secs, cancel_rx).await;
            if let Err(e) = &result {
                error!("Encode failed: {}", e);
            }
            // Receiver may have given up; nothing left to report to
            let _ = tx.send(result);
        });

        RenderHandle {
            rx,
            cancel: cancel_tx,
        }
    }
}

async fn encode(
    plan: RenderPlan,
    output: PathBuf,
    timeout_secs: u64,
    cancel_rx: watch::Receiver<bool>,
) -> MediaResult<PathBuf> {
    info!(
        "Encoding {} segments ({:.1}s) to {}",
        plan.len(),
        plan.total_duration(),
        output.display()
    );

    let cmd = build_render_command(&plan, &output)?;
    FfmpegRunner::new()
        .with_timeout(timeout_secs)
        .with_cancel(cancel_rx)
        .run(&cmd)
        .await?;

    info!("Encode complete: {}", output.display());
    Ok(output)
}

/// Caller's side of one encode invocation.
pub struct RenderHandle {
    rx: oneshot::Receiver<MediaResult<PathBuf>>,
    cancel: watch::Sender<bool>,
}

impl RenderHandle {
    /// Wait for the terminal message.
    pub async fn wait(self) -> MediaResult<PathBuf> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(MediaError::ExecutorGone(
                "render task dropped its channel before reporting".to_string(),
            )),
        }
    }

    /// Request cancellation (best effort); the encode still delivers its
    /// terminal message.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}
