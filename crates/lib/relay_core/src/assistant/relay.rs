//! The relay sequence: thread → message → run → poll → reply.
//!
//! Every call creates a fresh thread and run. Nothing is reused or cleaned up.

use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use super::config::PollSettings;
use super::models::{Run, RunStatus};
use super::{AssistantApi, AssistantError};

/// Send `text` to `assistant_id` and return the first text block of its reply.
pub async fn relay_message(
    api: &dyn AssistantApi,
    assistant_id: &str,
    text: &str,
    poll: PollSettings,
) -> Result<String, AssistantError> {
    let thread = api.create_thread().await?;
    api.add_message(&thread.id, text).await?;

    let run = api.create_run(&thread.id, assistant_id).await?;
    info!(thread_id = %thread.id, run_id = %run.id, "assistant run started");

    let run = wait_for_run(api, &thread.id, &run.id, poll).await?;
    if run.status != RunStatus::Completed {
        let reason = run.last_error.map(|e| e.message);
        warn!(
            thread_id = %thread.id,
            run_id = %run.id,
            status = %run.status,
            reason = reason.as_deref().unwrap_or(""),
            "assistant run did not complete"
        );
        return Err(AssistantError::RunFailed {
            status: run.status,
            reason,
        });
    }

    let messages = api.latest_messages(&thread.id).await?;
    let reply = messages
        .first()
        .and_then(|m| m.first_text())
        .ok_or(AssistantError::EmptyReply)?;

    debug!(thread_id = %thread.id, reply_len = reply.len(), "assistant reply received");
    Ok(reply.to_string())
}

/// Poll a run until it leaves the pending states.
///
/// The first check happens immediately; later checks are `poll.interval`
/// apart. Gives up with [`AssistantError::TimedOut`] once `poll.max_wait`
/// has elapsed.
pub async fn wait_for_run(
    api: &dyn AssistantApi,
    thread_id: &str,
    run_id: &str,
    poll: PollSettings,
) -> Result<Run, AssistantError> {
    let started = Instant::now();
    let polling = async {
        let mut checks: u32 = 0;
        loop {
            let run = api.retrieve_run(thread_id, run_id).await?;
            checks += 1;
            if !run.status.is_pending() {
                debug!(
                    run_id,
                    status = %run.status,
                    checks,
                    elapsed_ms = millis(started.elapsed()),
                    "run settled"
                );
                return Ok::<_, AssistantError>(run);
            }
            sleep(poll.interval).await;
        }
    };

    match timeout(poll.max_wait, polling).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                thread_id,
                run_id,
                max_wait_ms = millis(poll.max_wait),
                "gave up waiting for run"
            );
            Err(AssistantError::TimedOut(poll.max_wait))
        }
    }
}

/// Milliseconds as a log field, saturating instead of wrapping.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
