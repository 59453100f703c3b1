// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod notify;
pub mod types;

use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::client::HttpStatusClient;
use crate::config::{ConfigFile, load_for_cli};
use crate::engine::{FailureKind, PollOptions, WatchRequest, Watcher};
use crate::errors::HarnessWatchError;
use crate::notify::StdoutNotifier;
use crate::types::AuthScheme;

/// Per-request timeout used by [`watch_deployment`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why the CLI shell cancelled a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CancelReason {
    Interrupted,
    DeadlineElapsed(Duration),
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overlay)
/// - the HTTP status client and stdout notifier
/// - Ctrl-C and `--timeout` cancellation
/// - the watcher itself
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_for_cli(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let client = HttpStatusClient::new(cfg.request_timeout, cfg.auth_scheme)?;
    let watcher = Watcher::new(client, StdoutNotifier);
    let request = cfg.watch_request(args.api_key.as_str());

    let cancel = CancellationToken::new();
    let trigger = tokio::spawn(cancel_on_signal_or_deadline(cancel.clone(), cfg.timeout));

    let result = watcher.watch_until(&request, &cancel).await;

    // Release the signal/deadline task if the watch ended on its own.
    cancel.cancel();
    let reason = trigger.await.ok().flatten();

    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(failure) => {
            let context = match (reason, &failure.kind) {
                (Some(CancelReason::DeadlineElapsed(limit)), FailureKind::Cancelled) => {
                    Some(format!("no terminal status from Harness within {limit:?}"))
                }
                (Some(CancelReason::Interrupted), FailureKind::Cancelled) => {
                    Some("interrupted".to_string())
                }
                _ => None,
            };
            let err = anyhow::Error::from(HarnessWatchError::Watch(failure));
            Err(match context {
                Some(context) => err.context(context),
                None => err,
            })
        }
    }
}

/// Watch one deployment with the production HTTP client and stdout notifier.
///
/// Resolves with the success message; any other outcome is returned as
/// [`HarnessWatchError::Watch`].
pub async fn watch_deployment(
    status_url: &str,
    dashboard_url: &str,
    auth_token: &str,
    options: PollOptions,
) -> errors::Result<String> {
    let client = HttpStatusClient::new(DEFAULT_REQUEST_TIMEOUT, AuthScheme::default())?;
    let watcher = Watcher::new(client, StdoutNotifier);
    let request = WatchRequest {
        status_url: status_url.to_string(),
        dashboard_url: dashboard_url.to_string(),
        auth_token: auth_token.to_string(),
        options,
    };

    Ok(watcher.watch(&request).await?)
}

/// Cancel `cancel` on Ctrl-C or once `deadline` elapses.
///
/// Returns `None` when `cancel` was fired by someone else first.
async fn cancel_on_signal_or_deadline(
    cancel: CancellationToken,
    deadline: Option<Duration>,
) -> Option<CancelReason> {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    let deadline_elapsed = async {
        match deadline {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    let reason = tokio::select! {
        _ = cancel.cancelled() => return None,
        _ = ctrl_c => CancelReason::Interrupted,
        _ = deadline_elapsed => CancelReason::DeadlineElapsed(deadline.unwrap_or_default()),
    };

    info!(?reason, "cancelling deployment watch");
    cancel.cancel();
    Some(reason)
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(cfg: &ConfigFile) {
    println!("harness-watch dry-run");
    println!("  status_url = {}", cfg.status_url);
    println!("  dashboard_url = {}", cfg.dashboard_url);
    println!("  auth_scheme = {:?}", cfg.auth_scheme);
    println!();

    println!("poll:");
    println!("  wait_between = {:?}", cfg.options.wait_between);
    println!("  request_timeout = {:?}", cfg.request_timeout);
    match cfg.timeout {
        Some(limit) => println!("  timeout = {limit:?}"),
        None => println!("  timeout = none"),
    }
    println!("  retry_on_status = {:?}", cfg.options.retryable_statuses);
    if !cfg.options.pending_statuses.is_empty() {
        println!("  pending_statuses = {:?}", cfg.options.pending_statuses);
    }

    debug!("dry-run complete (no requests sent)");
}
