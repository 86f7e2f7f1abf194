//! Execution modes: a single pass, a pass per timer tick, or a pass per
//! burst of changes in the source directory.

use std::sync::Arc;
use std::time::Duration;

use tidy_directory_watcher::{DirectoryWatcher, EventBatch, WatchConfig};
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{Config, ExecutionMode};
use crate::error::{ConfigError, OrganizeError, Result};
use crate::organizer::{Organizer, PassReport};

/// Options applied to every settings block.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Run every block as a single pass, whatever its mode.
    pub force_once: bool,
}

/// A settings block ready to run.
struct Job {
    organizer: Arc<Organizer>,
    mode: ExecutionMode,
    interval: Duration,
}

/// Run one pass off the async runtime.
async fn pass(organizer: &Arc<Organizer>) -> Result<PassReport> {
    let organizer = Arc::clone(organizer);
    tokio::task::spawn_blocking(move || organizer.run_pass()).await?
}

/// Run one pass, logging instead of returning a failure.
async fn logged_pass(organizer: &Arc<Organizer>) {
    if let Err(e) = pass(organizer).await {
        error!(
            "Organize pass failed for {}: {e}",
            organizer.source().display()
        );
    }
}

/// Run a single pass.
pub async fn run_once(organizer: Arc<Organizer>) -> Result<PassReport> {
    pass(&organizer).await
}

/// Run a pass every `period`, starting one full period from now, until
/// `shutdown` fires. Failed passes are logged and the loop continues.
pub async fn run_timer(
    organizer: Arc<Organizer>,
    period: Duration,
    shutdown: CancellationToken,
) -> Result<()> {
    if period.is_zero() {
        return Err(ConfigError::ZeroInterval.into());
    }
    let start = Instant::now()
        .checked_add(period)
        .ok_or(ConfigError::IntervalTooLarge(period.as_secs()))?;

    let mut ticker = tokio::time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Periodic execution started for {} every {period:?}",
        organizer.source().display()
    );

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => logged_pass(&organizer).await,
        }
    }

    info!(
        "Periodic execution stopped for {}",
        organizer.source().display()
    );
    Ok(())
}

/// Run a pass whenever the source directory changes, until `shutdown`
/// fires or the watcher goes away.
///
/// Events already queued when a pass starts are folded into it, so a burst
/// of changes (including the renames a pass itself causes) costs one extra
/// pass at most.
pub async fn run_monitor(organizer: Arc<Organizer>, shutdown: CancellationToken) -> Result<()> {
    let mut watcher = DirectoryWatcher::new(WatchConfig::new(organizer.source()))?;
    let mut events = watcher.start()?;

    info!("Monitoring started for {}", organizer.source().display());

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            received = events.recv() => {
                let Some(event) = received else {
                    warn!("Watch channel closed for {}", organizer.source().display());
                    break;
                };

                let mut batch = EventBatch::from_event(event);
                batch.drain_ready(&mut events);
                if !batch.has_changes() {
                    continue;
                }

                debug!(
                    "Handling {} file events, starting with {}",
                    batch.event_count(),
                    batch.first().path.display()
                );
                logged_pass(&organizer).await;
            }
        }
    }

    watcher.stop();
    info!("Monitoring stopped for {}", organizer.source().display());
    Ok(())
}

/// Resolve every settings block up front. A missing source or a bad timer
/// interval stops everything before any file moves; an unknown mode only
/// skips its own block.
fn plan(config: &Config, options: RunOptions) -> Result<Vec<Job>> {
    let mut jobs = Vec::with_capacity(config.settings.len());

    for (index, settings) in config.settings.iter().enumerate() {
        let organizer = Organizer::from_settings(settings)?;
        organizer.ensure_source()?;

        let mode = if options.force_once {
            ExecutionMode::Once
        } else {
            match settings.mode() {
                Ok(mode) => mode,
                Err(e) => {
                    warn!("Skipping settings block {index}: {e}");
                    continue;
                }
            }
        };

        if mode == ExecutionMode::Timer && settings.execution_interval == 0 {
            return Err(ConfigError::ZeroInterval.into());
        }

        jobs.push(Job {
            organizer: Arc::new(organizer),
            mode,
            interval: settings.interval(),
        });
    }

    Ok(jobs)
}

/// Run every settings block of `config`.
///
/// `once` blocks run in order on the calling task; `monitor` and `timer`
/// blocks each get their own task. Returns the reports of the `once` passes
/// after every long-running block has ended. If one of those fails, the
/// others are cancelled and the first error is returned.
pub async fn run_config(
    config: &Config,
    options: RunOptions,
    shutdown: CancellationToken,
) -> Result<Vec<PassReport>> {
    let jobs = plan(config, options)?;
    let stop = shutdown.child_token();

    let mut reports = Vec::new();
    let mut tasks = JoinSet::new();

    for job in jobs {
        match job.mode {
            ExecutionMode::Once => match run_once(Arc::clone(&job.organizer)).await {
                Ok(report) => reports.push(report),
                Err(e) => error!(
                    "Organize pass failed for {}: {e}",
                    job.organizer.source().display()
                ),
            },
            ExecutionMode::Monitor => {
                tasks.spawn(run_monitor(job.organizer, stop.child_token()));
            }
            ExecutionMode::Timer => {
                tasks.spawn(run_timer(job.organizer, job.interval, stop.child_token()));
            }
        }
    }

    let mut first_error: Option<OrganizeError> = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = outcome {
            error!("Execution task failed: {e}");
            stop.cancel();
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(reports),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn settings(source: &std::path::Path, mode: &str, interval: u64) -> Settings {
        Settings {
            source_path: source.to_path_buf(),
            days_ago: 0,
            execution_mode: mode.to_string(),
            execution_interval: interval,
            skip_hidden: false,
            skip_empty: false,
            target_folders: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_timer_rejects_zero_period() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = Arc::new(Organizer::new(temp_dir.path(), 0, Vec::new()));

        let result = run_timer(organizer, Duration::ZERO, CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(OrganizeError::Config(ConfigError::ZeroInterval))
        ));
    }

    #[tokio::test]
    async fn test_timer_stops_on_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = Arc::new(Organizer::new(temp_dir.path(), 0, Vec::new()));
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(run_timer(
            organizer,
            Duration::from_secs(3600),
            shutdown.clone(),
        ));
        shutdown.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_plan_skips_invalid_mode() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            settings: vec![
                settings(temp_dir.path(), "weekly", 60),
                settings(temp_dir.path(), "timer", 60),
            ],
        };

        let jobs = plan(&config, RunOptions::default()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].mode, ExecutionMode::Timer);
    }

    #[test]
    fn test_plan_force_once() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            settings: vec![
                settings(temp_dir.path(), "monitor", 60),
                settings(temp_dir.path(), "timer", 0),
            ],
        };

        let jobs = plan(&config, RunOptions { force_once: true }).unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|job| job.mode == ExecutionMode::Once));
    }

    #[test]
    fn test_plan_rejects_zero_timer_interval() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            settings: vec![settings(temp_dir.path(), "timer", 0)],
        };

        assert!(matches!(
            plan(&config, RunOptions::default()),
            Err(OrganizeError::Config(ConfigError::ZeroInterval))
        ));
    }

    #[test]
    fn test_plan_missing_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            settings: vec![
                settings(temp_dir.path(), "once", 60),
                settings(std::path::Path::new("/nonexistent/path/12345"), "weekly", 60),
            ],
        };

        assert!(matches!(
            plan(&config, RunOptions::default()),
            Err(OrganizeError::SourceNotFound(_))
        ));
    }
}
