//! Subcommand runners.
//!
//! `attend` and `enroll` drive the session loops on the main task; the
//! camera handle is not `Send`, so only signal handling and HTTP
//! submissions run as spawned tasks.

use anyhow::{Context, Result};
use rollcall_core::config::AppConfig;
use rollcall_core::models::attendance::{AttendanceRecord, ModelStats};
use rollcall_core::models::event::SessionEvent;
use rollcall_core::ports::api_client::RecognitionApi;
use rollcall_core::ports::display::StatusDisplay;
use rollcall_core::ports::notifier::Announcer;
use rollcall_session::announcer::CommandAnnouncer;
use rollcall_session::attendance::AttendancePoller;
use rollcall_session::enrollment::{EnrollmentOutcome, EnrollmentSequencer};
use rollcall_session::event_bus::SessionEventBus;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::camera::build_capture_source;
use crate::display::ConsoleDisplay;
use crate::lifecycle::LifecycleManager;

/// Counts of what happened during an attendance run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub recognized: usize,
    pub no_match: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl AttendanceSummary {
    fn record(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Recognized { .. } => self.recognized += 1,
            SessionEvent::NoMatch { .. } => self.no_match += 1,
            SessionEvent::TickSkipped => self.skipped += 1,
            SessionEvent::SubmissionFailed { .. } => self.failed += 1,
            _ => {}
        }
    }
}

/// Tally events until the bus closes
fn spawn_summary(mut rx: broadcast::Receiver<SessionEvent>) -> JoinHandle<AttendanceSummary> {
    tokio::spawn(async move {
        let mut summary = AttendanceSummary::default();
        loop {
            match rx.recv().await {
                Ok(event) => summary.record(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("summary lagged, {n} events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        summary
    })
}

fn spawn_signal_handler(lifecycle: &Arc<LifecycleManager>) {
    let lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        if let Err(e) = lifecycle.wait_for_signal().await {
            warn!("signal handler unavailable: {e}");
        }
    });
}

pub async fn attend(config: &AppConfig, api: Arc<dyn RecognitionApi>) -> Result<()> {
    let display: Arc<dyn StatusDisplay> = Arc::new(ConsoleDisplay::new());
    let capture = build_capture_source(&config.camera)?;
    let events = SessionEventBus::default();
    let summary = spawn_summary(events.subscribe());

    let mut poller = AttendancePoller::new(capture, api, display)
        .with_interval(config.poll_interval())
        .with_event_bus(events);

    if config.notification.announce_matches {
        match CommandAnnouncer::from_config(&config.notification) {
            Some(announcer) => {
                let announcer: Arc<dyn Announcer> = Arc::new(announcer);
                poller = poller.with_announcer(announcer);
            }
            None => warn!("announcements enabled but announce_command is empty"),
        }
    }

    let lifecycle = Arc::new(LifecycleManager::new());
    spawn_signal_handler(&lifecycle);

    println!("Press Ctrl+C to stop.");
    poller
        .run(lifecycle.subscribe())
        .await
        .context("attendance polling failed")?;

    // Closing the bus ends the summary task
    drop(poller);
    let summary = summary.await.context("summary task failed")?;
    info!("attendance summary: {summary:?}");
    println!(
        "Recognized {} time(s), {} without a match, {} failed, {} skipped.",
        summary.recognized, summary.no_match, summary.failed, summary.skipped
    );
    Ok(())
}

pub async fn enroll(config: &AppConfig, api: Arc<dyn RecognitionApi>, name: &str) -> Result<()> {
    let display: Arc<dyn StatusDisplay> = Arc::new(ConsoleDisplay::new());
    let capture = build_capture_source(&config.camera)?;
    let lifecycle = Arc::new(LifecycleManager::new());

    let mut sequencer = EnrollmentSequencer::new(capture, api, display)
        .with_total_images(config.enrollment.total_images)
        .with_capture_delay(config.capture_delay())
        .with_shutdown(lifecycle.subscribe());

    sequencer
        .start_camera()
        .context("could not start the camera")?;
    spawn_signal_handler(&lifecycle);

    match sequencer.begin(name).await? {
        EnrollmentOutcome::Completed { name, total } => {
            info!("enrolled {name} with {total} samples");
            println!("Run `rollcall train` to include {name} in the model.");
        }
        EnrollmentOutcome::Cancelled { name, captured } => {
            println!("Enrollment for {name} cancelled after {captured} accepted samples.");
        }
    }
    Ok(())
}

pub async fn train(api: &dyn RecognitionApi) -> Result<()> {
    println!("Training model...");
    let summary = api.train().await.context("training failed")?;
    println!("{}", summary.message);
    Ok(())
}

pub async fn logs(api: &dyn RecognitionApi, date: Option<&str>) -> Result<()> {
    let records = api
        .attendance_logs(date)
        .await
        .context("failed to fetch attendance logs")?;
    print!("{}", format_logs(&records));
    Ok(())
}

pub async fn stats(api: &dyn RecognitionApi) -> Result<()> {
    let stats = api.model_stats().await.context("failed to fetch stats")?;
    print!("{}", format_stats(&stats));
    Ok(())
}

pub fn format_logs(records: &[AttendanceRecord]) -> String {
    if records.is_empty() {
        return "No attendance records.\n".to_string();
    }

    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = format!("{:<name_width$}  {:<8}  {}\n", "Name", "Time", "Confidence");
    for record in records {
        out.push_str(&format!(
            "{:<name_width$}  {:<8}  {}\n",
            record.name, record.timestamp, record.confidence
        ));
        for candidate in &record.details {
            out.push_str(&format!(
                "{:<name_width$}    - {} ({:.2})\n",
                "", candidate.name, candidate.distance
            ));
        }
    }
    out
}

pub fn format_stats(stats: &ModelStats) -> String {
    format!(
        "People enrolled: {}\nTraining images: {}\nLast trained:    {}\n",
        stats.total_people, stats.total_images, stats.last_trained
    )
}
