//! Terminal presenter for the session status surface.

use parking_lot::Mutex;
use rollcall_core::models::enrollment::EnrollmentProgress;
use rollcall_core::ports::display::{ControlState, StatusDisplay};
use tracing::debug;

const BAR_WIDTH: usize = 30;

/// Prints status changes to stdout. Control enablement has no terminal
/// counterpart and is only logged.
#[derive(Default)]
pub struct ConsoleDisplay {
    last_status: Mutex<String>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusDisplay for ConsoleDisplay {
    fn set_status(&self, text: &str) {
        let mut last = self.last_status.lock();
        if *last != text {
            println!("{text}");
            *last = text.to_string();
        }
    }

    fn set_controls(&self, controls: ControlState) {
        debug!(
            "controls: start={} stop={} capture={}",
            controls.start, controls.stop, controls.capture
        );
    }

    fn show_recognition(&self, message: &str) {
        println!("  >> {message}");
    }

    fn show_progress(&self, progress: &EnrollmentProgress) {
        println!("{}", progress_bar(progress));
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

/// `[#######-----------------------] 12/50 (24%)`
pub fn progress_bar(progress: &EnrollmentProgress) -> String {
    let percent = progress.percent();
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "[{}{}] {} ({:.0}%)",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.label(),
        percent
    )
}
