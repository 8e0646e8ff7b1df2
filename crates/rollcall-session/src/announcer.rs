//! Spoken match announcements.
//!
//! Runs a configured text-to-speech command with the recognized label as
//! its last argument. The same label is announced at most once per
//! cooldown window so a person standing in front of the camera is not
//! greeted every poll.

use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_core::config::NotificationConfig;
use rollcall_core::error::CoreError;
use rollcall_core::ports::notifier::Announcer;
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, info};

pub struct CommandAnnouncer {
    program: String,
    args: Vec<String>,
    cooldown: Duration,
    last_announced: Mutex<HashMap<String, Instant>>,
}

impl CommandAnnouncer {
    pub fn new(program: impl Into<String>, args: Vec<String>, cooldown: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            cooldown,
            last_announced: Mutex::new(HashMap::new()),
        }
    }

    /// `None` when the command line is empty
    pub fn from_config(config: &NotificationConfig) -> Option<Self> {
        let (program, args) = config.announce_command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self::new(
            program.clone(),
            args.to_vec(),
            config.announce_cooldown(),
        ))
    }

    fn in_cooldown(&self, label: &str) -> bool {
        self.last_announced
            .lock()
            .get(label)
            .is_some_and(|at| at.elapsed() < self.cooldown)
    }

    /// Start the cooldown window for `label`
    fn mark_announced(&self, label: &str) {
        self.last_announced
            .lock()
            .insert(label.to_string(), Instant::now());
    }
}

#[async_trait]
impl Announcer for CommandAnnouncer {
    async fn announce(&self, label: &str) -> Result<(), CoreError> {
        if self.in_cooldown(label) {
            debug!("announcement suppressed (cooldown): {label}");
            return Ok(());
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(label)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CoreError::Internal(format!("failed to run {}: {e}", self.program)))?;

        self.mark_announced(label);
        info!("announcing: {label}");

        // Reap in the background; polling must not wait on speech
        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    debug!("{program} exited with {status}");
                }
                Err(e) => debug!("{program} wait failed: {e}"),
                _ => {}
            }
        });

        Ok(())
    }
}
