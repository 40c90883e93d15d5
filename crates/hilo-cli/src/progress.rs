use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use hilo_core::entities::{Chat, ChatOutcome, ChatStatus};
use hilo_pipeline::RunObserver;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new_spinner());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template("{wide_bar:.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_length(&self, total: u64) {
        if let Some(bar) = &self.bar {
            bar.set_length(total);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

/// One overall bar for the batch plus a spinner per running chat.
pub struct RunProgress {
    overall: Progress,
    chats: Mutex<HashMap<i64, (Progress, usize)>>,
}

impl RunProgress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            overall: Progress::bar(0, "chats"),
            chats: Mutex::new(HashMap::new()),
        }
    }

    pub fn finish(&self) {
        self.overall.finish_clear();
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for RunProgress {
    fn run_started(&self, chats: usize) {
        self.overall.set_length(chats as u64);
    }

    fn chat_started(&self, chat: &Chat) {
        let spinner = Progress::spinner(&format!("{}: reading", chat.name));
        self.chats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chat.id, (spinner, 0));
    }

    fn messages_ingested(&self, chat: &Chat, count: usize) {
        let mut chats = self.chats.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((spinner, total)) = chats.get_mut(&chat.id) {
            *total += count;
            spinner.set_message(&format!("{}: {total} messages", chat.name));
        }
    }

    fn graph_built(&self, chat: &Chat) {
        let chats = self.chats.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((spinner, total)) = chats.get(&chat.id) {
            spinner.set_message(&format!("{}: {total} messages, saving", chat.name));
        }
    }

    fn chat_finished(&self, outcome: &ChatOutcome) {
        let entry = self
            .chats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&outcome.chat_id);
        if let Some((spinner, _)) = entry {
            let line = format!(
                "{}: {} ({} messages)",
                outcome.chat_name,
                status_label(outcome.status),
                outcome.messages_processed
            );
            match outcome.status {
                ChatStatus::Complete => spinner.finish_ok(&line),
                ChatStatus::Partial | ChatStatus::Cancelled | ChatStatus::Failed => {
                    spinner.finish_err(&line);
                }
            }
        }
        self.overall.inc(1);
    }
}

const fn status_label(status: ChatStatus) -> &'static str {
    match status {
        ChatStatus::Complete => "done",
        ChatStatus::Partial => "partial",
        ChatStatus::Cancelled => "cancelled",
        ChatStatus::Failed => "failed",
    }
}
