use crate::settings::WindowId;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Substrings that mark the start of a new transaction segment.
pub const TRANSACTION_MARKERS: [&str; 3] = ["PDV", "Atend", "Trans"];

/// Substrings that mark a report segment, during which liveness monitoring
/// is paused.
pub const REPORT_MARKERS: [&str; 2] = ["Relatorio", "Gerencial"];

/// Separator the terminals use to pack several display lines into one
/// datagram.
const SEGMENT_SEPARATOR: char = '^';

/// Placeholder shown before a pane receives its first message.
const INITIAL_TEXT: &str = "********************";

pub fn is_transaction(text: &str) -> bool {
    TRANSACTION_MARKERS.iter().any(|marker| text.contains(marker))
}

pub fn is_report(text: &str) -> bool {
    REPORT_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Per-pane display state. Mutated only by the GUI thread; lives for the
/// process lifetime.
#[derive(Debug)]
pub struct WindowState {
    lines: Vec<String>,
    last_event: Option<Instant>,
    alert_active: bool,
    monitoring: bool,
    last_message: Option<String>,
    /// Deadline of the armed liveness watch, if any.
    watch: Option<Instant>,
    log_path: PathBuf,
}

impl WindowState {
    fn new(log_path: PathBuf) -> Self {
        Self {
            lines: vec![INITIAL_TEXT.to_owned()],
            last_event: None,
            alert_active: false,
            monitoring: false,
            last_message: None,
            watch: None,
            log_path,
        }
    }

    /// The visible scroll buffer, one line per entry.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn alert_active(&self) -> bool {
        self.alert_active
    }

    pub fn monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn last_event(&self) -> Option<Instant> {
        self.last_event
    }

    fn handle(&mut self, text: &str, now: Instant, alert_timeout: Duration) {
        self.last_event = Some(now);

        if self.last_message.as_deref() != Some(text) {
            self.last_message = Some(text.to_owned());
            // A fresh distinct message resets the watch instead of letting a
            // stale deadline keep ticking.
            self.watch = None;
        }

        if self.alert_active {
            self.alert_active = false;
        }

        if is_transaction(text) {
            self.flush();
            self.lines = vec![Local::now().format("%d-%m-%Y %H:%M:%S").to_string()];
            self.monitoring = true;
        } else {
            self.lines
                .extend(text.split(SEGMENT_SEPARATOR).map(str::to_owned));
        }

        if is_report(text) {
            self.monitoring = false;
        } else if self.monitoring {
            self.watch = Some(now + alert_timeout);
        }
    }

    fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.watch {
            if now >= deadline {
                self.watch = None;
                self.alert_active = true;
                tracing::info!(log = %self.log_path.display(), "no events within timeout, raising alert");
            }
        }
    }

    /// Append the current buffer to the pane's log file. Write failures are
    /// logged and do not disturb the state machine.
    fn flush(&self) {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let entry = format!("{stamp}\n{}\n\n", self.lines.join("\n"));
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));
        if let Err(err) = result {
            tracing::warn!(log = %self.log_path.display(), ?err, "transaction log write failed");
        }
    }
}

/// The four per-pane state machines behind one handle. `handle` and `tick`
/// are called from the GUI thread's drain pass only, so no locking is
/// involved.
#[derive(Debug)]
pub struct DisplayEngine {
    windows: [WindowState; 4],
    alert_timeout: Duration,
}

impl DisplayEngine {
    pub fn new(log_dir: &Path, alert_timeout: Duration) -> Self {
        let windows = WindowId::ALL
            .map(|id| WindowState::new(log_dir.join(format!("window_{}_log.txt", id.label()))));
        Self {
            windows,
            alert_timeout,
        }
    }

    pub fn window(&self, id: WindowId) -> &WindowState {
        &self.windows[id.index()]
    }

    pub fn handle(&mut self, id: WindowId, text: &str, now: Instant) {
        self.windows[id.index()].handle(text, now, self.alert_timeout);
    }

    /// Fire any expired liveness watches. Called once per drain pass.
    pub fn tick(&mut self, now: Instant) {
        for window in &mut self.windows {
            window.tick(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_markers_match_by_substring() {
        assert!(is_transaction("PDV:0001"));
        assert!(is_transaction("inicio Atend 17"));
        assert!(is_transaction("Trans 99"));
        assert!(!is_transaction("linha comum"));
    }

    #[test]
    fn report_markers_match_by_substring() {
        assert!(is_report("Relatorio de caixa"));
        assert!(is_report("Gerencial"));
        assert!(!is_report("PDV:0001"));
    }
}
