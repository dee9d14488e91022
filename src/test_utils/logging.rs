//! Log capture for tests: a tracing layer that records events into a
//! per-guard store, scoped to the current thread.
//!
//! `#[tokio::test]` uses a current-thread runtime, so events emitted while a
//! conversation resolves land in the guard created at the top of the test.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const MAX_ENTRIES: usize = 1000;

/// Storage for captured log entries.
#[derive(Debug, Default)]
pub struct LogStorage {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
}

impl LogStorage {
    #[must_use]
    pub const fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    #[must_use]
    pub const fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    #[must_use]
    pub fn contains_message(&self, message: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(message))
    }

    #[must_use]
    pub fn contains_level(&self, level: Level) -> bool {
        self.entries.iter().any(|e| e.level == level)
    }
}

/// A captured log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    #[must_use]
    pub fn new(level: Level, target: &str, message: &str) -> Self {
        Self {
            level,
            target: target.to_string(),
            message: message.to_string(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Layer that copies every event into a [`LogStorage`].
pub struct TestLogLayer {
    storage: Arc<Mutex<LogStorage>>,
}

impl TestLogLayer {
    pub const fn new(storage: Arc<Mutex<LogStorage>>) -> Self {
        Self { storage }
    }
}

struct FieldVisitor<'a> {
    message: &'a mut String,
    fields: &'a mut Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            *self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for TestLogLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let metadata = event.metadata();
        let mut entry = LogEntry::new(*metadata.level(), metadata.target(), "");
        event.record(&mut FieldVisitor {
            message: &mut entry.message,
            fields: &mut entry.fields,
        });

        if let Ok(mut storage) = self.storage.lock() {
            storage.push(entry);
        }
    }
}

/// Capture events at `level` (or `RUST_LOG`) on this thread until the guard drops.
#[must_use]
pub fn init_test_logging(level: &str) -> TestLoggingGuard {
    let storage = Arc::new(Mutex::new(LogStorage::new(MAX_ENTRIES)));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(TestLogLayer::new(Arc::clone(&storage)));

    TestLoggingGuard {
        storage,
        _default: tracing::subscriber::set_default(subscriber),
        start_time: Instant::now(),
        test_name: String::new(),
    }
}

/// Owns the captured entries; prints them if the test panics.
pub struct TestLoggingGuard {
    storage: Arc<Mutex<LogStorage>>,
    _default: DefaultGuard,
    start_time: Instant,
    test_name: String,
}

impl TestLoggingGuard {
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.test_name = name.to_string();
        self
    }

    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.storage
            .lock()
            .map(|storage| storage.entries().iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.storage
            .lock()
            .is_ok_and(|storage| storage.contains_message(message))
    }

    #[must_use]
    pub fn contains_at(&self, level: Level, message: &str) -> bool {
        self.entries()
            .iter()
            .any(|e| e.level == level && e.message.contains(message))
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.storage
            .lock()
            .is_ok_and(|storage| storage.contains_level(Level::ERROR))
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.storage
            .lock()
            .is_ok_and(|storage| storage.contains_level(Level::WARN))
    }

    /// Captured entries, one per line, for failure output.
    #[must_use]
    pub fn render(&self) -> String {
        let entries = self.entries();
        if entries.is_empty() {
            return String::from("No logs captured");
        }
        let mut output = format!("Captured {} log entries:\n", entries.len());
        for entry in entries {
            let _ = writeln!(output, "[{}] {}: {}", entry.level, entry.target, entry.message);
            for (key, value) in &entry.fields {
                let _ = writeln!(output, "    {key} = {value}");
            }
        }
        output
    }
}

impl Drop for TestLoggingGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            eprintln!("\n{}", "═".repeat(60));
            if !self.test_name.is_empty() {
                eprintln!("TEST FAILED: {}", self.test_name);
            }
            eprintln!("Duration: {:?}", self.start_time.elapsed());
            eprintln!("{}", self.render());
            eprintln!("{}\n", "═".repeat(60));
        }
    }
}

/// Assert that `guard` captured an entry at `level` containing `message`.
#[macro_export]
macro_rules! assert_log_contains {
    ($guard:expr, $level:expr, $message:expr) => {{
        let guard = &$guard;
        assert!(
            guard.contains_at($level, $message),
            "Expected log with level {} containing '{}'\n{}",
            $level,
            $message,
            guard.render()
        );
    }};
}

/// Assert that `guard` captured no warnings.
#[macro_export]
macro_rules! assert_no_warnings {
    ($guard:expr) => {{
        let guard = &$guard;
        assert!(
            !guard.has_warnings(),
            "Expected no warnings but found some:\n{}",
            guard.render()
        );
    }};
}
