use std::sync::{Arc, Mutex};
use std::time::Duration;

use devloop::console::OutputSink;

/// Output sink that records every line in memory.
///
/// Clones share the same buffer, so a test can keep one clone and hand
/// another to the code under test as `Arc<dyn OutputSink>`.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> Arc<dyn OutputSink> {
        Arc::new(self.clone())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Number of recorded lines equal to `line`.
    pub fn count(&self, line: &str) -> usize {
        self.lines.lock().unwrap().iter().filter(|l| *l == line).count()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.count(line) > 0
    }

    /// Poll until `line` has been recorded at least `times` times.
    ///
    /// Panics after 10 seconds.
    pub async fn wait_for_count(&self, line: &str, times: usize) {
        for _ in 0..1000 {
            if self.count(line) >= times {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "line {line:?} not seen {times} time(s); got: {:#?}",
            self.lines()
        );
    }

    pub async fn wait_for(&self, line: &str) {
        self.wait_for_count(line, 1).await
    }
}

impl OutputSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
