use tracing::debug;

/// Receives progress notifications from streaming runs.
///
/// Units are words for word streams and characters for text streams.
pub trait ProgressObserver {
    fn on_start(&mut self, _total_hint: Option<u64>) {}
    fn on_batch(&mut self, _units: u64) {}
    fn on_finish(&mut self) {}
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Logs a line every `every` batches.
#[derive(Debug)]
pub struct TracingProgress {
    label: String,
    every: usize,
    batches: usize,
    done: u64,
    total: Option<u64>,
}

impl TracingProgress {
    pub fn new(label: impl Into<String>, every: usize) -> Self {
        Self {
            label: label.into(),
            every: every.max(1),
            batches: 0,
            done: 0,
            total: None,
        }
    }
}

impl ProgressObserver for TracingProgress {
    fn on_start(&mut self, total_hint: Option<u64>) {
        self.total = total_hint;
        self.batches = 0;
        self.done = 0;
    }

    fn on_batch(&mut self, units: u64) {
        self.batches += 1;
        self.done += units;
        if self.batches % self.every == 0 {
            match self.total {
                Some(t) if t > 0 => debug!(
                    "{}: {} / {} ({:.1}%)",
                    self.label,
                    self.done,
                    t,
                    self.done as f64 / t as f64 * 100.0
                ),
                _ => debug!("{}: {} processed", self.label, self.done),
            }
        }
    }

    fn on_finish(&mut self) {
        debug!("{}: done after {} batches", self.label, self.batches);
    }
}
