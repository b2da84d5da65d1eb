use std::time::Instant;

pub struct PerformanceTracker {
    start_time: Instant,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn create(enabled: bool) -> Option<Self> {
        if enabled { Some(Self::new()) } else { None }
    }

    pub fn print_stats(&self, count: usize) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let rate = if seconds > 0.0 {
            count as f64 / seconds
        } else {
            0.0
        };

        eprintln!(
            "Processed {} records in {:.3}s ({:.0} records/sec)",
            count, seconds, rate
        );
    }

    pub fn report_if_needed(tracker: &Option<Self>, count: usize) {
        if let Some(t) = tracker {
            t.print_stats(count);
        }
    }
}
