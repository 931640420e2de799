//! Progress reporting.
//!
//! Implement [`ProgressCallback`] and pass it through
//! [`ExtractOptions::with_progress`](crate::ExtractOptions::with_progress) to
//! observe a run. The expected frame count is known before decoding starts,
//! since the range is resolved first.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Where an extraction run stands.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Frames written so far.
    pub written: u64,
    /// Frames a complete run writes.
    pub expected: u64,
    /// Source index of the frame just written. `None` in the closing report.
    pub last_frame: Option<u64>,
    /// Time since the first frame was requested.
    pub elapsed: Duration,
}

impl ProgressInfo {
    /// Share of the run done, in `0.0..=1.0`. An empty run counts as done.
    pub fn fraction(&self) -> f64 {
        if self.expected == 0 {
            return 1.0;
        }
        (self.written as f64 / self.expected as f64).min(1.0)
    }

    /// Linear estimate of the time left, from the throughput so far.
    pub fn estimated_remaining(&self) -> Option<Duration> {
        if self.written == 0 {
            return None;
        }
        let left = self.expected.saturating_sub(self.written);
        Some(self.elapsed.div_f64(self.written as f64).mul_f64(left as f64))
    }
}

/// Observer of an extraction run. Cannot stop it.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, info: &ProgressInfo);
}

/// Used when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Counts written frames for one run and notifies the callback every
/// `report_every` frames.
pub(crate) struct ProgressReporter {
    callback: Arc<dyn ProgressCallback>,
    expected: u64,
    written: u64,
    report_every: u64,
    unreported: u64,
    started: Instant,
}

impl ProgressReporter {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        expected: u64,
        report_every: u64,
    ) -> Self {
        Self {
            callback,
            expected,
            written: 0,
            report_every: report_every.max(1),
            unreported: 0,
            started: Instant::now(),
        }
    }

    pub(crate) fn frame_written(&mut self, frame_index: u64) {
        self.written += 1;
        self.unreported += 1;
        if self.unreported == self.report_every {
            self.unreported = 0;
            self.notify(Some(frame_index));
        }
    }

    /// Always notifies, so observers see the final count.
    pub(crate) fn finish(&self) {
        self.notify(None);
    }

    fn notify(&self, last_frame: Option<u64>) {
        self.callback.on_progress(&ProgressInfo {
            written: self.written,
            expected: self.expected,
            last_frame,
            elapsed: self.started.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        infos: Mutex<Vec<ProgressInfo>>,
    }

    impl ProgressCallback for Recorder {
        fn on_progress(&self, info: &ProgressInfo) {
            self.infos.lock().unwrap().push(info.clone());
        }
    }

    #[test]
    fn notifies_every_n_frames_and_on_finish() {
        let recorder = Arc::new(Recorder::default());
        let mut reporter = ProgressReporter::new(recorder.clone(), 5, 2);
        for frame in [0, 3, 6, 9, 12] {
            reporter.frame_written(frame);
        }
        reporter.finish();

        let infos = recorder.infos.lock().unwrap();
        let written: Vec<u64> = infos.iter().map(|info| info.written).collect();
        assert_eq!(written, vec![2, 4, 5]);
        assert_eq!(infos[0].last_frame, Some(3));
        assert_eq!(infos[2].last_frame, None);
        assert!((infos[2].fraction() - 1.0).abs() < f64::EPSILON);
        assert_eq!(infos[2].estimated_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn empty_run_is_done() {
        let info = ProgressInfo {
            written: 0,
            expected: 0,
            last_frame: None,
            elapsed: Duration::from_millis(5),
        };
        assert_eq!(info.fraction(), 1.0);
        assert_eq!(info.estimated_remaining(), None);
    }
}
