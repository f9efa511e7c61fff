use serde::{Deserialize, Serialize};

/// One step of a cumulative record: `responses` total as of `time_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSample {
    pub time_secs: f64,
    pub responses: u32,
}

impl CumulativeSample {
    pub fn new(time_secs: f64, responses: u32) -> Self {
        Self {
            time_secs,
            responses,
        }
    }
}

impl From<(f64, u32)> for CumulativeSample {
    fn from(v: (f64, u32)) -> Self {
        CumulativeSample::new(v.0, v.1)
    }
}

impl From<CumulativeSample> for (f64, f64) {
    fn from(s: CumulativeSample) -> Self {
        (s.time_secs, s.responses as f64)
    }
}

/// Append-only log of response times, kept as a sparse step function.
///
/// Seeded with `(0, 0)`. Each response appends a sample one higher than the
/// last; coincident timestamps are kept as separate samples.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeRecorder {
    samples: Vec<CumulativeSample>,
    total: u32,
    finalized: bool,
}

impl CumulativeRecorder {
    pub fn new() -> Self {
        Self {
            samples: vec![CumulativeSample::new(0.0, 0)],
            total: 0,
            finalized: false,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn samples(&self) -> &[CumulativeSample] {
        &self.samples
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns `None` once the record has been finalized.
    pub fn record_response(&mut self, elapsed_secs: f64) -> Option<CumulativeSample> {
        if self.finalized {
            tracing::warn!(at = elapsed_secs, "response recorded after finalize, dropped");
            return None;
        }
        debug_assert!(
            self.samples
                .last()
                .map_or(true, |last| elapsed_secs >= last.time_secs),
            "response times must be non-decreasing"
        );

        self.total += 1;
        let sample = CumulativeSample::new(elapsed_secs, self.total);
        self.samples.push(sample);
        Some(sample)
    }

    /// Close the record at `duration_secs`, extending the last count to that
    /// time if needed. Later calls return the same series untouched.
    pub fn finalize(&mut self, duration_secs: f64) -> &[CumulativeSample] {
        if !self.finalized {
            // The seed sample guarantees `last` exists.
            if let Some(&last) = self.samples.last() {
                if last.time_secs < duration_secs {
                    self.samples
                        .push(CumulativeSample::new(duration_secs, last.responses));
                }
            }
            self.finalized = true;
        }
        &self.samples
    }
}

impl Default for CumulativeRecorder {
    fn default() -> Self {
        Self::new()
    }
}
