//! Run timing
//!
//! Case durations are plain millisecond counts; phase durations are collected
//! by a [`PhaseTimer`] and end up in the run report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::models::TestType;

/// Milliseconds since `started`
pub fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Wall-clock time spent in each phase of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub unit_ms: u64,
    pub http_ms: u64,
}

impl PhaseDurations {
    pub fn total_ms(&self) -> u64 {
        self.unit_ms + self.http_ms
    }
}

impl fmt::Display for PhaseDurations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unit {}ms | http {}ms | total {}ms",
            self.unit_ms,
            self.http_ms,
            self.total_ms()
        )
    }
}

/// Times the phases of a run back to back
#[derive(Debug)]
pub struct PhaseTimer {
    mark: Instant,
    durations: PhaseDurations,
}

impl PhaseTimer {
    pub fn start() -> Self {
        Self {
            mark: Instant::now(),
            durations: PhaseDurations::default(),
        }
    }

    /// Charge the time since the previous mark to `phase`
    pub fn finish(&mut self, phase: TestType) -> u64 {
        let ms = elapsed_ms(self.mark);
        self.mark = Instant::now();

        match phase {
            TestType::Unit => self.durations.unit_ms += ms,
            TestType::Http => self.durations.http_ms += ms,
        }
        ms
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }
}
