//! Campaign progress: per-level results and the preview shown before a level.

use std::time::{Duration, Instant};

use crate::session::{CompletionEvent, CompletionStats};
use crate::types::Campaign;

/// One row of the progress table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRecord {
    pub level: u32,
    /// Result of the latest solve; `None` until the level is solved.
    pub stats: Option<CompletionStats>,
}

impl LevelRecord {
    pub fn is_completed(&self) -> bool {
        self.stats.is_some()
    }
}

/// In-memory results for every level of a campaign, keyed by level number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    records: Vec<LevelRecord>,
}

impl Progress {
    pub fn new(campaign: &Campaign) -> Self {
        Self {
            records: campaign
                .levels
                .iter()
                .map(|l| LevelRecord {
                    level: l.level,
                    stats: None,
                })
                .collect(),
        }
    }

    /// Store a solve. A replayed level overwrites its earlier result.
    /// Returns `false` for a level the campaign does not have.
    pub fn record(&mut self, event: CompletionEvent) -> bool {
        match self.records.iter_mut().find(|r| r.level == event.level) {
            Some(record) => {
                record.stats = Some(event.stats);
                true
            }
            None => false,
        }
    }

    pub fn stats(&self, level: u32) -> Option<CompletionStats> {
        self.records
            .iter()
            .find(|r| r.level == level)
            .and_then(|r| r.stats)
    }

    pub fn completed(&self) -> usize {
        self.records.iter().filter(|r| r.is_completed()).count()
    }

    pub fn records(&self) -> &[LevelRecord] {
        &self.records
    }
}

/// Countdown while the solved picture is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview {
    deadline: Instant,
}

impl Preview {
    pub fn new(now: Instant, duration: Duration) -> Self {
        Self {
            deadline: now + duration,
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Whole seconds left, rounded up so the countdown never shows 0 early.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let ms = self.remaining(now).as_millis() as u64;
        ms.div_ceil(1000)
    }

    pub fn is_over(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}
