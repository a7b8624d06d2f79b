//! Translation completeness statistics.

use std::fmt;
use std::ops::AddAssign;

use serde::Serialize;

use crate::model::Catalog;
use crate::types::Status;

/// Message counts per status, as lrelease summarizes a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub obsolete: usize,
    /// Active messages without any translated text.
    pub untranslated: usize,
}

impl CatalogStats {
    #[must_use]
    pub fn compute(catalog: &Catalog) -> Self {
        let mut stats = Self::default();
        for (_, message) in catalog.messages() {
            match message.status {
                Status::Finished => stats.finished += 1,
                Status::Unfinished => stats.unfinished += 1,
                Status::Vanished => stats.vanished += 1,
                Status::Obsolete => stats.obsolete += 1,
            }
            if message.status.is_active() && !message.translation.has_text() {
                stats.untranslated += 1;
            }
        }
        stats
    }

    /// Messages counted for completeness (vanished and obsolete excluded).
    #[must_use]
    pub const fn active(&self) -> usize {
        self.finished + self.unfinished
    }

    /// Share of active messages that are finished, 0-100.
    ///
    /// An empty catalog is complete.
    #[must_use]
    #[allow(clippy::float_arithmetic, clippy::cast_precision_loss)]
    pub fn completion_percent(&self) -> f64 {
        if self.active() == 0 {
            return 100.0;
        }
        self.finished as f64 * 100.0 / self.active() as f64
    }
}

impl AddAssign for CatalogStats {
    fn add_assign(&mut self, other: Self) {
        self.finished += other.finished;
        self.unfinished += other.unfinished;
        self.vanished += other.vanished;
        self.obsolete += other.obsolete;
        self.untranslated += other.untranslated;
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} finished and {} unfinished ({:.1}% complete), {} untranslated, {} vanished, {} obsolete",
            self.finished,
            self.unfinished,
            self.completion_percent(),
            self.untranslated,
            self.vanished,
            self.obsolete
        )
    }
}
