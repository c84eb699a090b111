// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Post-print paper feed.
//
// The DevTerm thermal PPD only offers fixed feed distances: 3 mm steps from
// 3 mm to 45 mm. Its `FeedDist` choices are named `<index>feed<mm>mm` with a
// zero-based index, e.g. `0feed3mm` … `14feed45mm`.

use cupslabel_core::types::JobAttributes;

/// Distance of one feed step.
pub const FEED_STEP_MM: u32 = 3;

/// Number of feed steps the device supports.
pub const MAX_FEED_STEPS: u32 = 15;

/// Whether and how far to feed after the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPolicy {
    NoFeed,
    AfterJob { step_index: u32, distance_mm: u32 },
}

impl FeedPolicy {
    /// Quantise a requested feed distance to the nearest supported step.
    pub fn from_mm(feed_after_mm: f64) -> Self {
        if feed_after_mm.is_nan() || feed_after_mm <= 0.0 {
            return Self::NoFeed;
        }

        let steps = (feed_after_mm / f64::from(FEED_STEP_MM))
            .round_ties_even()
            .clamp(1.0, f64::from(MAX_FEED_STEPS)) as u32;

        Self::AfterJob {
            step_index: steps - 1,
            distance_mm: steps * FEED_STEP_MM,
        }
    }

    /// `FeedWhere` / `FeedDist` job attributes for this policy.
    pub fn to_attributes(&self) -> JobAttributes {
        let mut attrs = JobAttributes::new();
        match self {
            Self::NoFeed => attrs.set("FeedWhere", "None"),
            Self::AfterJob {
                step_index,
                distance_mm,
            } => {
                attrs.set("FeedWhere", "AfterJob");
                attrs.set("FeedDist", format!("{step_index}feed{distance_mm}mm"));
            }
        }
        attrs
    }
}
