//! Period-over-period growth. One formula, one edge-case policy, applied at
//! every granularity.

use serde::Serialize;
use std::collections::BTreeMap;

/// Change between the two most recent periods of an aggregate series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Growth {
    pub current: u64,
    pub previous: u64,
    pub pct: f64,
}

impl Growth {
    /// `(current - previous) / previous * 100`, defined as 0.0 when the
    /// previous period is 0 so the value never propagates as inf/NaN.
    pub fn between(current: u64, previous: u64) -> Self {
        let pct = if previous == 0 {
            0.0
        } else {
            (current as f64 - previous as f64) / previous as f64 * 100.0
        };
        Growth {
            current,
            previous,
            pct,
        }
    }

    /// Growth across the two most recent periods only — not a full time
    /// series. Fewer than two periods yields the zero growth.
    pub fn over<K: Ord>(series: &BTreeMap<K, u64>) -> Self {
        let mut recent = series.values().rev();
        match (recent.next(), recent.next()) {
            (Some(&current), Some(&previous)) => Growth::between(current, previous),
            _ => Growth::default(),
        }
    }
}
