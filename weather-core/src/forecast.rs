//! Grouping of 3-hour forecast samples into per-day summaries.

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Condition, DailyForecastSummary, ForecastSample};

/// Which clock decides where one calendar day ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBoundary {
    /// The viewer's local time zone.
    #[default]
    Local,
    /// A fixed offset east of UTC, in seconds.
    Fixed { offset_seconds: i32 },
}

impl DayBoundary {
    pub fn utc() -> Self {
        DayBoundary::Fixed { offset_seconds: 0 }
    }

    /// Calendar date of `ts` as `dd/mm/yyyy`.
    pub fn date_key(&self, ts: DateTime<Utc>) -> String {
        const FORMAT: &str = "%d/%m/%Y";
        match self {
            DayBoundary::Local => ts.with_timezone(&Local).format(FORMAT).to_string(),
            DayBoundary::Fixed { offset_seconds } => {
                let offset = FixedOffset::east_opt(*offset_seconds).unwrap_or_else(|| Utc.fix());
                ts.with_timezone(&offset).format(FORMAT).to_string()
            }
        }
    }
}

/// Partition `samples` into calendar days, in first-occurrence order.
///
/// Returns `None` when there is nothing to aggregate. Input order is trusted:
/// days come out chronological only if the samples went in that way.
pub fn aggregate_daily(
    samples: &[ForecastSample],
    boundary: DayBoundary,
) -> Option<Vec<DailyForecastSummary>> {
    if samples.is_empty() {
        return None;
    }

    let mut buckets: Vec<(String, Vec<ForecastSample>)> = Vec::new();
    for sample in samples {
        let key = boundary.date_key(sample.timestamp);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(sample.clone()),
            None => buckets.push((key, vec![sample.clone()])),
        }
    }

    let days = buckets
        .into_iter()
        .map(|(date, samples)| {
            let (min_temp, max_temp) = samples.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(mn, mx), s| (mn.min(s.temperature), mx.max(s.temperature)),
            );
            let condition = dominant_condition(&samples);

            DailyForecastSummary {
                date,
                min_temp,
                max_temp,
                condition,
                samples,
            }
        })
        .collect();

    Some(days)
}

/// Most frequent condition id; ties go to whichever id was seen first.
pub fn dominant_condition(samples: &[ForecastSample]) -> Condition {
    let mut tally: Vec<(&Condition, usize)> = Vec::new();
    for cond in samples.iter().filter_map(|s| s.condition.as_ref()) {
        match tally.iter_mut().find(|(c, _)| c.id == cond.id) {
            Some((_, n)) => *n += 1,
            None => tally.push((cond, 1)),
        }
    }

    let mut best: Option<(&Condition, usize)> = None;
    for (cond, n) in tally {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((cond, n));
        }
    }

    best.map(|(c, _)| c.clone()).unwrap_or_else(Condition::unknown)
}
