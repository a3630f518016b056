use super::UrlTimings;
use crate::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places kept in every reported figure
const PRECISION: u32 = 3;

/// One row of the report table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStats {
    pub url: String,
    pub count: usize,
    pub count_perc: f64,
    pub time_sum: f64,
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

/// Per-URL figures before the dataset-wide shares are known
struct UrlTotals {
    url: String,
    count: usize,
    sum: Decimal,
    max: Decimal,
    avg: Decimal,
    med: Decimal,
}

pub struct StatsComputer;

impl StatsComputer {
    /// Reduce every URL's series into a [`UrlStats`] row
    ///
    /// Rows come out in the order URLs first appeared. Shares are relative to
    /// the whole dataset and computed from unrounded sums. Fails with
    /// [`Error::Overflow`] if a figure leaves the decimal range.
    pub fn compute(timings: UrlTimings) -> Result<Vec<UrlStats>> {
        tracing::debug!("Computing statistics for {} URLs", timings.len());

        let mut totals = Vec::with_capacity(timings.len());
        let mut total_count = 0usize;
        let mut total_time = Decimal::ZERO;

        for (url, mut times) in timings {
            if times.is_empty() {
                continue;
            }

            let count = times.len();
            let sum = times
                .iter()
                .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(*t))
                .ok_or_else(|| overflow(format!("time_sum of {url}")))?;
            times.sort_unstable();

            total_count += count;
            total_time = total_time
                .checked_add(sum)
                .ok_or_else(|| overflow("total request time"))?;

            totals.push(UrlTotals {
                count,
                sum,
                max: times[count - 1],
                avg: sum
                    .checked_div(Decimal::from(count))
                    .ok_or_else(|| overflow(format!("time_avg of {url}")))?,
                med: median(&times).ok_or_else(|| overflow(format!("time_med of {url}")))?,
                url,
            });
        }

        let rows = totals
            .into_iter()
            .map(|t| -> Result<UrlStats> {
                let count_perc = share(Decimal::from(t.count), Decimal::from(total_count))
                    .ok_or_else(|| overflow(format!("count_perc of {}", t.url)))?;
                let time_perc = share(t.sum, total_time)
                    .ok_or_else(|| overflow(format!("time_perc of {}", t.url)))?;
                Ok(UrlStats {
                    count_perc: rounded(count_perc),
                    time_perc: rounded(time_perc),
                    time_sum: rounded(t.sum),
                    time_avg: rounded(t.avg),
                    time_max: rounded(t.max),
                    time_med: rounded(t.med),
                    count: t.count,
                    url: t.url,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Computed statistics: {} URLs, {} requests, {} s total",
            rows.len(),
            total_count,
            total_time.round_dp(PRECISION)
        );

        Ok(rows)
    }
}

fn overflow(what: impl Into<String>) -> Error {
    Error::Overflow(what.into())
}

/// Keep the `limit` rows with the largest `time_sum`
///
/// Ties keep their original order. Shares are left as computed over the
/// full dataset.
pub fn select_top(mut rows: Vec<UrlStats>, limit: usize) -> Vec<UrlStats> {
    rows.sort_by(|a, b| b.time_sum.total_cmp(&a.time_sum));
    if rows.len() > limit {
        tracing::debug!("Truncating report table from {} to {} rows", rows.len(), limit);
        rows.truncate(limit);
    }
    rows
}

/// Median of an already sorted, non-empty slice
fn median(sorted: &[Decimal]) -> Option<Decimal> {
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        sorted[mid - 1]
            .checked_add(sorted[mid])?
            .checked_div(Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}

/// Percentage of `whole` taken by `part`, or `None` on overflow
fn share(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return Some(Decimal::ZERO);
    }
    part.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(whole)
}

fn rounded(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(PRECISION, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}
