use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a period total is divided by to get a daily rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Period {
    /// A fixed number of days, e.g. a 30 day download counter.
    Days { days: u32 },
    /// One value per day, e.g. the bars of a download graph.
    Buckets,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("ZeroDays: a rate period needs at least one day")]
    ZeroDays,

    #[error("EmptySeries: no values to average")]
    EmptySeries,

    #[error("Overflow: counts add up past {max}", max = u64::MAX)]
    Overflow,
}

pub fn sum(values: &[u64]) -> Result<u64, AggregateError> {
    values
        .iter()
        .try_fold(0u64, |acc, value| acc.checked_add(*value))
        .ok_or(AggregateError::Overflow)
}

pub fn per_day(total: u64, days: u32) -> Result<u64, AggregateError> {
    if days == 0 {
        return Err(AggregateError::ZeroDays);
    }
    Ok(total / u64::from(days))
}

pub fn average(values: &[u64]) -> Result<u64, AggregateError> {
    if values.is_empty() {
        return Err(AggregateError::EmptySeries);
    }
    Ok(sum(values)? / values.len() as u64)
}

/// Daily rate of `values` over `period`.
pub fn rate(values: &[u64], period: Period) -> Result<u64, AggregateError> {
    match period {
        Period::Days { days } => per_day(sum(values)?, days),
        Period::Buckets => average(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_values() {
        assert_eq!(sum(&[10, 20, 30]), Ok(60));
        assert_eq!(sum(&[]), Ok(0));
    }

    #[test]
    fn sum_past_u64_is_an_error() {
        assert_eq!(sum(&[u64::MAX, 1]), Err(AggregateError::Overflow));
        assert_eq!(average(&[u64::MAX, u64::MAX]), Err(AggregateError::Overflow));
        assert_eq!(
            rate(&[u64::MAX, 2], Period::Days { days: 30 }),
            Err(AggregateError::Overflow)
        );
    }

    #[test]
    fn per_day_over_thirty_days() {
        assert_eq!(per_day(900, 30), Ok(30));
        assert_eq!(per_day(59, 30), Ok(1));
        assert_eq!(per_day(10, 0), Err(AggregateError::ZeroDays));
    }

    #[test]
    fn average_truncates() {
        assert_eq!(average(&[10, 20, 31]), Ok(20));
        assert_eq!(average(&[]), Err(AggregateError::EmptySeries));
    }

    #[test]
    fn rate_follows_period() {
        assert_eq!(rate(&[450, 450], Period::Days { days: 30 }), Ok(30));
        assert_eq!(rate(&[10, 20, 30], Period::Buckets), Ok(20));
    }
}
