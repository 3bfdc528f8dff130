//! Next-month spend forecast from a least-squares line over monthly totals.
//!
//! Each month that has at least one transaction becomes one point, indexed by
//! its position in the chronological sequence. Calendar gaps are not filled
//! with zeros, so two months a year apart are adjacent points. There is no
//! seasonality and no clamping: a falling trend can predict a negative total.

use rust_decimal::Decimal;

use crate::aggregate::{self, MonthBucket};
use crate::error::TrackerError;
use crate::models::{Transaction, YearMonth};

pub(crate) const MIN_MONTHS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Forecast {
    pub(crate) points: Vec<MonthBucket>,
    pub(crate) slope: Decimal,
    pub(crate) intercept: Decimal,
    /// Index the prediction was evaluated at (one past the last point).
    pub(crate) next_index: usize,
    /// Calendar month after the last observed month.
    pub(crate) next_month: YearMonth,
    pub(crate) predicted: Decimal,
}

impl Forecast {
    pub(crate) fn fit(txns: &[Transaction]) -> Result<Self, TrackerError> {
        let points = aggregate::by_month(txns);
        let Some(last) = points.last().copied() else {
            return Err(insufficient(0));
        };
        if points.len() < MIN_MONTHS {
            return Err(insufficient(points.len()));
        }

        let (slope, intercept) = least_squares(&points);
        let next_index = points.len();
        let predicted = slope * Decimal::from(next_index) + intercept;

        Ok(Self {
            next_month: last.month.next(),
            points,
            slope,
            intercept,
            next_index,
            predicted,
        })
    }

    /// Fitted value at `index`.
    pub(crate) fn value_at(&self, index: usize) -> Decimal {
        self.slope * Decimal::from(index) + self.intercept
    }
}

pub(crate) fn predict_next_month(txns: &[Transaction]) -> Result<Decimal, TrackerError> {
    Forecast::fit(txns).map(|f| f.predicted)
}

fn insufficient(months: usize) -> TrackerError {
    TrackerError::InsufficientData {
        months,
        required: MIN_MONTHS,
    }
}

/// Ordinary least squares over (index, total). Needs at least two points.
fn least_squares(points: &[MonthBucket]) -> (Decimal, Decimal) {
    let n = Decimal::from(points.len());
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) =
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    for (i, point) in points.iter().enumerate() {
        let x = Decimal::from(i);
        sum_x += x;
        sum_y += point.total;
        sum_xy += x * point.total;
        sum_xx += x * x;
    }

    // Indices are distinct, so the denominator is non-zero for n >= 2.
    let denominator = n * sum_xx - sum_x * sum_x;
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}
