//! Single-pass summary statistics over a numeric sequence.

use crate::{kind::NumericValue, optional::OptionalValue};

/// Count, sum, minimum, maximum and average of the elements of a numeric sequence,
/// collected in one pass.
///
/// The sum follows the accumulation rule of the element kind (see
/// [`NumericValue::accumulate`]). The average divides a separate running total
/// ([`NumericValue::Total`]) by the count, so it does not wrap for integer kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics<T: NumericValue> {
    count: u64,
    sum: T,
    total: T::Total,
    min: Option<T>,
    max: Option<T>,
}

impl<T: NumericValue> SummaryStatistics<T> {
    pub fn new() -> Self {
        SummaryStatistics {
            count: 0,
            sum: T::zero(),
            total: T::TOTAL_ZERO,
            min: None,
            max: None,
        }
    }

    /// Records one more value.
    pub fn accept(&mut self, value: T) {
        self.count += 1;
        self.sum = self.sum.accumulate(value);
        self.total = T::add_to_total(self.total, value);
        self.min = Some(self.min.map_or(value, |m| m.min_of(value)));
        self.max = Some(self.max.map_or(value, |m| m.max_of(value)));
    }

    /// Folds `other` into `self`, as if every value recorded by `other` had been
    /// recorded here.
    pub fn combine(&mut self, other: &SummaryStatistics<T>) {
        self.count += other.count;
        self.sum = self.sum.accumulate(other.sum);
        self.total = T::merge_totals(self.total, other.total);
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min_of(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max_of(b)),
            (a, b) => a.or(b),
        };
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> T {
        self.sum
    }

    pub fn min(&self) -> OptionalValue<T> {
        self.min.into()
    }

    pub fn max(&self) -> OptionalValue<T> {
        self.max.into()
    }

    pub fn average(&self) -> OptionalValue<f64> {
        if self.count == 0 {
            OptionalValue::empty()
        } else {
            OptionalValue::of(T::total_to_f64(self.total) / self.count as f64)
        }
    }
}

impl<T: NumericValue> Default for SummaryStatistics<T> {
    fn default() -> Self {
        Self::new()
    }
}
