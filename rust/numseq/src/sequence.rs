//! Lazily produced, single-pass sequences over one element kind.
//!
//! A [`Sequence`] is created by a constructor ([`Sequence::of`], [`Sequence::generate`],
//! [`Sequence::iterate`], the integer `range` constructors, ...), transformed zero or
//! more times by intermediate operations, and consumed exactly once by a terminal
//! operation.
//!
//! # Evaluation
//!
//! Intermediate operations (`map`, `map_to_*`, `flat_map_to_*`, `filter`, `limit`, ...)
//! only record a stage: each takes the handle by value and returns a new handle that
//! wraps the previous stage. No element is produced until a terminal operation
//! (`reduce`, `sum`, `average`, `for_each`, `to_vec`, ...) runs; the terminal then pulls
//! elements one by one from the head of the chain, which pulls from its upstream, down
//! to the source. Infinite sources compute an element only when it is pulled, and
//! [`Sequence::limit`] stops pulling once its bound is reached.
//!
//! # Lifecycle
//!
//! A handle is [`SequenceState::Open`] until a terminal operation starts,
//! [`SequenceState::Consuming`] while it runs, and [`SequenceState::Closed`] afterwards.
//! Terminal operations take `&mut self`, so a handle outlives its consumption and a
//! second terminal on it fails with a `Reuse` error. Intermediate operations move the
//! handle, so a superseded handle cannot be touched again at all.
//!
//! Consuming an infinite sequence without a `limit` (or a short-circuiting terminal
//! such as [`Sequence::find_first`]) never returns. This is not detected.
//!
//! Sequences are not `Send`: a handle belongs to the thread that constructed it.

use std::fmt;

use log::{debug, trace, warn};
use num_traits::Zero;
use numseq_common::{Result, error::Error};

use crate::{
    adapters::{FlattenSources, Iterate, Source},
    kind::{Double, ElementKind, Int, Kind, Long, NumericValue, Obj},
    optional::OptionalValue,
    stats::SummaryStatistics,
};

/// Sequence of arbitrary elements of type `T`.
pub type ObjSequence<'a, T> = Sequence<'a, Obj<T>>;

/// Sequence of `i32` elements.
pub type IntSequence<'a> = Sequence<'a, Int>;

/// Sequence of `i64` elements.
pub type LongSequence<'a> = Sequence<'a, Long>;

/// Sequence of `f64` elements.
pub type DoubleSequence<'a> = Sequence<'a, Double>;

/// Lifecycle state of a sequence handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Constructed, not yet consumed.
    Open,
    /// A terminal operation is pulling elements.
    Consuming,
    /// A terminal operation completed, or the handle was superseded.
    Closed,
}

/// Lazy, single-pass producer of elements of kind `K`.
pub struct Sequence<'a, K: Kind> {
    source: Option<Source<'a, K::Elem>>,
    state: SequenceState,
    infinite: bool,
}

impl<'a, K> Sequence<'a, K>
where
    K: Kind,
    K::Elem: 'a,
{
    pub(crate) fn from_source(source: Source<'a, K::Elem>, infinite: bool) -> Self {
        Sequence {
            source: Some(source),
            state: SequenceState::Open,
            infinite,
        }
    }

    pub(crate) fn from_values<I>(values: I, infinite: bool) -> Self
    where
        I: Iterator<Item = K::Elem> + 'a,
    {
        Self::from_source(Box::new(values.map(Ok)), infinite)
    }

    fn closed() -> Self {
        Sequence {
            source: None,
            state: SequenceState::Closed,
            infinite: false,
        }
    }

    /// Zero-length sequence.
    pub fn empty() -> Self {
        Self::from_values(std::iter::empty(), false)
    }

    /// Finite sequence over the given values, in the given order.
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = K::Elem>,
        I::IntoIter: 'a,
    {
        Self::from_values(values.into_iter(), false)
    }

    /// Infinite sequence; every pull invokes `supplier` once.
    ///
    /// Successive calls are independent: no index relationship between the
    /// produced values is implied.
    pub fn generate(supplier: impl FnMut() -> K::Elem + 'a) -> Self {
        Self::from_values(std::iter::repeat_with(supplier), true)
    }

    /// Infinite sequence `seed, step(seed), step(step(seed)), ...`.
    ///
    /// `step` runs only when the next element is pulled, so `iterate(..).limit(n)`
    /// invokes it `n - 1` times.
    pub fn iterate(seed: K::Elem, step: impl FnMut(K::Elem) -> K::Elem + 'a) -> Self
    where
        K::Elem: Clone,
    {
        Self::from_values(Iterate::new(seed, step), true)
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn kind(&self) -> ElementKind {
        K::KIND
    }

    /// Returns `true` if the sequence is backed by a generation rule that has not been
    /// truncated by [`Sequence::limit`].
    ///
    /// The flag follows the upstream chain only. A [`Sequence::flat_map`] handle is
    /// flagged from its outer sequence, since its nested sequences do not exist until
    /// elements are pulled.
    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Takes the source out of the handle, leaving it closed.
    pub(crate) fn into_source(mut self, operation: &str) -> Result<Source<'a, K::Elem>> {
        self.state = SequenceState::Closed;
        self.source.take().ok_or_else(|| {
            warn!("{operation}: {} sequence already closed", K::KIND);
            Error::reuse(operation)
        })
    }

    fn derive<K2>(
        mut self,
        operation: &str,
        stage: impl FnOnce(Source<'a, K::Elem>) -> Source<'a, K2::Elem>,
    ) -> Sequence<'a, K2>
    where
        K2: Kind,
        K2::Elem: 'a,
    {
        self.state = SequenceState::Closed;
        match self.source.take() {
            Some(source) => {
                trace!("{operation}: {} -> {}", K::KIND, K2::KIND);
                Sequence::from_source(stage(source), self.infinite)
            }
            None => {
                trace!("{operation}: upstream {} sequence already closed", K::KIND);
                Sequence::closed()
            }
        }
    }

    /// Runs a terminal operation over the source and closes the handle.
    fn consume<R>(
        &mut self,
        operation: &'static str,
        terminal: impl FnOnce(&mut Source<'a, K::Elem>) -> Result<R>,
    ) -> Result<R> {
        let Some(mut source) = self.source.take() else {
            warn!("{operation}: {} sequence already closed", K::KIND);
            return Err(Error::reuse(operation));
        };
        if self.infinite {
            debug!("{operation}: consuming an infinite {} sequence without a limit", K::KIND);
        }
        self.state = SequenceState::Consuming;
        trace!("{operation}: {} sequence consuming", K::KIND);
        let result = terminal(&mut source);
        drop(source);
        self.state = SequenceState::Closed;
        trace!("{operation}: {} sequence closed", K::KIND);
        result
    }

    // Intermediate operations.

    /// Element-wise transform within the same kind.
    pub fn map(self, f: impl FnMut(K::Elem) -> K::Elem + 'a) -> Self {
        self.map_to::<K>(f)
    }

    /// Element-wise transform into a sequence of kind `K2`.
    pub fn map_to<K2>(self, mut f: impl FnMut(K::Elem) -> K2::Elem + 'a) -> Sequence<'a, K2>
    where
        K2: Kind,
        K2::Elem: 'a,
    {
        self.derive("map", move |source| {
            Box::new(source.map(move |item| item.map(&mut f)))
        })
    }

    /// Element-wise transform into kind `K2` where the mapping itself may fail; a
    /// failure surfaces as the error of the terminal operation.
    pub(crate) fn try_map_to<K2>(
        self,
        mut f: impl FnMut(K::Elem) -> Result<K2::Elem> + 'a,
    ) -> Sequence<'a, K2>
    where
        K2: Kind,
        K2::Elem: 'a,
    {
        self.derive("map", move |source| {
            Box::new(source.map(move |item| item.and_then(&mut f)))
        })
    }

    pub fn map_to_obj<U: 'a>(self, f: impl FnMut(K::Elem) -> U + 'a) -> ObjSequence<'a, U> {
        self.map_to::<Obj<U>>(f)
    }

    pub fn map_to_int(self, f: impl FnMut(K::Elem) -> i32 + 'a) -> IntSequence<'a> {
        self.map_to::<Int>(f)
    }

    pub fn map_to_long(self, f: impl FnMut(K::Elem) -> i64 + 'a) -> LongSequence<'a> {
        self.map_to::<Long>(f)
    }

    pub fn map_to_double(self, f: impl FnMut(K::Elem) -> f64 + 'a) -> DoubleSequence<'a> {
        self.map_to::<Double>(f)
    }

    /// Expands every element into a nested sequence of kind `K2` and concatenates the
    /// nested sequences in source order.
    ///
    /// Each nested sequence is drained and dropped before the next element is pulled.
    /// An infinite nested sequence is reported with a `debug!` record when it is
    /// reached; draining it never returns unless a downstream `limit` stops the pulls.
    pub fn flat_map<K2>(
        self,
        mut f: impl FnMut(K::Elem) -> Sequence<'a, K2> + 'a,
    ) -> Sequence<'a, K2>
    where
        K2: Kind,
        K2::Elem: 'a,
    {
        self.derive("flat_map", move |source| {
            Box::new(FlattenSources::new(source, move |elem| {
                let nested = f(elem);
                if nested.is_infinite() {
                    debug!("flat_map: nested {} sequence is infinite", K2::KIND);
                }
                nested.into_source("flat_map")
            }))
        })
    }

    pub fn flat_map_to_obj<U: 'a>(
        self,
        f: impl FnMut(K::Elem) -> ObjSequence<'a, U> + 'a,
    ) -> ObjSequence<'a, U> {
        self.flat_map(f)
    }

    pub fn flat_map_to_int(
        self,
        f: impl FnMut(K::Elem) -> IntSequence<'a> + 'a,
    ) -> IntSequence<'a> {
        self.flat_map(f)
    }

    pub fn flat_map_to_long(
        self,
        f: impl FnMut(K::Elem) -> LongSequence<'a> + 'a,
    ) -> LongSequence<'a> {
        self.flat_map(f)
    }

    pub fn flat_map_to_double(
        self,
        f: impl FnMut(K::Elem) -> DoubleSequence<'a> + 'a,
    ) -> DoubleSequence<'a> {
        self.flat_map(f)
    }

    /// Truncates the sequence to at most its first `max_size` elements.
    ///
    /// Once `max_size` elements have been produced the upstream is never pulled again,
    /// which makes the result finite even for an infinite source.
    pub fn limit(self, max_size: usize) -> Self {
        let mut limited =
            self.derive::<K>("limit", move |source| Box::new(source.take(max_size)));
        limited.infinite = false;
        limited
    }

    /// Discards the first `n` elements.
    pub fn skip(self, n: usize) -> Self {
        let mut remaining = n;
        self.derive::<K>("skip", move |source| {
            Box::new(source.filter(move |item| match item {
                Ok(_) if remaining > 0 => {
                    remaining -= 1;
                    false
                }
                _ => true,
            }))
        })
    }

    /// Keeps the elements for which `predicate` returns `true`.
    pub fn filter(self, mut predicate: impl FnMut(&K::Elem) -> bool + 'a) -> Self {
        self.derive::<K>("filter", move |source| {
            Box::new(source.filter(move |item| match item {
                Ok(value) => predicate(value),
                Err(_) => true,
            }))
        })
    }

    /// Invokes `action` on every element as it is pulled through this stage.
    pub fn peek(self, mut action: impl FnMut(&K::Elem) + 'a) -> Self {
        self.derive::<K>("peek", move |source| {
            Box::new(source.inspect(move |item| {
                if let Ok(value) = item {
                    action(value);
                }
            }))
        })
    }

    // Terminal operations.

    /// Left-to-right fold starting from `identity`; `identity` itself for an empty
    /// sequence.
    pub fn reduce(
        &mut self,
        identity: K::Elem,
        mut accumulator: impl FnMut(K::Elem, K::Elem) -> K::Elem,
    ) -> Result<K::Elem> {
        self.consume("reduce", |source| {
            source.try_fold(identity, |acc, item| item.map(|value| accumulator(acc, value)))
        })
    }

    /// Left-to-right fold seeded with the first element; empty for an empty sequence.
    pub fn reduce_optional(
        &mut self,
        mut accumulator: impl FnMut(K::Elem, K::Elem) -> K::Elem,
    ) -> Result<OptionalValue<K::Elem>> {
        self.consume("reduce_optional", |source| {
            let Some(first) = source.next().transpose()? else {
                return Ok(OptionalValue::empty());
            };
            source
                .try_fold(first, |acc, item| item.map(|value| accumulator(acc, value)))
                .map(OptionalValue::of)
        })
    }

    /// Invokes `consumer` once per element, in order.
    pub fn for_each(&mut self, mut consumer: impl FnMut(K::Elem)) -> Result<()> {
        self.consume("for_each", |source| {
            source.try_for_each(|item| item.map(&mut consumer))
        })
    }

    /// Invokes `consumer` once per element, in order, stopping at the first error it
    /// returns.
    pub fn try_for_each(&mut self, mut consumer: impl FnMut(K::Elem) -> Result<()>) -> Result<()> {
        self.consume("try_for_each", |source| {
            source.try_for_each(|item| item.and_then(&mut consumer))
        })
    }

    /// Materializes the elements into a vector.
    pub fn to_vec(&mut self) -> Result<Vec<K::Elem>> {
        self.consume("to_vec", |source| source.collect())
    }

    pub fn count(&mut self) -> Result<u64> {
        self.consume("count", |source| {
            source.try_fold(0u64, |count, item| item.map(|_| count + 1))
        })
    }

    /// First element, if any. Pulls at most one element.
    pub fn find_first(&mut self) -> Result<OptionalValue<K::Elem>> {
        self.consume("find_first", |source| {
            source.next().transpose().map(OptionalValue::from)
        })
    }

    /// Returns `true` as soon as an element satisfies `predicate`.
    pub fn any_match(&mut self, mut predicate: impl FnMut(&K::Elem) -> bool) -> Result<bool> {
        self.consume("any_match", |source| {
            for item in source {
                if predicate(&item?) {
                    return Ok(true);
                }
            }
            Ok(false)
        })
    }

    /// Returns `false` as soon as an element fails `predicate`.
    pub fn all_match(&mut self, mut predicate: impl FnMut(&K::Elem) -> bool) -> Result<bool> {
        self.consume("all_match", |source| {
            for item in source {
                if !predicate(&item?) {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }

    /// Returns `false` as soon as an element satisfies `predicate`.
    pub fn none_match(&mut self, mut predicate: impl FnMut(&K::Elem) -> bool) -> Result<bool> {
        self.consume("none_match", |source| {
            for item in source {
                if predicate(&item?) {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }
}

impl<'a, K> Sequence<'a, K>
where
    K: Kind,
    K::Elem: NumericValue,
{
    /// Sum of the elements; zero for an empty sequence.
    ///
    /// Integer sums wrap around on overflow.
    pub fn sum(&mut self) -> Result<K::Elem> {
        self.consume("sum", |source| {
            source.try_fold(<K::Elem>::zero(), |acc, item| {
                item.map(|value| acc.accumulate(value))
            })
        })
    }

    /// Arithmetic mean as a double-precision division of the total by the count;
    /// empty for an empty sequence.
    ///
    /// Integer totals are kept exactly (and never wrap), so the only rounding is the
    /// final division.
    pub fn average(&mut self) -> Result<OptionalValue<f64>> {
        self.consume("average", |source| {
            let zero = (0u64, <K::Elem as NumericValue>::TOTAL_ZERO);
            let (count, total) = source.try_fold(zero, |(count, total), item| {
                item.map(|value| (count + 1, NumericValue::add_to_total(total, value)))
            })?;
            Ok(if count == 0 {
                OptionalValue::empty()
            } else {
                let total = <K::Elem as NumericValue>::total_to_f64(total);
                OptionalValue::of(total / count as f64)
            })
        })
    }

    pub fn min(&mut self) -> Result<OptionalValue<K::Elem>> {
        self.consume("min", |source| extreme(source, <K::Elem as NumericValue>::min_of))
    }

    pub fn max(&mut self) -> Result<OptionalValue<K::Elem>> {
        self.consume("max", |source| extreme(source, <K::Elem as NumericValue>::max_of))
    }

    pub fn summary_statistics(&mut self) -> Result<SummaryStatistics<K::Elem>> {
        self.consume("summary_statistics", |source| {
            source.try_fold(SummaryStatistics::new(), |mut stats, item| {
                item.map(|value| {
                    stats.accept(value);
                    stats
                })
            })
        })
    }

    /// Converts every element into an object of the same value.
    pub fn boxed(self) -> ObjSequence<'a, K::Elem> {
        self.map_to_obj(|value| value)
    }
}

fn extreme<T: NumericValue>(
    source: &mut Source<'_, T>,
    pick: fn(T, T) -> T,
) -> Result<OptionalValue<T>> {
    let Some(first) = source.next().transpose()? else {
        return Ok(OptionalValue::empty());
    };
    source
        .try_fold(first, |acc, item| item.map(|value| pick(acc, value)))
        .map(OptionalValue::of)
}

impl<'a> IntSequence<'a> {
    pub fn as_long(self) -> LongSequence<'a> {
        self.map_to_long(i64::from)
    }

    pub fn as_double(self) -> DoubleSequence<'a> {
        self.map_to_double(f64::from)
    }
}

impl<'a> LongSequence<'a> {
    pub fn as_double(self) -> DoubleSequence<'a> {
        self.map_to_double(|value| value as f64)
    }
}

impl<K: Kind> fmt::Debug for Sequence<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("kind", &K::KIND)
            .field("state", &self.state)
            .field("infinite", &self.infinite)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_reduce_and_sum_agree() {
        let mut a = IntSequence::of([3, 1, 4, 1, 5]);
        let mut b = IntSequence::of([3, 1, 4, 1, 5]);
        assert_eq!(a.reduce(0, |x, y| x + y).unwrap(), 14);
        assert_eq!(b.sum().unwrap(), 14);
    }

    #[test]
    fn test_reduce_empty_returns_identity() {
        let mut s = LongSequence::empty();
        assert_eq!(s.reduce(42, |a, b| a * b).unwrap(), 42);
    }

    #[test]
    fn test_reduce_is_left_to_right() {
        let mut s = ObjSequence::of(["a", "b", "c"]).map_to_obj(String::from);
        let joined = s.reduce(String::from(">"), |acc, v| acc + &v).unwrap();
        assert_eq!(joined, ">abc");
    }

    #[test]
    fn test_reduce_optional() {
        let mut s = IntSequence::of([2, 3, 4]);
        assert_eq!(s.reduce_optional(|a, b| a * b).unwrap().get().unwrap(), 24);
        let mut e = IntSequence::empty();
        assert!(e.reduce_optional(|a, b| a * b).unwrap().is_empty());
    }

    #[test]
    fn test_average() {
        let mut s = IntSequence::of([1, 2, 3]);
        assert_eq!(s.average().unwrap().get().unwrap(), 2.0);
        let mut d = DoubleSequence::of([1.0, 2.0]);
        assert_eq!(d.average().unwrap().get().unwrap(), 1.5);
    }

    #[test]
    fn test_average_of_large_longs_divides_exact_total() {
        let values = [9_007_199_254_740_993i64, 1];
        let sum = LongSequence::of(values).sum().unwrap();
        assert_eq!(sum, 9_007_199_254_740_994);
        let avg = LongSequence::of(values).average().unwrap().get().unwrap();
        assert_eq!(avg, sum as f64 / 2.0);
        assert_eq!(avg, 4_503_599_627_370_497.0);

        let mut s = LongSequence::of([i64::MAX, i64::MAX]);
        assert_eq!(s.average().unwrap().get().unwrap(), i64::MAX as f64);
    }

    #[test]
    fn test_average_of_empty_is_empty() {
        let mut s = DoubleSequence::empty();
        let avg = s.average().unwrap();
        assert!(avg.is_empty());
        assert!(avg.get().unwrap_err().is_empty_value());
    }

    #[test]
    fn test_min_max_count() {
        let mut s = LongSequence::of([7, -3, 12]);
        assert_eq!(s.min().unwrap().get().unwrap(), -3);
        let mut s = LongSequence::of([7, -3, 12]);
        assert_eq!(s.max().unwrap().get().unwrap(), 12);
        let mut s = LongSequence::of([7, -3, 12]);
        assert_eq!(s.count().unwrap(), 3);
        assert!(LongSequence::empty().max().unwrap().is_empty());
    }

    #[test]
    fn test_state_transitions() {
        let mut s = IntSequence::of([1, 2]);
        assert_eq!(s.state(), SequenceState::Open);
        s.for_each(|_| ()).unwrap();
        assert_eq!(s.state(), SequenceState::Closed);
    }

    #[test]
    fn test_second_terminal_fails_with_reuse() {
        let mut s = IntSequence::of([1, 2, 3]);
        let mut seen = Vec::new();
        s.for_each(|v| seen.push(v)).unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(s.sum().unwrap_err().is_reuse());
        assert!(s.to_vec().unwrap_err().is_reuse());
    }

    #[test]
    fn test_intermediate_on_closed_handle_is_closed() {
        let mut s = IntSequence::of([1, 2, 3]);
        s.count().unwrap();
        let mut derived = s.map(|v| v * 2);
        assert_eq!(derived.state(), SequenceState::Closed);
        assert!(derived.to_vec().unwrap_err().is_reuse());
    }

    #[test]
    fn test_intermediate_is_lazy() {
        let calls = Cell::new(0);
        let mut s = IntSequence::of([1, 2, 3]).map(|v| {
            calls.set(calls.get() + 1);
            v + 1
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(s.to_vec().unwrap(), vec![2, 3, 4]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_iterate_limit_does_not_overcompute() {
        let steps = Cell::new(0);
        let mut s = DoubleSequence::iterate(0.5, |d| {
            steps.set(steps.get() + 1);
            d / 2.0
        })
        .limit(3);
        assert!(!s.is_infinite());
        assert_eq!(s.to_vec().unwrap(), vec![0.5, 0.25, 0.125]);
        assert_eq!(steps.get(), 2);
    }

    #[test]
    fn test_generate_limit_pulls_exactly_n() {
        let pulls = Cell::new(0);
        let s = IntSequence::generate(|| {
            pulls.set(pulls.get() + 1);
            7
        });
        assert!(s.is_infinite());
        let mut s = s.limit(4);
        assert_eq!(s.to_vec().unwrap(), vec![7; 4]);
        assert_eq!(pulls.get(), 4);
    }

    #[test]
    fn test_limit_zero() {
        let pulls = Cell::new(0);
        let mut s = IntSequence::generate(|| {
            pulls.set(pulls.get() + 1);
            1
        })
        .limit(0);
        assert_eq!(s.count().unwrap(), 0);
        assert_eq!(pulls.get(), 0);
    }

    #[test]
    fn test_map_to_kinds() {
        let mut lengths = ObjSequence::of(["penguin", "fish"]).map_to_int(|s| s.len() as i32);
        assert_eq!(lengths.kind(), ElementKind::Int);
        assert_eq!(lengths.to_vec().unwrap(), vec![7, 4]);

        let mut d = ObjSequence::of(["penguin", "fish"]).map_to_double(|s| s.len() as f64);
        assert_eq!(d.to_vec().unwrap(), vec![7.0, 4.0]);

        let mut l = DoubleSequence::of([7.9, 4.2]).map_to_long(|d| d as i64);
        assert_eq!(l.to_vec().unwrap(), vec![7, 4]);

        let mut o = LongSequence::of([7, 4]).map_to_obj(|v| v.to_string());
        assert_eq!(o.to_vec().unwrap(), vec!["7", "4"]);
    }

    #[test]
    fn test_flat_map_concatenates_in_order() {
        let mut s = IntSequence::range(1, 4).flat_map_to_long(|n| {
            LongSequence::of((0..n).map(move |i| i64::from(n) * 10 + i64::from(i)))
        });
        assert_eq!(s.to_vec().unwrap(), vec![10, 20, 21, 30, 31, 32]);
    }

    #[test]
    fn test_flat_map_releases_nested_before_next() {
        let pulled = Cell::new(0);
        let mut s = IntSequence::of([1, 2])
            .peek(|_| pulled.set(pulled.get() + 1))
            .flat_map_to_int(|n| IntSequence::of([n, n]));
        let mut seen = Vec::new();
        s.for_each(|v| seen.push((v, pulled.get()))).unwrap();
        assert_eq!(seen, vec![(1, 1), (1, 1), (2, 2), (2, 2)]);
    }

    #[test]
    fn test_flat_map_of_consumed_nested_fails() {
        let mut s = IntSequence::of([1]).flat_map_to_int(|n| {
            let mut nested = IntSequence::of([n]);
            nested.count().unwrap();
            nested
        });
        assert!(s.to_vec().unwrap_err().is_reuse());
    }

    #[test]
    fn test_flat_map_over_infinite_with_limit() {
        let mut s = IntSequence::iterate(1, |n| n + 1)
            .flat_map_to_int(|n| IntSequence::of([n, -n]))
            .limit(5);
        assert_eq!(s.to_vec().unwrap(), vec![1, -1, 2, -2, 3]);
    }

    #[test]
    fn test_flat_map_into_infinite_nested_with_limit() {
        let s = IntSequence::of([3, 4])
            .flat_map_to_int(|n| IntSequence::iterate(n, move |v| v + n));
        assert!(!s.is_infinite());
        let mut s = s.limit(4);
        assert_eq!(s.to_vec().unwrap(), vec![3, 6, 9, 12]);

        let s = IntSequence::generate(|| 1).flat_map_to_int(|n| IntSequence::of([n]));
        assert!(s.is_infinite());
        assert!(!s.limit(2).is_infinite());
    }

    #[test]
    fn test_filter_skip_peek() {
        let peeked = Cell::new(0);
        let mut s = IntSequence::range_closed(1, 10)
            .filter(|v| v % 2 == 0)
            .skip(1)
            .peek(|_| peeked.set(peeked.get() + 1));
        assert_eq!(s.to_vec().unwrap(), vec![4, 6, 8, 10]);
        assert_eq!(peeked.get(), 4);
    }

    #[test]
    fn test_short_circuit_terminals_on_infinite() {
        let mut s = LongSequence::iterate(1, |n| n * 2);
        assert!(s.any_match(|&v| v > 1000).unwrap());
        let mut s = LongSequence::iterate(1, |n| n * 2);
        assert!(!s.all_match(|&v| v < 64).unwrap());
        let mut s = LongSequence::iterate(1, |n| n * 2);
        assert_eq!(s.find_first().unwrap().get().unwrap(), 1);
        let mut s = IntSequence::of([1, 3, 5]);
        assert!(s.none_match(|v| v % 2 == 0).unwrap());
    }

    #[test]
    fn test_try_for_each_stops_on_error() {
        let mut seen = Vec::new();
        let mut s = IntSequence::of([1, 2, 3]);
        let err = s
            .try_for_each(|v| {
                if v == 2 {
                    return Err(Error::invalid_operation("stop"));
                }
                seen.push(v);
                Ok(())
            })
            .unwrap_err();
        assert!(!err.is_reuse());
        assert_eq!(seen, vec![1]);
        assert_eq!(s.state(), SequenceState::Closed);
    }

    #[test]
    fn test_boxed_and_widening() {
        let mut boxed = IntSequence::of([1, 2]).boxed();
        assert_eq!(boxed.kind(), ElementKind::Object);
        assert_eq!(boxed.to_vec().unwrap(), vec![1, 2]);

        let mut l = IntSequence::of([i32::MAX, 1]).as_long();
        assert_eq!(l.sum().unwrap(), i64::from(i32::MAX) + 1);

        let mut d = LongSequence::of([1, 2]).as_double();
        assert_eq!(d.to_vec().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_summary_statistics() {
        let mut s = IntSequence::of([4, 8, 15, 16, 23, 42]);
        let stats = s.summary_statistics().unwrap();
        assert_eq!(stats.count(), 6);
        assert_eq!(stats.sum(), 108);
        assert_eq!(stats.min().get().unwrap(), 4);
        assert_eq!(stats.max().get().unwrap(), 42);
        assert_eq!(stats.average().get().unwrap(), 18.0);
    }

    #[test]
    fn test_borrowing_closures() {
        let factor = 3;
        let mut out = Vec::new();
        let mut s = IntSequence::of([1, 2]).map(|v| v * factor);
        s.for_each(|v| out.push(v)).unwrap();
        assert_eq!(out, vec![3, 6]);
    }
}
