//! Infinite sequences of independent random draws.
//!
//! The unseeded constructors draw from the thread-local `fastrand` generator; the
//! `*_seeded` constructors own a generator seeded with the given value, so the same
//! seed reproduces the same sequence.

use numseq_common::{Result, verify_arg};

use crate::sequence::{DoubleSequence, IntSequence, LongSequence};

impl<'a> DoubleSequence<'a> {
    /// Infinite sequence of draws uniformly distributed in `[0, 1)`.
    pub fn random() -> Self {
        Self::generate(fastrand::f64)
    }

    pub fn random_seeded(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        Self::generate(move || rng.f64())
    }
}

impl<'a> IntSequence<'a> {
    /// Infinite sequence of draws over the whole `i32` range.
    pub fn random() -> Self {
        Self::generate(|| fastrand::i32(..))
    }

    pub fn random_seeded(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        Self::generate(move || rng.i32(..))
    }

    /// Infinite sequence of draws in `[origin, bound)`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `origin >= bound`.
    pub fn random_in(origin: i32, bound: i32) -> Result<Self> {
        verify_arg!(bound, origin < bound);
        Ok(Self::generate(move || fastrand::i32(origin..bound)))
    }

    pub fn random_in_seeded(origin: i32, bound: i32, seed: u64) -> Result<Self> {
        verify_arg!(bound, origin < bound);
        let mut rng = fastrand::Rng::with_seed(seed);
        Ok(Self::generate(move || rng.i32(origin..bound)))
    }
}

impl<'a> LongSequence<'a> {
    /// Infinite sequence of draws over the whole `i64` range.
    pub fn random() -> Self {
        Self::generate(|| fastrand::i64(..))
    }

    pub fn random_seeded(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        Self::generate(move || rng.i64(..))
    }
}

#[cfg(test)]
mod tests {
    use numseq_common::error::ErrorKind;

    use crate::sequence::{DoubleSequence, IntSequence, LongSequence};

    #[test]
    fn test_random_doubles_in_unit_interval() {
        let mut s = DoubleSequence::random().limit(100);
        assert!(!s.is_infinite());
        assert!(s.all_match(|&d| (0.0..1.0).contains(&d)).unwrap());
    }

    #[test]
    fn test_seeded_sequences_repeat() {
        let a = IntSequence::random_seeded(2985745485).limit(8).to_vec().unwrap();
        let b = IntSequence::random_seeded(2985745485).limit(8).to_vec().unwrap();
        assert_eq!(a, b);

        let a = LongSequence::random_seeded(17).limit(4).to_vec().unwrap();
        let b = LongSequence::random_seeded(17).limit(4).to_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_in_bounds() {
        let mut s = IntSequence::random_in(-3, 4).unwrap().limit(200);
        assert!(s.all_match(|v| (-3..4).contains(v)).unwrap());

        let mut s = IntSequence::random_in_seeded(10, 11, 5).unwrap().limit(3);
        assert_eq!(s.to_vec().unwrap(), vec![10, 10, 10]);
    }

    #[test]
    fn test_random_in_rejects_empty_bounds() {
        let err = IntSequence::random_in(5, 5).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn test_random_is_infinite() {
        assert!(DoubleSequence::random().is_infinite());
        assert!(LongSequence::random().is_infinite());
    }
}
