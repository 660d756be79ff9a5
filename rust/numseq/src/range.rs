//! Ascending integer ranges as finite sequences.

use crate::kind::{Int, Long};
use crate::sequence::Sequence;

macro_rules! impl_integer_ranges {
    ($kind:ty, $T:ty) => {
        impl<'a> Sequence<'a, $kind> {
            /// Ascending sequence `start, start + 1, ..., end - 1`.
            ///
            /// Empty when `start >= end`.
            pub fn range(start: $T, end: $T) -> Self {
                Self::from_values(start..end, false)
            }

            /// Ascending sequence `start, start + 1, ..., end`.
            ///
            /// Empty when `start > end`. `end` may be the maximum value of the type.
            pub fn range_closed(start: $T, end: $T) -> Self {
                Self::from_values(start..=end, false)
            }
        }
    };
}

impl_integer_ranges!(Int, i32);
impl_integer_ranges!(Long, i64);
