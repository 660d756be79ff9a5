//! Element kinds of a sequence.
//!
//! A sequence is homogeneous in exactly one [`ElementKind`]. At the type level the kind
//! is carried by one of the marker types [`Obj`], [`Int`], [`Long`] or [`Double`], each
//! implementing [`Kind`]; the marker fixes the Rust type of the elements, so a mapping
//! function returning the wrong element type is rejected at compile time.
//!
//! The three primitive kinds additionally implement [`NumericValue`] for their element
//! type, which is what enables the numeric reductions (`sum`, `average`, `min`, `max`).

use std::{fmt, marker::PhantomData, ops::Add};

use num_traits::{AsPrimitive, Float, WrappingAdd, Zero};

/// The element's primitive category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Arbitrary (generic) element type.
    Object,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Double-precision float.
    Double,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Object => "object",
            ElementKind::Int => "int",
            ElementKind::Long => "long",
            ElementKind::Double => "double",
        }
    }

    /// Returns `true` for the three primitive numeric kinds.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ElementKind::Object)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-level element kind of a [`Sequence`](crate::sequence::Sequence).
pub trait Kind {
    /// Rust type of the sequence elements.
    type Elem;

    /// Runtime descriptor of this kind.
    const KIND: ElementKind;
}

/// Generic (object) kind over elements of type `T`.
pub struct Obj<T>(PhantomData<fn() -> T>);

/// 32-bit integer kind.
pub enum Int {}

/// 64-bit integer kind.
pub enum Long {}

/// Double-precision float kind.
pub enum Double {}

impl<T> Kind for Obj<T> {
    type Elem = T;
    const KIND: ElementKind = ElementKind::Object;
}

impl Kind for Int {
    type Elem = i32;
    const KIND: ElementKind = ElementKind::Int;
}

impl Kind for Long {
    type Elem = i64;
    const KIND: ElementKind = ElementKind::Long;
}

impl Kind for Double {
    type Elem = f64;
    const KIND: ElementKind = ElementKind::Double;
}

/// Element type of one of the primitive numeric kinds.
pub trait NumericValue:
    Copy
    + PartialOrd
    + Zero
    + Add<Output = Self>
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    const KIND: ElementKind;

    /// Running total behind the mean: exact `i128` for integers, `f64` for floats.
    type Total: Copy + PartialEq + fmt::Debug + AsPrimitive<f64>;

    const TOTAL_ZERO: Self::Total;

    fn add_to_total(total: Self::Total, value: Self) -> Self::Total;

    fn merge_totals(a: Self::Total, b: Self::Total) -> Self::Total;

    #[inline]
    fn total_to_f64(total: Self::Total) -> f64 {
        total.as_()
    }

    /// Adds `other` to `self` the way a running total does for this kind:
    /// two's complement wrap-around for integers, IEEE 754 addition for floats.
    fn accumulate(self, other: Self) -> Self;

    /// Smaller of the two values. For floats a NaN operand yields NaN.
    fn min_of(self, other: Self) -> Self;

    /// Larger of the two values. For floats a NaN operand yields NaN.
    fn max_of(self, other: Self) -> Self;
}

macro_rules! impl_integer_value {
    ($T:ty, $kind:ident) => {
        impl NumericValue for $T {
            const KIND: ElementKind = ElementKind::$kind;

            type Total = i128;

            const TOTAL_ZERO: i128 = 0;

            #[inline]
            fn add_to_total(total: i128, value: Self) -> i128 {
                total.wrapping_add(i128::from(value))
            }

            #[inline]
            fn merge_totals(a: i128, b: i128) -> i128 {
                a.wrapping_add(b)
            }

            #[inline]
            fn accumulate(self, other: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &other)
            }

            #[inline]
            fn min_of(self, other: Self) -> Self {
                Ord::min(self, other)
            }

            #[inline]
            fn max_of(self, other: Self) -> Self {
                Ord::max(self, other)
            }
        }
    };
}

macro_rules! impl_float_value {
    ($T:ty, $kind:ident) => {
        impl NumericValue for $T {
            const KIND: ElementKind = ElementKind::$kind;

            type Total = $T;

            const TOTAL_ZERO: $T = 0.0;

            #[inline]
            fn add_to_total(total: $T, value: Self) -> $T {
                total + value
            }

            #[inline]
            fn merge_totals(a: $T, b: $T) -> $T {
                a + b
            }

            #[inline]
            fn accumulate(self, other: Self) -> Self {
                self + other
            }

            #[inline]
            fn min_of(self, other: Self) -> Self {
                if Float::is_nan(self) || Float::is_nan(other) {
                    <$T>::NAN
                } else {
                    Float::min(self, other)
                }
            }

            #[inline]
            fn max_of(self, other: Self) -> Self {
                if Float::is_nan(self) || Float::is_nan(other) {
                    <$T>::NAN
                } else {
                    Float::max(self, other)
                }
            }
        }
    };
}

impl_integer_value!(i32, Int);
impl_integer_value!(i64, Long);
impl_float_value!(f64, Double);
