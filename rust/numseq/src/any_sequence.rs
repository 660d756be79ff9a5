//! Sequences whose element kind is known only at runtime.
//!
//! [`AnySequence`] is a tagged union over the four kind-specific sequence handles. Its
//! elements are exchanged as [`Value`]s, and conversions to a numeric kind are checked
//! element by element: a mapping function that produces a value of another kind makes
//! the terminal operation fail with a `TypeMismatch` error.

use std::fmt;

use numseq_common::{Result, error::Error};

use crate::{
    kind::{Double, ElementKind, Int, Long},
    optional::OptionalValue,
    sequence::{DoubleSequence, IntSequence, LongSequence, ObjSequence},
};

/// A single element of a runtime-kinded sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Double(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> ElementKind {
        match self {
            Value::Int(_) => ElementKind::Int,
            Value::Long(_) => ElementKind::Long,
            Value::Double(_) => ElementKind::Double,
            Value::Text(_) => ElementKind::Object,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

macro_rules! impl_try_from_value {
    ($T:ty, $variant:ident) => {
        impl TryFrom<Value> for $T {
            type Error = Error;

            fn try_from(value: Value) -> Result<$T> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(Error::type_mismatch(
                        ElementKind::$variant.name(),
                        other.kind().name(),
                    )),
                }
            }
        }
    };
}

impl_try_from_value!(i32, Int);
impl_try_from_value!(i64, Long);
impl_try_from_value!(f64, Double);

/// Sequence of one of the four element kinds, selected at runtime.
pub enum AnySequence<'a> {
    Object(ObjSequence<'a, Value>),
    Int(IntSequence<'a>),
    Long(LongSequence<'a>),
    Double(DoubleSequence<'a>),
}

impl<'a> AnySequence<'a> {
    /// Zero-length sequence of the given kind.
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Object => AnySequence::Object(ObjSequence::empty()),
            ElementKind::Int => AnySequence::Int(IntSequence::empty()),
            ElementKind::Long => AnySequence::Long(LongSequence::empty()),
            ElementKind::Double => AnySequence::Double(DoubleSequence::empty()),
        }
    }

    /// Finite object sequence over the given values.
    pub fn of_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'a,
    {
        AnySequence::Object(ObjSequence::of(values))
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            AnySequence::Object(_) => ElementKind::Object,
            AnySequence::Int(_) => ElementKind::Int,
            AnySequence::Long(_) => ElementKind::Long,
            AnySequence::Double(_) => ElementKind::Double,
        }
    }

    pub fn is_infinite(&self) -> bool {
        match self {
            AnySequence::Object(s) => s.is_infinite(),
            AnySequence::Int(s) => s.is_infinite(),
            AnySequence::Long(s) => s.is_infinite(),
            AnySequence::Double(s) => s.is_infinite(),
        }
    }

    pub fn limit(self, max_size: usize) -> Self {
        match self {
            AnySequence::Object(s) => AnySequence::Object(s.limit(max_size)),
            AnySequence::Int(s) => AnySequence::Int(s.limit(max_size)),
            AnySequence::Long(s) => AnySequence::Long(s.limit(max_size)),
            AnySequence::Double(s) => AnySequence::Double(s.limit(max_size)),
        }
    }

    /// Views the elements as [`Value`]s, whatever the kind.
    fn into_values(self) -> ObjSequence<'a, Value> {
        match self {
            AnySequence::Object(s) => s,
            AnySequence::Int(s) => s.map_to_obj(Value::Int),
            AnySequence::Long(s) => s.map_to_obj(Value::Long),
            AnySequence::Double(s) => s.map_to_obj(Value::Double),
        }
    }

    /// Element-wise transform into a sequence of kind `kind`.
    ///
    /// For a numeric destination every value returned by `f` must be of that kind;
    /// the first one that is not fails the terminal operation with `TypeMismatch`.
    /// An object destination accepts values of any kind.
    pub fn map_to_kind(self, kind: ElementKind, f: impl FnMut(Value) -> Value + 'a) -> Self {
        let values = self.into_values().map(f);
        match kind {
            ElementKind::Object => AnySequence::Object(values),
            ElementKind::Int => AnySequence::Int(values.try_map_to::<Int>(i32::try_from)),
            ElementKind::Long => AnySequence::Long(values.try_map_to::<Long>(i64::try_from)),
            ElementKind::Double => {
                AnySequence::Double(values.try_map_to::<Double>(f64::try_from))
            }
        }
    }

    /// Sum of a numeric sequence.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for an object sequence.
    pub fn sum(&mut self) -> Result<Value> {
        match self {
            AnySequence::Object(_) => Err(Error::invalid_operation("sum of object sequence")),
            AnySequence::Int(s) => s.sum().map(Value::Int),
            AnySequence::Long(s) => s.sum().map(Value::Long),
            AnySequence::Double(s) => s.sum().map(Value::Double),
        }
    }

    /// Average of a numeric sequence; empty for an empty sequence.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for an object sequence.
    pub fn average(&mut self) -> Result<OptionalValue<f64>> {
        match self {
            AnySequence::Object(_) => {
                Err(Error::invalid_operation("average of object sequence"))
            }
            AnySequence::Int(s) => s.average(),
            AnySequence::Long(s) => s.average(),
            AnySequence::Double(s) => s.average(),
        }
    }

    pub fn count(&mut self) -> Result<u64> {
        match self {
            AnySequence::Object(s) => s.count(),
            AnySequence::Int(s) => s.count(),
            AnySequence::Long(s) => s.count(),
            AnySequence::Double(s) => s.count(),
        }
    }

    /// Materializes the elements as [`Value`]s.
    pub fn to_values(&mut self) -> Result<Vec<Value>> {
        Ok(match self {
            AnySequence::Object(s) => s.to_vec()?,
            AnySequence::Int(s) => s.to_vec()?.into_iter().map(Value::Int).collect(),
            AnySequence::Long(s) => s.to_vec()?.into_iter().map(Value::Long).collect(),
            AnySequence::Double(s) => s.to_vec()?.into_iter().map(Value::Double).collect(),
        })
    }

    pub fn into_object(self) -> Result<ObjSequence<'a, Value>> {
        match self {
            AnySequence::Object(s) => Ok(s),
            other => Err(mismatch(ElementKind::Object, other.kind())),
        }
    }

    pub fn into_int(self) -> Result<IntSequence<'a>> {
        match self {
            AnySequence::Int(s) => Ok(s),
            other => Err(mismatch(ElementKind::Int, other.kind())),
        }
    }

    pub fn into_long(self) -> Result<LongSequence<'a>> {
        match self {
            AnySequence::Long(s) => Ok(s),
            other => Err(mismatch(ElementKind::Long, other.kind())),
        }
    }

    pub fn into_double(self) -> Result<DoubleSequence<'a>> {
        match self {
            AnySequence::Double(s) => Ok(s),
            other => Err(mismatch(ElementKind::Double, other.kind())),
        }
    }
}

fn mismatch(expected: ElementKind, actual: ElementKind) -> Error {
    Error::type_mismatch(expected.name(), actual.name())
}

impl<'a> From<ObjSequence<'a, Value>> for AnySequence<'a> {
    fn from(sequence: ObjSequence<'a, Value>) -> Self {
        AnySequence::Object(sequence)
    }
}

impl<'a> From<IntSequence<'a>> for AnySequence<'a> {
    fn from(sequence: IntSequence<'a>) -> Self {
        AnySequence::Int(sequence)
    }
}

impl<'a> From<LongSequence<'a>> for AnySequence<'a> {
    fn from(sequence: LongSequence<'a>) -> Self {
        AnySequence::Long(sequence)
    }
}

impl<'a> From<DoubleSequence<'a>> for AnySequence<'a> {
    fn from(sequence: DoubleSequence<'a>) -> Self {
        AnySequence::Double(sequence)
    }
}

impl fmt::Debug for AnySequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnySequence::Object(s) => fmt::Debug::fmt(s, f),
            AnySequence::Int(s) => fmt::Debug::fmt(s, f),
            AnySequence::Long(s) => fmt::Debug::fmt(s, f),
            AnySequence::Double(s) => fmt::Debug::fmt(s, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use numseq_common::error::ErrorKind;

    use super::*;

    #[test]
    fn test_empty_of_each_kind() {
        for kind in [
            ElementKind::Object,
            ElementKind::Int,
            ElementKind::Long,
            ElementKind::Double,
        ] {
            let mut s = AnySequence::empty(kind);
            assert_eq!(s.kind(), kind);
            assert_eq!(s.count().unwrap(), 0);
        }
    }

    #[test]
    fn test_text_lengths_to_int() {
        let mut s = AnySequence::of_values(["penguin", "fish"].map(Value::from))
            .map_to_kind(ElementKind::Int, |v| match v {
                Value::Text(s) => Value::Int(s.len() as i32),
                other => other,
            });
        assert_eq!(s.kind(), ElementKind::Int);
        assert_eq!(s.to_values().unwrap(), vec![Value::Int(7), Value::Int(4)]);
    }

    #[test]
    fn test_map_to_kind_mismatch() {
        let mut s = AnySequence::from(IntSequence::of([1, 2]))
            .map_to_kind(ElementKind::Long, |v| match v {
                Value::Int(i) => Value::Double(f64::from(i)),
                other => other,
            });
        let err = s.sum().unwrap_err();
        match err.kind() {
            ErrorKind::TypeMismatch { expected, actual } => {
                assert_eq!(expected, "long");
                assert_eq!(actual, "double");
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_map_to_object_accepts_any_value() {
        let mut s = AnySequence::from(DoubleSequence::of([1.5]))
            .map_to_kind(ElementKind::Object, |v| Value::Text(v.to_string()));
        assert_eq!(s.to_values().unwrap(), vec![Value::from("1.5")]);
    }

    #[test]
    fn test_sum_and_average() {
        let mut s = AnySequence::from(LongSequence::range_closed(1, 4));
        assert_eq!(s.sum().unwrap(), Value::Long(10));

        let mut s = AnySequence::from(IntSequence::of([1, 2, 3]));
        assert_eq!(s.average().unwrap().get().unwrap(), 2.0);

        let mut s = AnySequence::of_values([Value::Int(1)]);
        assert!(matches!(
            s.sum().unwrap_err().kind(),
            ErrorKind::InvalidOperation { .. }
        ));
    }

    #[test]
    fn test_downcasts() {
        let s = AnySequence::from(IntSequence::of([3]));
        assert!(s.into_double().unwrap_err().is_type_mismatch());

        let mut s = AnySequence::from(IntSequence::of([3])).into_int().unwrap();
        assert_eq!(s.to_vec().unwrap(), vec![3]);
    }

    #[test]
    fn test_limit_infinite() {
        let s = AnySequence::from(DoubleSequence::iterate(1.0, |d| d * 10.0));
        assert!(s.is_infinite());
        let mut s = s.limit(3);
        assert!(!s.is_infinite());
        assert_eq!(
            s.to_values().unwrap(),
            vec![Value::Double(1.0), Value::Double(10.0), Value::Double(100.0)]
        );
    }

    #[test]
    fn test_reuse_through_union() {
        let mut s = AnySequence::from(IntSequence::of([1]));
        s.count().unwrap();
        assert!(s.to_values().unwrap_err().is_reuse());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::Long(-4).to_string(), "-4");
        assert_eq!(Value::from("fish").to_string(), "fish");
    }
}
