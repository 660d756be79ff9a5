//! Lazy, single-pass numeric sequences.
//!
//! This crate provides a small family of lazily produced sequences over three
//! primitive numeric kinds (32-bit integer, 64-bit integer, double-precision float)
//! plus a generic sequence over arbitrary element types, together with conversion,
//! reduction and generation operations.
//!
//! # Core Concepts
//!
//! ## Sequences
//!
//! A [`Sequence`] is parameterized by its element [`Kind`]: one of the marker types
//! [`Obj<T>`](kind::Obj), [`Int`](kind::Int), [`Long`](kind::Long) or
//! [`Double`](kind::Double). The aliases [`ObjSequence`], [`IntSequence`],
//! [`LongSequence`] and [`DoubleSequence`] name the four flavors.
//!
//! A sequence is either *finite* (an explicit list of values, a range) or *infinite*
//! (a supplier function, or a seed plus a step function). Infinite sequences must be
//! truncated with [`Sequence::limit`] (or consumed by a short-circuiting terminal)
//! before they are materialized.
//!
//! ## Laziness and Single Use
//!
//! Intermediate operations record a stage and return a new handle; terminal
//! operations drive evaluation by pulling elements through the chain. A handle can be
//! consumed once; a second terminal operation fails with a `Reuse` error.
//!
//! ## Runtime Kinds
//!
//! [`AnySequence`] wraps the four flavors in a tagged union for code that selects the
//! element kind at runtime; its conversions are checked per element and fail with a
//! `TypeMismatch` error.
//!
//! # Example
//!
//! ```
//! use numseq::{DoubleSequence, IntSequence, ObjSequence};
//!
//! let mut lengths = ObjSequence::of(["penguin", "fish"]).map_to_int(|s| s.len() as i32);
//! assert_eq!(lengths.to_vec().unwrap(), vec![7, 4]);
//!
//! let mut fractions = DoubleSequence::iterate(0.5, |d| d / 2.0).limit(3);
//! assert_eq!(fractions.to_vec().unwrap(), vec![0.5, 0.25, 0.125]);
//!
//! let avg = IntSequence::of([1, 2, 3]).average().unwrap();
//! assert_eq!(avg.get().unwrap(), 2.0);
//! ```

mod adapters;
pub mod any_sequence;
pub mod kind;
pub mod optional;
pub mod random;
pub mod range;
pub mod sequence;
pub mod stats;
pub mod walkthrough;

pub use any_sequence::{AnySequence, Value};
pub use kind::{ElementKind, Kind, NumericValue};
pub use numseq_common::{
    Result,
    error::{Error, ErrorKind},
};
pub use optional::OptionalValue;
pub use sequence::{
    DoubleSequence, IntSequence, LongSequence, ObjSequence, Sequence, SequenceState,
};
pub use stats::SummaryStatistics;
