//! A guided tour of the sequence API that writes its results, line by line, into a
//! caller-supplied sink.
//!
//! The tour covers reductions, the double-precision constructors, infinite sources
//! truncated by `limit`, integer ranges, conversions between the four element kinds and
//! flattening. Consecutive blocks of output are separated by one empty line.
//!
//! The sink is the only I/O boundary and is written solely from the consumer of a
//! `try_for_each` terminal. Results of other terminals (a reduction, a materialized
//! vector) are formatted first and then emitted as a sequence of lines. A failing sink
//! aborts the tour with an `Io` error.

use std::{fmt, io::Write};

use numseq_common::{Result, error::Error};

use crate::{
    kind::Kind,
    sequence::{DoubleSequence, IntSequence, LongSequence, ObjSequence, Sequence},
};

/// Parameters of [`run`].
#[derive(Debug, Clone)]
pub struct WalkthroughOptions {
    /// Seed for the random sources; `None` draws from the thread-local generator.
    pub seed: Option<u64>,
    /// Number of values taken from each random source.
    pub random_count: usize,
}

impl Default for WalkthroughOptions {
    fn default() -> Self {
        WalkthroughOptions {
            seed: None,
            random_count: 3,
        }
    }
}

/// Writes the whole tour into `out`.
pub fn run<W: Write>(out: &mut W, options: &WalkthroughOptions) -> Result<()> {
    let blocks: [fn(&mut Printer<'_, W>, &WalkthroughOptions) -> Result<()>; 11] = [
        reductions,
        single_double,
        several_doubles,
        random_doubles,
        fractions,
        random_ints,
        counting,
        range,
        range_closed,
        conversions,
        flattening,
    ];
    let mut printer = Printer { out };
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            printer.blank()?;
        }
        block(&mut printer, options)?;
    }
    printer.out.flush().map_err(|e| Error::io("walkthrough", e))
}

struct Printer<'w, W: Write> {
    out: &'w mut W,
}

impl<W: Write> Printer<'_, W> {
    fn write_line(out: &mut W, line: impl fmt::Display) -> Result<()> {
        writeln!(out, "{line}").map_err(|e| Error::io("walkthrough", e))
    }

    /// Prints every element of `sequence` on its own line.
    fn each<'s, K>(&mut self, sequence: &mut Sequence<'s, K>) -> Result<()>
    where
        K: Kind,
        K::Elem: fmt::Debug + 's,
    {
        let out = &mut *self.out;
        sequence.try_for_each(|value| Self::write_line(out, format_args!("{value:?}")))
    }

    /// Prints the given lines, one per element of a sequence over them.
    fn lines<I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'static,
    {
        let out = &mut *self.out;
        ObjSequence::of(lines).try_for_each(|line| Self::write_line(out, line))
    }

    fn line(&mut self, value: impl fmt::Display) -> Result<()> {
        self.lines([value.to_string()])
    }

    fn blank(&mut self) -> Result<()> {
        self.line("")
    }

    /// Prints all elements of `sequence` on one line.
    fn all<'s, K>(&mut self, label: &str, sequence: &mut Sequence<'s, K>) -> Result<()>
    where
        K: Kind,
        K::Elem: fmt::Debug + 's,
    {
        let values = sequence.to_vec()?;
        self.line(format_args!("{label}: {values:?}"))
    }
}

fn reductions<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    let mut boxed = ObjSequence::of([1, 2, 3]);
    let reduced = boxed.reduce(0, |a, b| a + b)?;

    let mut unboxed = ObjSequence::of([1, 2, 3]).map_to_int(|x| x);
    let summed = unboxed.sum()?;

    let avg = IntSequence::of([1, 2, 3]).average()?;
    p.lines([
        reduced.to_string(),
        summed.to_string(),
        avg.to_string(),
        format!("{:?}", avg.get()?),
    ])
}

#[allow(clippy::approx_constant)]
fn single_double<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    p.each(&mut DoubleSequence::of([3.14]))
}

fn several_doubles<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    p.each(&mut DoubleSequence::of([1.0, 1.1, 1.2]))
}

fn random_doubles<W: Write>(p: &mut Printer<'_, W>, options: &WalkthroughOptions) -> Result<()> {
    let random = match options.seed {
        Some(seed) => DoubleSequence::random_seeded(seed),
        None => DoubleSequence::random(),
    };
    p.each(&mut random.limit(options.random_count))
}

fn fractions<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    p.each(&mut DoubleSequence::iterate(0.5, |d| d / 2.0).limit(3))
}

fn random_ints<W: Write>(p: &mut Printer<'_, W>, options: &WalkthroughOptions) -> Result<()> {
    let random = match options.seed {
        Some(seed) => IntSequence::random_seeded(seed.wrapping_add(1)),
        None => IntSequence::random(),
    };
    p.each(&mut random.limit(options.random_count))
}

fn counting<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    p.each(&mut IntSequence::iterate(1, |n| n + 1).limit(5))
}

fn range<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    p.each(&mut IntSequence::range(1, 6))
}

fn range_closed<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    p.each(&mut IntSequence::range_closed(1, 5))
}

fn animals() -> ObjSequence<'static, &'static str> {
    ObjSequence::of(["penguin", "fish"])
}

fn conversions<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    let int_lengths = || animals().map_to_int(|s| s.len() as i32);
    let double_lengths = || animals().map_to_double(|s| s.len() as f64);
    let long_lengths = || animals().map_to_long(|s| s.len() as i64);

    p.all("object -> object", &mut animals().map(|s| s))?;

    p.all("object -> int", &mut int_lengths())?;
    p.all("int -> int", &mut int_lengths().map(|v| v))?;
    p.all("int -> object", &mut int_lengths().map_to_obj(|v| v))?;
    p.all("int -> double", &mut int_lengths().map_to_double(f64::from))?;
    p.all("int -> long", &mut int_lengths().map_to_long(i64::from))?;

    p.all("object -> double", &mut double_lengths())?;
    p.all("double -> double", &mut double_lengths().map(|v| v))?;
    p.all("double -> object", &mut double_lengths().map_to_obj(|v| v))?;
    p.all("double -> int", &mut double_lengths().map_to_int(|v| v as i32))?;
    p.all("double -> long", &mut double_lengths().map_to_long(|v| v as i64))?;

    p.all("object -> long", &mut long_lengths())?;
    p.all("long -> long", &mut long_lengths().map(|v| v))?;
    p.all("long -> object", &mut long_lengths().map_to_obj(|v| v))?;
    p.all("long -> int", &mut long_lengths().map_to_int(|v| v as i32))?;
    p.all("long -> double", &mut long_lengths().map_to_double(|v| v as f64))
}

fn flattening<W: Write>(p: &mut Printer<'_, W>, _: &WalkthroughOptions) -> Result<()> {
    let list = [1];
    let stream = || ObjSequence::of(list);

    p.all(
        "flat_map_to_int",
        &mut stream().flat_map_to_int(|y| IntSequence::of([y])),
    )?;
    p.all(
        "flat_map_to_double",
        &mut stream().flat_map_to_double(|y| DoubleSequence::of([f64::from(y)])),
    )?;
    p.all(
        "flat_map_to_long",
        &mut stream().flat_map_to_long(|y| LongSequence::of([i64::from(y)])),
    )
}
