//! Iterator adapters backing the sequence stages that the standard library does not
//! provide in the required shape.

use numseq_common::{Result, try_or_ret_some_err};

/// Boxed, single-pass stage of a sequence pipeline.
pub(crate) type Source<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Infinite iterator yielding `seed, step(seed), step(step(seed)), ...`.
///
/// Element `n` is computed only when it is pulled: after yielding element `n` the
/// adapter holds a copy of it, and `step` runs on the next call to `next()`.
pub(crate) struct Iterate<T, F> {
    seed: Option<T>,
    last: Option<T>,
    step: F,
}

impl<T, F> Iterate<T, F> {
    pub fn new(seed: T, step: F) -> Self {
        Iterate {
            seed: Some(seed),
            last: None,
            step,
        }
    }
}

impl<T, F> Iterator for Iterate<T, F>
where
    T: Clone,
    F: FnMut(T) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = match self.seed.take() {
            Some(seed) => seed,
            None => (self.step)(self.last.take()?),
        };
        self.last = Some(value.clone());
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Expands every upstream element into a nested source and concatenates the nested
/// sources in upstream order.
///
/// Each nested source is fully drained and dropped before the next upstream element
/// is pulled. An expansion that fails (for instance because the nested sequence was
/// already consumed) surfaces as an error item.
pub(crate) struct FlattenSources<'a, T, U, F> {
    upstream: Source<'a, T>,
    current: Option<Source<'a, U>>,
    expand: F,
}

impl<'a, T, U, F> FlattenSources<'a, T, U, F>
where
    F: FnMut(T) -> Result<Source<'a, U>>,
{
    pub fn new(upstream: Source<'a, T>, expand: F) -> Self {
        FlattenSources {
            upstream,
            current: None,
            expand,
        }
    }
}

impl<'a, T, U, F> Iterator for FlattenSources<'a, T, U, F>
where
    F: FnMut(T) -> Result<Source<'a, U>>,
{
    type Item = Result<U>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(item) => return Some(item),
                    None => self.current = None,
                }
            }
            let elem = try_or_ret_some_err!(self.upstream.next()?);
            self.current = Some(try_or_ret_some_err!((self.expand)(elem)));
        }
    }
}
