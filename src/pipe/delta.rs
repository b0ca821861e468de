use crate::stage::{OutputCollector, Stage};
use bytemuck::Pod;
use fxhash::FxHashMap;
use std::marker::PhantomData;

/// Compares the current item with the previous item associated with the same key.
///
/// The logic closure sees `None` as the previous value for the first item of a key,
/// which is how stages drop a leading record that has nothing to diff against.
pub struct Delta<K, T, Out, F, L> {
    key_fn: F,
    logic: L,
    last_values: FxHashMap<K, T>,
    _phantom: PhantomData<(T, Out)>,
}

impl<K, T, Out, F, L> Delta<K, T, Out, F, L>
where
    K: std::hash::Hash + Eq,
    T: Pod,
    Out: Pod,
    F: FnMut(&T) -> K,
    L: FnMut(&T, Option<T>) -> Option<Out>,
{
    pub fn new(key_fn: F, logic: L) -> Self {
        Self {
            key_fn,
            logic,
            last_values: FxHashMap::default(),
            _phantom: PhantomData,
        }
    }
}

impl<K, T, Out, F, L> Stage<T, Out> for Delta<K, T, Out, F, L>
where
    K: std::hash::Hash + Eq,
    T: Pod,
    Out: Pod,
    F: FnMut(&T) -> K,
    L: FnMut(&T, Option<T>) -> Option<Out>,
{
    #[inline(always)]
    fn process<C>(&mut self, curr: &T, collector: &mut C)
    where
        C: OutputCollector<Out>,
    {
        let key = (self.key_fn)(curr);
        let prev = self.last_values.insert(key, *curr);
        if let Some(out) = (self.logic)(curr, prev) {
            collector.push(&out);
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn delta<K, T, Out>(
    key_fn: impl FnMut(&T) -> K,
    logic: impl FnMut(&T, Option<T>) -> Option<Out>,
) -> Delta<K, T, Out, impl FnMut(&T) -> K, impl FnMut(&T, Option<T>) -> Option<Out>>
where
    K: std::hash::Hash + Eq,
    T: Pod,
    Out: Pod,
{
    Delta::new(key_fn, logic)
}
