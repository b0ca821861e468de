use bytemuck::Pod;
use std::marker::PhantomData;

/// A synchronous per-record processing step.
///
/// A stage receives one record at a time and may push zero, one or many records
/// downstream through the collector. Stages keep whatever state they need between
/// records (previous value, running counters), so a whole series is processed by
/// feeding it through in timestamp order.
pub trait Stage<In: Pod, Out: Pod> {
    fn process<C>(&mut self, data: &In, collector: &mut C)
    where
        C: OutputCollector<Out>;
}

pub trait OutputCollector<T> {
    fn push(&mut self, item: &T);
}

impl<T, F> OutputCollector<T> for F
where
    F: FnMut(&T),
{
    #[inline(always)]
    fn push(&mut self, item: &T) {
        (self)(item);
    }
}

impl<F, In, Out> Stage<In, Out> for F
where
    F: FnMut(&In) -> Option<Out>,
    In: Pod,
    Out: Pod,
{
    #[inline(always)]
    fn process<C>(&mut self, data: &In, collector: &mut C)
    where
        C: OutputCollector<Out>,
    {
        if let Some(out) = (self)(data) {
            collector.push(&out);
        }
    }
}

pub struct Pipeline<S1, S2, In, Mid, Out> {
    s1: S1,
    s2: S2,
    _phantom: PhantomData<(In, Mid, Out)>,
}

impl<In, Mid, Out, S1, S2> Stage<In, Out> for Pipeline<S1, S2, In, Mid, Out>
where
    In: Pod,
    Mid: Pod,
    Out: Pod,
    S1: Stage<In, Mid>,
    S2: Stage<Mid, Out>,
{
    #[inline(always)]
    fn process<C>(&mut self, data: &In, collector: &mut C)
    where
        C: OutputCollector<Out>,
    {
        self.s1.process(data, &mut |mid: &Mid| {
            self.s2.process(mid, collector);
        });
    }
}

pub trait StageExt<In: Pod, Mid: Pod>: Stage<In, Mid> {
    #[inline(always)]
    fn pipe<Out: Pod, S2: Stage<Mid, Out>>(self, s2: S2) -> Pipeline<Self, S2, In, Mid, Out>
    where
        Self: Sized,
    {
        Pipeline {
            s1: self,
            s2,
            _phantom: PhantomData,
        }
    }

    /// Runs every record of `input` through the stage and collects the output.
    fn run_all<'a>(&mut self, input: impl IntoIterator<Item = &'a In>) -> Vec<Mid>
    where
        Self: Sized,
        In: 'a,
    {
        let mut out = Vec::new();
        for item in input {
            self.process(item, &mut |res: &Mid| out.push(*res));
        }
        out
    }
}

impl<S, In, Mid> StageExt<In, Mid> for S
where
    In: Pod,
    Mid: Pod,
    S: Stage<In, Mid>,
{
}
