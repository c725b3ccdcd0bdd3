/// Everything a node operation needs besides the node itself: how to read key bits and
/// how to build nodes.
///
/// A tree owns its context and lends it to every operation, so trees with different
/// key types or factories never share state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Context<A, F> {
    analyzer: A,
    factory: F,
}

impl<A, F> Context<A, F> {
    pub fn new(analyzer: A, factory: F) -> Self {
        Self { analyzer, factory }
    }

    #[inline]
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    #[inline]
    pub fn factory(&self) -> &F {
        &self.factory
    }
}
