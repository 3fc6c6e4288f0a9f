/// Settings of a circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitConfig {
    /// Maximum depth of a propagation before giving up
    ///
    /// A pin's destinations, and the outputs of the nodes listening to it, are one step deeper than
    /// the pin itself. Steps are kept on the heap, so the limit can be much larger than what the call
    /// stack allows. Reaching it means that a feedback loop most likely does not settle.
    pub max_depth: usize,
}

impl CircuitConfig {
    /// Default limit on propagation depth
    pub const DEFAULT_MAX_DEPTH: usize = 1 << 20;

    /// Set the maximum propagation depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        assert!(max_depth > 0);
        self.max_depth = max_depth;
        self
    }
}

impl Default for CircuitConfig {
    fn default() -> Self {
        CircuitConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
