//! Engine configuration.

/// Options controlling how the engine treats gaps and repeated work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Fail on a pair of primitive fields with no declared OPE in either
    /// direction instead of treating it as regular.
    pub strict: bool,
    /// Memoize OPEs of operator pairs.
    pub cache: bool,
    /// Minimum number of independent sub-OPEs to compute them in parallel.
    pub parallel_threshold: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict: false,
            cache: true,
            parallel_threshold: 4,
        }
    }
}

impl EngineOptions {
    /// Options that reject undeclared OPEs.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Sets whether undeclared OPEs are errors.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets whether results are memoized.
    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the parallelism threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = EngineOptions::default();
        assert!(!opts.strict);
        assert!(opts.cache);
        assert!(EngineOptions::strict().strict);
        assert!(!EngineOptions::default().with_cache(false).cache);
        assert_eq!(EngineOptions::default().with_parallel_threshold(0).parallel_threshold, 0);
    }
}
