//! Resolver configuration.

/// Weights of the specificity score.
///
/// `score = concreteness·c + constraints·k + bindings·b − union_variants·u − default_only·d`
///
/// Only the relative order these produce matters. A single-type impl must
/// stay ahead of a union impl covering the same type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecificityWeights {
    pub concreteness: i64,
    pub constraint: i64,
    pub binding: i64,
    pub union_variant: i64,
    pub default_only: i64,
}

impl Default for SpecificityWeights {
    fn default() -> Self {
        SpecificityWeights {
            concreteness: 100,
            constraint: 10,
            binding: 1,
            union_variant: 1,
            default_only: 1,
        }
    }
}

/// Knobs for a [`Runtime`](crate::Runtime).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    pub weights: SpecificityWeights,
    /// Let primitives satisfy `Eq`/`Ord`/`Hash`/`Clone` without a registered impl.
    pub primitive_interfaces: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            weights: SpecificityWeights::default(),
            primitive_interfaces: true,
        }
    }
}
