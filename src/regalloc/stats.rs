//! Allocation statistics and binding snapshots

use serde::Serialize;

/// Counters maintained by the allocator over one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocationStats {
    /// Target registers requested from the resolver
    pub hardware_allocated: usize,
    /// Target registers released to the resolver
    pub hardware_freed: usize,
    /// Constant registers bound
    pub constants_bound: usize,
    /// Compound registers built by structure decomposition
    pub compounds_built: usize,
    /// Aliases recorded
    pub aliases: usize,
    /// Explicit `bind` calls
    pub binds: usize,
}

impl AllocationStats {
    /// Target registers allocated and not yet released
    pub fn hardware_live(&self) -> usize {
        self.hardware_allocated.saturating_sub(self.hardware_freed)
    }
}

/// One live binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSnapshot {
    /// Bound value
    pub value: String,
    /// Type of the bound value
    pub ty: String,
    /// Rendering of the bound register
    pub register: String,
    /// Value whose request created the binding (differs from `value` through aliases)
    pub produced_by: String,
}

/// One recorded alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasSnapshot {
    /// Aliased value
    pub value: String,
    /// Stored alias target
    pub target: String,
}

/// Complete allocator state, sorted by value id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocatorSnapshot {
    /// Live bindings
    pub bindings: Vec<BindingSnapshot>,
    /// Recorded aliases
    pub aliases: Vec<AliasSnapshot>,
    /// Counters at the time of the snapshot
    pub stats: AllocationStats,
}
