//! Allocator configuration

/// What to do when `bind` replaces an existing binding with another register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebindPolicy {
    /// Replace the binding, logging at debug level
    #[default]
    Silent,
    /// Replace the binding, warning if the replaced register held target registers
    Warn,
    /// Refuse to replace the binding
    Deny,
}

/// Register allocator options
#[derive(Debug, Clone)]
pub struct AllocatorOptions {
    /// Handling of rebinds over a live binding
    pub rebind_policy: RebindPolicy,
    /// Maintain allocation statistics
    pub collect_stats: bool,
}

impl Default for AllocatorOptions {
    fn default() -> Self {
        Self {
            rebind_policy: RebindPolicy::Silent,
            collect_stats: true,
        }
    }
}
