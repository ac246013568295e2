//! # Register Allocation and Value Binding
//!
//! Target-independent layer between the IR and a backend's instruction
//! emitter. It names every IR value with a register, decomposes structures
//! into per-field register groups, lets the emitter alias one value to
//! another, and releases target registers when values die.
//!
//! ## Module Structure
//!
//! ```text
//! regalloc/
//! ├── mod.rs          # This file - RegisterKind and re-exports
//! ├── description.rs  # RegisterDescription
//! ├── register.rs     # Register {Constant, Hardware, Compound}
//! ├── resolver.rs     # TargetResolver (implemented once per backend)
//! ├── options.rs      # AllocatorOptions, RebindPolicy
//! ├── stats.rs        # AllocationStats and serializable snapshots
//! └── allocator.rs    # RegisterAllocator - binding and alias tables
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use regbind::ir::{PrimitiveType, TypeNode, Value};
//! use regbind::regalloc::RegisterAllocator;
//! use regbind::targets::VirtualRegisterResolver;
//!
//! # fn main() -> regbind::Result<()> {
//! let mut allocator = RegisterAllocator::new(VirtualRegisterResolver::default());
//! let pair = Value::new(
//!     0,
//!     TypeNode::structure([TypeNode::from(PrimitiveType::I32), TypeNode::from(PrimitiveType::F32)]),
//! );
//!
//! let register = allocator.allocate(&pair)?;
//! assert_eq!(register.num_hardware_leaves(), 2);
//!
//! allocator.free(&pair)?;
//! assert!(allocator.load(&pair).is_err());
//! # Ok(())
//! # }
//! ```

mod allocator;
mod description;
mod options;
mod register;
mod resolver;
mod stats;

use std::fmt::Debug;
use std::hash::Hash;

pub use allocator::RegisterAllocator;
pub use description::RegisterDescription;
pub use options::{AllocatorOptions, RebindPolicy};
pub use register::{
    CompoundRegister, ConstantRegister, HardwareLeaves, HardwareRegister, PrimitiveRef, Register,
    RegisterRef, RegisterVariant,
};
pub use resolver::TargetResolver;
pub use stats::{AliasSnapshot, AllocationStats, AllocatorSnapshot, BindingSnapshot};

/// Target-specific register class tag (integer vs. float registers, ...)
///
/// Every backend picks its own kind type; any small `Copy` enum qualifies.
pub trait RegisterKind: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> RegisterKind for T {}
