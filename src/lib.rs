//! # regbind - Register Binding for Multi-Target Code Generators
//!
//! `regbind` is the backend-agnostic register allocation layer that sits
//! between an IR and a target instruction emitter. It assigns exactly one
//! register to every IR value that needs one, decomposes structures into
//! per-field register groups, lets the emitter alias values, and hands target
//! registers back when values die.
//!
//! It does not spill, color interference graphs or compute liveness. It is a
//! naming and structural-decomposition service that both a liveness-aware
//! allocator and a plain one-register-per-value scheme can build on.
//!
//! ## Quick Start
//!
//! ```rust
//! use regbind::ir::{PrimitiveType, TypeNode, Value};
//! use regbind::regalloc::RegisterAllocator;
//! use regbind::targets::RegisterFileResolver;
//!
//! # fn main() -> regbind::Result<()> {
//! let mut allocator = RegisterAllocator::new(RegisterFileResolver::default());
//!
//! // struct { x: i32, p: *i8 }
//! let pair = Value::new(
//!     0,
//!     TypeNode::structure([
//!         TypeNode::from(PrimitiveType::I32),
//!         TypeNode::pointer_to(TypeNode::from(PrimitiveType::I8)),
//!     ]),
//! );
//! let copy = Value::new(1, pair.ty().clone());
//!
//! let register = allocator.allocate(&pair)?;
//! assert!(register.is_compound());
//!
//! // `copy` now shares whatever register `pair` is bound to.
//! allocator.alias(&copy, &pair)?;
//! assert_eq!(allocator.load(&copy)?, register);
//!
//! allocator.free(&pair)?;
//! assert!(allocator.load(&copy).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! IR value ──► RegisterAllocator ──► TargetResolver (per backend)
//!                 │  bindings: value → register
//!                 │  aliases:  value → value
//!                 ▼
//!              Register { Constant | Hardware | Compound } ──► emitter
//! ```
//!
//! ### Main Components
//!
//! - [`ir`] - value identities, type nodes and literals consumed from the IR
//! - [`regalloc`] - register model, [`RegisterAllocator`] and the
//!   [`TargetResolver`] interface
//! - [`targets`] - sample resolvers (unbounded virtual registers, bounded
//!   register file)
//! - [`error`] - the crate's [`Error`] type
//!
//! ## Error Handling
//!
//! Every error is fatal to the current code-generation pass and indicates a
//! compiler defect upstream (an unlowered type, a value consumed before it was
//! allocated) or an exhausted target register file.

pub mod error;
pub mod ir;
pub mod regalloc;
pub mod targets;

// Re-export main types
pub use error::{Error, Result};
pub use regalloc::{
    AllocatorOptions, Register, RegisterAllocator, RegisterDescription, RegisterRef,
    TargetResolver,
};

/// Version of the regbind crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
