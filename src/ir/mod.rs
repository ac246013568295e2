//! # IR Boundary Model
//!
//! The slice of the IR that the register allocator consumes: value identities
//! with their types, and compile-time literals for constant registers.
//!
//! ## Module Structure
//!
//! ```text
//! ir/
//! ├── mod.rs     # This file - module definition and re-exports
//! ├── types.rs   # BasicValueType, PrimitiveType, TypeNode, RegisterClass
//! └── value.rs   # ValueId, Value, PrimitiveValue
//! ```
//!
//! Only [`TypeNode::register_class`] decides which types can be allocated.
//! `Void` and `View` are valid IR types but must be lowered before reaching
//! the backend.

mod types;
mod value;

pub use types::{
    AddressSpace, BasicValueType, PointerType, PrimitiveType, RegisterClass, StructureType,
    TypeNode,
};
pub use value::{PrimitiveValue, Value, ValueId};
