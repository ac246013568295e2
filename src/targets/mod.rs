//! # Sample Targets
//!
//! Reference [`TargetResolver`](crate::regalloc::TargetResolver)
//! implementations:
//!
//! - [`VirtualRegisterResolver`] - unlimited virtual registers, one counter per
//!   kind, as used by virtual-ISA backends that leave physical allocation to
//!   a downstream assembler
//! - [`RegisterFileResolver`] - a fixed register file that reuses freed
//!   registers and fails when exhausted

mod register_file;
mod virtual_regs;

pub use register_file::{RegisterFileConfig, RegisterFileKind, RegisterFileResolver};
pub use virtual_regs::{VirtualRegisterKind, VirtualRegisterResolver};

use crate::ir::BasicValueType;

/// Width of pointers (and string handles) on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerWidth {
    /// 32-bit addresses
    Bits32,
    /// 64-bit addresses
    #[default]
    Bits64,
}

impl PointerWidth {
    /// Integer kind used to hold a pointer
    pub fn basic_value_type(&self) -> BasicValueType {
        match self {
            PointerWidth::Bits32 => BasicValueType::Int32,
            PointerWidth::Bits64 => BasicValueType::Int64,
        }
    }
}
