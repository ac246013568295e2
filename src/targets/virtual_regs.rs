//! Unbounded virtual registers

use std::collections::HashMap;

use super::PointerWidth;
use crate::ir::{BasicValueType, TypeNode};
use crate::regalloc::{HardwareRegister, RegisterDescription, TargetResolver};
use crate::{Error, Result};

/// Virtual register classes, one namespace each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VirtualRegisterKind {
    /// 1-bit predicates
    Predicate,
    /// 16-bit integers (also holds 8-bit values)
    Int16,
    /// 32-bit integers
    Int32,
    /// 64-bit integers
    Int64,
    /// 16-bit floats
    Float16,
    /// 32-bit floats
    Float32,
    /// 64-bit floats
    Float64,
}

impl VirtualRegisterKind {
    /// Register kind holding a basic value kind
    pub fn for_basic_value_type(basic_value_type: BasicValueType) -> Option<Self> {
        match basic_value_type {
            BasicValueType::None => None,
            BasicValueType::Int1 => Some(VirtualRegisterKind::Predicate),
            BasicValueType::Int8 | BasicValueType::Int16 => Some(VirtualRegisterKind::Int16),
            BasicValueType::Int32 => Some(VirtualRegisterKind::Int32),
            BasicValueType::Int64 => Some(VirtualRegisterKind::Int64),
            BasicValueType::Float16 => Some(VirtualRegisterKind::Float16),
            BasicValueType::Float32 => Some(VirtualRegisterKind::Float32),
            BasicValueType::Float64 => Some(VirtualRegisterKind::Float64),
        }
    }
}

/// Resolver handing out ever-increasing register indices per kind
///
/// Freed registers are counted but never reused.
#[derive(Debug, Default)]
pub struct VirtualRegisterResolver {
    pointer_width: PointerWidth,
    counters: HashMap<VirtualRegisterKind, u32>,
    freed: usize,
}

impl VirtualRegisterResolver {
    /// Create a resolver for the given pointer width
    pub fn new(pointer_width: PointerWidth) -> Self {
        Self {
            pointer_width,
            ..Default::default()
        }
    }

    /// Registers handed out so far for `kind`
    pub fn num_allocated(&self, kind: VirtualRegisterKind) -> u32 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    /// Registers released so far, across all kinds
    pub fn num_freed(&self) -> usize {
        self.freed
    }
}

impl TargetResolver for VirtualRegisterResolver {
    type Kind = VirtualRegisterKind;

    fn resolve_register_description(
        &self,
        ty: &TypeNode,
    ) -> Result<RegisterDescription<VirtualRegisterKind>> {
        let basic_value_type = match ty {
            TypeNode::Primitive(p) | TypeNode::Padding(p) => p.basic_value_type(),
            TypeNode::Pointer(_) | TypeNode::String => self.pointer_width.basic_value_type(),
            _ => BasicValueType::None,
        };
        let kind = VirtualRegisterKind::for_basic_value_type(basic_value_type).ok_or_else(|| {
            Error::UnsupportedDescription {
                ty: ty.to_string(),
                reason: "not a register-sized type".to_string(),
            }
        })?;
        Ok(RegisterDescription::new(ty.clone(), basic_value_type, kind))
    }

    fn allocate_register(
        &mut self,
        description: RegisterDescription<VirtualRegisterKind>,
    ) -> Result<HardwareRegister<VirtualRegisterKind>> {
        let counter = self.counters.entry(description.kind()).or_insert(0);
        let index = *counter;
        *counter += 1;
        Ok(HardwareRegister::new(description, index))
    }

    fn free_register(&mut self, _register: &HardwareRegister<VirtualRegisterKind>) -> Result<()> {
        self.freed += 1;
        Ok(())
    }
}
