//! Bounded register file with reuse

use std::collections::BTreeSet;
use std::fmt;

use super::PointerWidth;
use crate::ir::{BasicValueType, TypeNode};
use crate::regalloc::{HardwareRegister, RegisterDescription, TargetResolver};
use crate::{Error, Result};

/// Register classes of the register file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterFileKind {
    /// Integer, predicate and address registers
    General,
    /// Floating point registers
    Float,
}

impl fmt::Display for RegisterFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterFileKind::General => write!(f, "general"),
            RegisterFileKind::Float => write!(f, "float"),
        }
    }
}

/// Register file dimensions
#[derive(Debug, Clone)]
pub struct RegisterFileConfig {
    /// Number of general purpose registers
    pub general: u32,
    /// Number of floating point registers
    pub float: u32,
    /// Width of pointers and string handles
    pub pointer_width: PointerWidth,
}

impl Default for RegisterFileConfig {
    fn default() -> Self {
        Self {
            general: 16,
            float: 16,
            pointer_width: PointerWidth::Bits64,
        }
    }
}

#[derive(Debug)]
struct Pool {
    capacity: u32,
    free: BTreeSet<u32>,
}

impl Pool {
    fn new(capacity: u32) -> Self {
        Self {
            capacity,
            free: (0..capacity).collect(),
        }
    }

    fn in_use(&self) -> u32 {
        self.capacity - self.free.len() as u32
    }
}

/// Resolver over a fixed register file
///
/// Hands out the lowest free register of the requested kind and takes
/// registers back on free.
#[derive(Debug)]
pub struct RegisterFileResolver {
    pointer_width: PointerWidth,
    general: Pool,
    float: Pool,
    high_water: [u32; 2],
}

impl RegisterFileResolver {
    /// Create a resolver with the given dimensions
    pub fn new(config: RegisterFileConfig) -> Self {
        Self {
            pointer_width: config.pointer_width,
            general: Pool::new(config.general),
            float: Pool::new(config.float),
            high_water: [0; 2],
        }
    }

    fn pool(&self, kind: RegisterFileKind) -> &Pool {
        match kind {
            RegisterFileKind::General => &self.general,
            RegisterFileKind::Float => &self.float,
        }
    }

    fn pool_mut(&mut self, kind: RegisterFileKind) -> &mut Pool {
        match kind {
            RegisterFileKind::General => &mut self.general,
            RegisterFileKind::Float => &mut self.float,
        }
    }

    /// Registers of `kind` currently handed out
    pub fn in_use(&self, kind: RegisterFileKind) -> u32 {
        self.pool(kind).in_use()
    }

    /// Most registers of `kind` in use at any one time
    pub fn high_water_mark(&self, kind: RegisterFileKind) -> u32 {
        self.high_water[kind as usize]
    }

    /// Total registers of `kind`
    pub fn capacity(&self, kind: RegisterFileKind) -> u32 {
        self.pool(kind).capacity
    }
}

impl Default for RegisterFileResolver {
    fn default() -> Self {
        Self::new(RegisterFileConfig::default())
    }
}

impl TargetResolver for RegisterFileResolver {
    type Kind = RegisterFileKind;

    fn resolve_register_description(
        &self,
        ty: &TypeNode,
    ) -> Result<RegisterDescription<RegisterFileKind>> {
        let basic_value_type = match ty {
            TypeNode::Primitive(p) | TypeNode::Padding(p) => p.basic_value_type(),
            TypeNode::Pointer(_) | TypeNode::String => self.pointer_width.basic_value_type(),
            _ => {
                return Err(Error::UnsupportedDescription {
                    ty: ty.to_string(),
                    reason: "not a register-sized type".to_string(),
                })
            }
        };
        let kind = if basic_value_type.is_float() {
            RegisterFileKind::Float
        } else {
            RegisterFileKind::General
        };
        Ok(RegisterDescription::new(ty.clone(), basic_value_type, kind))
    }

    fn allocate_register(
        &mut self,
        description: RegisterDescription<RegisterFileKind>,
    ) -> Result<HardwareRegister<RegisterFileKind>> {
        let kind = description.kind();
        let pool = self.pool_mut(kind);
        let Some(index) = pool.free.pop_first() else {
            let capacity = pool.capacity;
            tracing::warn!("{} register file exhausted ({} registers)", kind, capacity);
            return Err(Error::RegisterFileExhausted {
                kind: kind.to_string(),
                capacity,
            });
        };
        let in_use = pool.in_use();
        let mark = &mut self.high_water[kind as usize];
        *mark = (*mark).max(in_use);
        Ok(HardwareRegister::new(description, index))
    }

    fn free_register(&mut self, register: &HardwareRegister<RegisterFileKind>) -> Result<()> {
        let pool = self.pool_mut(register.kind());
        if register.index() >= pool.capacity || !pool.free.insert(register.index()) {
            return Err(Error::InvalidFree {
                register: register.to_string(),
            });
        }
        Ok(())
    }
}
