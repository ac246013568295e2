//! Target resolver interface

use super::{HardwareRegister, RegisterDescription, RegisterKind};
use crate::ir::TypeNode;
use crate::Result;

/// Per-backend collaborator supplying all target-specific knowledge
///
/// The allocator never inspects register files itself. Whether a freed
/// register is ever handed out again is entirely up to the implementation;
/// an unbounded virtual-register target may just count upwards.
pub trait TargetResolver {
    /// Register kind of this target
    type Kind: RegisterKind;

    /// Describes a register-sized type (primitive, padding primitive, pointer
    /// or string) on this target
    fn resolve_register_description(&self, ty: &TypeNode)
        -> Result<RegisterDescription<Self::Kind>>;

    /// Allocates a target register for `description`
    fn allocate_register(
        &mut self,
        description: RegisterDescription<Self::Kind>,
    ) -> Result<HardwareRegister<Self::Kind>>;

    /// Releases a register previously returned by [`allocate_register`]
    ///
    /// [`allocate_register`]: TargetResolver::allocate_register
    fn free_register(&mut self, register: &HardwareRegister<Self::Kind>) -> Result<()>;
}
