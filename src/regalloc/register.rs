//! Register model
//!
//! A value lives either in a single primitive register (a compile-time
//! constant or a target register handed out by the resolver) or in a compound
//! register mirroring a structure's fields. Only hardware leaves occupy target
//! resources.

use std::fmt;
use std::rc::Rc;

use super::description::RegisterDescription;
use super::RegisterKind;
use crate::ir::{BasicValueType, PrimitiveValue, StructureType, TypeNode};
use crate::{Error, Result};

/// Shared handle to a register; identity is preserved across lookups
pub type RegisterRef<K> = Rc<Register<K>>;

/// A register holding a literal known at compile time
///
/// Never allocated from the target, so never released to it either.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantRegister<K> {
    description: RegisterDescription<K>,
    value: PrimitiveValue,
}

impl<K: RegisterKind> ConstantRegister<K> {
    /// Creates a constant register
    pub fn new(description: RegisterDescription<K>, value: PrimitiveValue) -> Self {
        Self { description, value }
    }

    /// Description of the register
    pub fn description(&self) -> &RegisterDescription<K> {
        &self.description
    }

    /// The literal held by this register
    pub fn value(&self) -> PrimitiveValue {
        self.value
    }
}

/// A target register identified by a kind-specific index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HardwareRegister<K> {
    description: RegisterDescription<K>,
    index: u32,
}

impl<K: RegisterKind> HardwareRegister<K> {
    /// Creates a hardware register; called by target resolvers
    pub fn new(description: RegisterDescription<K>, index: u32) -> Self {
        Self { description, index }
    }

    /// Description of the register
    pub fn description(&self) -> &RegisterDescription<K> {
        &self.description
    }

    /// Target register kind
    pub fn kind(&self) -> K {
        self.description.kind()
    }

    /// Index within the register kind
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// A group of registers, one per structure field in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundRegister<K> {
    ty: TypeNode,
    children: Vec<RegisterRef<K>>,
}

impl<K: RegisterKind> CompoundRegister<K> {
    /// Creates a compound register for `ty` from one child per field
    pub fn new(ty: StructureType, children: Vec<RegisterRef<K>>) -> Result<Self> {
        if children.len() != ty.num_fields() {
            return Err(Error::codegen(format!(
                "compound register for {} needs {} children, got {}",
                TypeNode::Structure(ty.clone()),
                ty.num_fields(),
                children.len()
            )));
        }
        Ok(Self {
            ty: TypeNode::Structure(ty),
            children,
        })
    }

    /// The structure type this register mirrors
    pub fn ty(&self) -> &TypeNode {
        &self.ty
    }

    /// Child registers in field order
    pub fn children(&self) -> &[RegisterRef<K>] {
        &self.children
    }

    /// Child register for field `index`
    pub fn child(&self, index: usize) -> Option<&RegisterRef<K>> {
        self.children.get(index)
    }

    /// Number of children (equal to the structure's field count)
    pub fn num_children(&self) -> usize {
        self.children.len()
    }
}

/// A register bound to an IR value
#[derive(Debug, Clone, PartialEq)]
pub enum Register<K> {
    /// Compile-time literal
    Constant(ConstantRegister<K>),
    /// Target register
    Hardware(HardwareRegister<K>),
    /// Per-field group of registers
    Compound(CompoundRegister<K>),
}

/// Borrowed view of a primitive (single-slot) register
#[derive(Debug, Clone, Copy)]
pub enum PrimitiveRef<'a, K> {
    /// Compile-time literal
    Constant(&'a ConstantRegister<K>),
    /// Target register
    Hardware(&'a HardwareRegister<K>),
}

impl<'a, K: RegisterKind> PrimitiveRef<'a, K> {
    /// Description shared by both primitive variants
    pub fn description(&self) -> &'a RegisterDescription<K> {
        match *self {
            PrimitiveRef::Constant(c) => c.description(),
            PrimitiveRef::Hardware(h) => h.description(),
        }
    }

    /// Target register kind
    pub fn kind(&self) -> K {
        self.description().kind()
    }
}

impl<K: RegisterKind> Register<K> {
    /// Owning type of the register
    pub fn ty(&self) -> &TypeNode {
        match self {
            Register::Constant(c) => c.description().ty(),
            Register::Hardware(h) => h.description().ty(),
            Register::Compound(c) => c.ty(),
        }
    }

    /// Basic value kind (`None` for compound registers)
    pub fn basic_value_type(&self) -> BasicValueType {
        match self {
            Register::Constant(c) => c.description().basic_value_type(),
            Register::Hardware(h) => h.description().basic_value_type(),
            Register::Compound(_) => BasicValueType::None,
        }
    }

    /// Returns true for constant and hardware registers
    pub fn is_primitive(&self) -> bool {
        !self.is_compound()
    }

    /// Returns true for compound registers
    pub fn is_compound(&self) -> bool {
        matches!(self, Register::Compound(_))
    }

    /// Views this register as a primitive register
    pub fn as_primitive(&self) -> Option<PrimitiveRef<'_, K>> {
        match self {
            Register::Constant(c) => Some(PrimitiveRef::Constant(c)),
            Register::Hardware(h) => Some(PrimitiveRef::Hardware(h)),
            Register::Compound(_) => None,
        }
    }

    /// Name of the variant, for diagnostics
    pub fn variant_name(&self) -> &'static str {
        match self {
            Register::Constant(_) => <ConstantRegister<K> as RegisterVariant<K>>::NAME,
            Register::Hardware(_) => <HardwareRegister<K> as RegisterVariant<K>>::NAME,
            Register::Compound(_) => <CompoundRegister<K> as RegisterVariant<K>>::NAME,
        }
    }

    /// Hardware leaves in depth-first field order
    pub fn hardware_leaves(&self) -> HardwareLeaves<'_, K> {
        HardwareLeaves { stack: vec![self] }
    }

    /// Number of hardware leaves reachable from this register
    pub fn num_hardware_leaves(&self) -> usize {
        self.hardware_leaves().count()
    }
}

impl<K: RegisterKind> From<HardwareRegister<K>> for Register<K> {
    fn from(register: HardwareRegister<K>) -> Self {
        Register::Hardware(register)
    }
}

impl<K: RegisterKind> From<ConstantRegister<K>> for Register<K> {
    fn from(register: ConstantRegister<K>) -> Self {
        Register::Constant(register)
    }
}

impl<K: RegisterKind> From<CompoundRegister<K>> for Register<K> {
    fn from(register: CompoundRegister<K>) -> Self {
        Register::Compound(register)
    }
}

/// Depth-first iterator over the hardware leaves of a register
pub struct HardwareLeaves<'a, K> {
    stack: Vec<&'a Register<K>>,
}

impl<'a, K: RegisterKind> Iterator for HardwareLeaves<'a, K> {
    type Item = &'a HardwareRegister<K>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(register) = self.stack.pop() {
            match register {
                Register::Hardware(h) => return Some(h),
                Register::Constant(_) => {}
                Register::Compound(c) => {
                    self.stack
                        .extend(c.children().iter().rev().map(|child| child.as_ref()));
                }
            }
        }
        None
    }
}

/// A concrete register variant that can be requested from a binding
pub trait RegisterVariant<K>: Sized {
    /// Variant name used in diagnostics
    const NAME: &'static str;

    /// Returns the variant if `register` is of this kind
    fn from_register(register: &Register<K>) -> Option<&Self>;
}

impl<K> RegisterVariant<K> for ConstantRegister<K> {
    const NAME: &'static str = "constant";

    fn from_register(register: &Register<K>) -> Option<&Self> {
        match register {
            Register::Constant(c) => Some(c),
            _ => None,
        }
    }
}

impl<K> RegisterVariant<K> for HardwareRegister<K> {
    const NAME: &'static str = "hardware";

    fn from_register(register: &Register<K>) -> Option<&Self> {
        match register {
            Register::Hardware(h) => Some(h),
            _ => None,
        }
    }
}

impl<K> RegisterVariant<K> for CompoundRegister<K> {
    const NAME: &'static str = "compound";

    fn from_register(register: &Register<K>) -> Option<&Self> {
        match register {
            Register::Compound(c) => Some(c),
            _ => None,
        }
    }
}

impl<K: RegisterKind> fmt::Display for HardwareRegister<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind(), self.index)
    }
}

impl<K: RegisterKind> fmt::Display for Register<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Constant(c) => write!(f, "const {}", c.value()),
            Register::Hardware(h) => write!(f, "{}", h),
            Register::Compound(c) => {
                write!(f, "(")?;
                for (i, child) in c.children().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PrimitiveType;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Int,
        Float,
    }

    fn hw(ty: PrimitiveType, kind: Kind, index: u32) -> RegisterRef<Kind> {
        Rc::new(Register::Hardware(HardwareRegister::new(
            RegisterDescription::from_primitive(ty, kind),
            index,
        )))
    }

    #[test]
    fn test_variant_discriminators() {
        let reg = hw(PrimitiveType::I32, Kind::Int, 0);
        assert!(reg.is_primitive());
        assert!(!reg.is_compound());
        assert_eq!(reg.basic_value_type(), BasicValueType::Int32);
        assert_eq!(reg.variant_name(), "hardware");
        assert!(HardwareRegister::from_register(&reg).is_some());
        assert!(CompoundRegister::from_register(&reg).is_none());
    }

    #[test]
    fn test_compound_rejects_wrong_arity() {
        let ty = StructureType::new([TypeNode::from(PrimitiveType::I32)]);
        let result = CompoundRegister::<Kind>::new(ty, vec![]);
        assert!(matches!(result, Err(Error::CodegenError(_))));
    }

    #[test]
    fn test_hardware_leaves_skip_constants() {
        let inner_ty = StructureType::new([
            TypeNode::from(PrimitiveType::F32),
            TypeNode::from(PrimitiveType::I8),
        ]);
        let constant = Rc::new(Register::Constant(ConstantRegister::new(
            RegisterDescription::from_primitive(PrimitiveType::I8, Kind::Int),
            PrimitiveValue::Int8(7),
        )));
        let inner = Rc::new(Register::Compound(
            CompoundRegister::new(
                inner_ty.clone(),
                vec![hw(PrimitiveType::F32, Kind::Float, 1), constant],
            )
            .unwrap(),
        ));
        let outer_ty = StructureType::new([
            TypeNode::from(PrimitiveType::I32),
            TypeNode::Structure(inner_ty),
        ]);
        let outer = Register::Compound(
            CompoundRegister::new(
                outer_ty,
                vec![hw(PrimitiveType::I32, Kind::Int, 0), inner],
            )
            .unwrap(),
        );

        let leaves: Vec<_> = outer.hardware_leaves().map(|h| (h.kind(), h.index())).collect();
        assert_eq!(leaves, vec![(Kind::Int, 0), (Kind::Float, 1)]);
        assert_eq!(outer.basic_value_type(), BasicValueType::None);
        assert_eq!(outer.to_string(), "(Int#0, (Float#1, const 7i8))");
    }

    #[test]
    fn test_primitive_view() {
        let reg = Register::Constant(ConstantRegister::new(
            RegisterDescription::from_primitive(PrimitiveType::I1, Kind::Int),
            PrimitiveValue::Int1(true),
        ));
        match reg.as_primitive() {
            Some(PrimitiveRef::Constant(c)) => assert_eq!(c.value(), PrimitiveValue::Int1(true)),
            other => panic!("unexpected view: {:?}", other),
        }
        assert_eq!(reg.as_primitive().unwrap().kind(), Kind::Int);
    }
}
