//! Register descriptions: what a register must be able to hold

use std::fmt;

use super::RegisterKind;
use crate::ir::{BasicValueType, PrimitiveType, TypeNode};

/// Describes what a register holds, independent of where it lives
///
/// A description pairs the declared IR type with the basic value kind used to
/// represent it and the target-specific register kind. Pointers and strings
/// keep their declared type but are described with an integer basic value
/// kind, which is how non-primitive types end up in a single register.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegisterDescription<K> {
    ty: TypeNode,
    basic_value_type: BasicValueType,
    kind: K,
}

impl<K: RegisterKind> RegisterDescription<K> {
    /// Describes a primitive type; the basic value kind is the primitive's own
    pub fn from_primitive(ty: PrimitiveType, kind: K) -> Self {
        Self {
            ty: TypeNode::Primitive(ty),
            basic_value_type: ty.basic_value_type(),
            kind,
        }
    }

    /// Describes a type with an explicit representation kind
    pub fn new(ty: TypeNode, basic_value_type: BasicValueType, kind: K) -> Self {
        Self {
            ty,
            basic_value_type,
            kind,
        }
    }

    /// Declared IR type
    pub fn ty(&self) -> &TypeNode {
        &self.ty
    }

    /// Basic value kind used to represent the type
    pub fn basic_value_type(&self) -> BasicValueType {
        self.basic_value_type
    }

    /// Target register kind
    pub fn kind(&self) -> K {
        self.kind
    }
}

impl<K: RegisterKind> fmt::Display for RegisterDescription<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {} in {:?}", self.ty, self.basic_value_type, self.kind)
    }
}
