//! Type nodes seen by the register allocator

use std::fmt;
use std::rc::Rc;

use crate::{Error, Result};

/// Basic value kinds a register can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicValueType {
    /// No basic value (structures, pointers and other non-primitive types)
    None,
    /// 1-bit integer (boolean / predicate)
    Int1,
    /// 8-bit integer
    Int8,
    /// 16-bit integer
    Int16,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// 16-bit float
    Float16,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
}

impl BasicValueType {
    /// Returns true for the integer kinds, including `Int1`
    pub fn is_int(&self) -> bool {
        matches!(
            self,
            BasicValueType::Int1
                | BasicValueType::Int8
                | BasicValueType::Int16
                | BasicValueType::Int32
                | BasicValueType::Int64
        )
    }

    /// Returns true for the floating point kinds
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            BasicValueType::Float16 | BasicValueType::Float32 | BasicValueType::Float64
        )
    }

    /// Returns the size of this kind in bytes (`Int1` occupies one byte)
    pub fn size(&self) -> u32 {
        match self {
            BasicValueType::None => 0,
            BasicValueType::Int1 | BasicValueType::Int8 => 1,
            BasicValueType::Int16 | BasicValueType::Float16 => 2,
            BasicValueType::Int32 | BasicValueType::Float32 => 4,
            BasicValueType::Int64 | BasicValueType::Float64 => 8,
        }
    }

    /// Parses a basic value kind from its short name (e.g., "i32", "f64")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "i1" => Some(BasicValueType::Int1),
            "i8" => Some(BasicValueType::Int8),
            "i16" => Some(BasicValueType::Int16),
            "i32" => Some(BasicValueType::Int32),
            "i64" => Some(BasicValueType::Int64),
            "f16" => Some(BasicValueType::Float16),
            "f32" => Some(BasicValueType::Float32),
            "f64" => Some(BasicValueType::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for BasicValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BasicValueType::None => "none",
            BasicValueType::Int1 => "i1",
            BasicValueType::Int8 => "i8",
            BasicValueType::Int16 => "i16",
            BasicValueType::Int32 => "i32",
            BasicValueType::Int64 => "i64",
            BasicValueType::Float16 => "f16",
            BasicValueType::Float32 => "f32",
            BasicValueType::Float64 => "f64",
        };
        f.write_str(name)
    }
}

/// A register-sized scalar type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveType(BasicValueType);

impl PrimitiveType {
    /// 1-bit integer
    pub const I1: Self = Self(BasicValueType::Int1);
    /// 8-bit integer
    pub const I8: Self = Self(BasicValueType::Int8);
    /// 16-bit integer
    pub const I16: Self = Self(BasicValueType::Int16);
    /// 32-bit integer
    pub const I32: Self = Self(BasicValueType::Int32);
    /// 64-bit integer
    pub const I64: Self = Self(BasicValueType::Int64);
    /// 16-bit float
    pub const F16: Self = Self(BasicValueType::Float16);
    /// 32-bit float
    pub const F32: Self = Self(BasicValueType::Float32);
    /// 64-bit float
    pub const F64: Self = Self(BasicValueType::Float64);

    /// Creates a primitive type, rejecting `BasicValueType::None`
    pub fn new(basic_value_type: BasicValueType) -> Option<Self> {
        match basic_value_type {
            BasicValueType::None => None,
            other => Some(Self(other)),
        }
    }

    /// The basic value kind of this primitive
    pub fn basic_value_type(&self) -> BasicValueType {
        self.0
    }

    /// Size in bytes
    pub fn size(&self) -> u32 {
        self.0.size()
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Address spaces a pointer can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressSpace {
    /// Flat/generic address space
    #[default]
    Generic,
    /// Device global memory
    Global,
    /// Work-group shared memory
    Shared,
    /// Thread-local memory
    Local,
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpace::Generic => write!(f, "generic"),
            AddressSpace::Global => write!(f, "global"),
            AddressSpace::Shared => write!(f, "shared"),
            AddressSpace::Local => write!(f, "local"),
        }
    }
}

/// Pointer (and view) element type with its address space
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointerType {
    element: Rc<TypeNode>,
    address_space: AddressSpace,
}

impl PointerType {
    /// Creates a pointer to `element` in `address_space`
    pub fn new(element: TypeNode, address_space: AddressSpace) -> Self {
        Self {
            element: Rc::new(element),
            address_space,
        }
    }

    /// Pointed-to element type
    pub fn element(&self) -> &TypeNode {
        &self.element
    }

    /// Address space of the pointer
    pub fn address_space(&self) -> AddressSpace {
        self.address_space
    }
}

/// Structured type with an ordered field list
///
/// Fields are stored in declaration order; cloning shares the field storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureType {
    fields: Rc<[TypeNode]>,
}

impl StructureType {
    /// Creates a structure from its fields in declaration order
    pub fn new(fields: impl IntoIterator<Item = TypeNode>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[TypeNode] {
        &self.fields
    }

    /// Number of fields
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// The field at `index`, if any
    pub fn field(&self, index: usize) -> Option<&TypeNode> {
        self.fields.get(index)
    }
}

/// An IR type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    /// The empty type; values of this type never need registers
    Void,
    /// Register-sized scalar
    Primitive(PrimitiveType),
    /// Pointer into some address space
    Pointer(PointerType),
    /// String handle (a pointer-sized reference to string data)
    String,
    /// Structured value with ordered fields
    Structure(StructureType),
    /// Padding that fills a gap in a structure layout
    Padding(PrimitiveType),
    /// Array view (pointer + length); must be lowered to a structure before codegen
    View(PointerType),
}

/// Register-relevant category of a [`TypeNode`]
///
/// This is the closed set of categories the allocator understands. The
/// allocator matches on it exhaustively.
#[derive(Debug, Clone, Copy)]
pub enum RegisterClass<'a> {
    /// Scalar occupying one register
    Primitive(PrimitiveType),
    /// Pointer occupying one integer register
    Pointer(&'a PointerType),
    /// String handle occupying one integer register
    String,
    /// Structure decomposed field by field
    Structure(&'a StructureType),
    /// Padding occupying one register of its primitive type
    Padding(PrimitiveType),
}

impl TypeNode {
    /// Convenience constructor for a primitive type node
    pub fn primitive(ty: PrimitiveType) -> Self {
        TypeNode::Primitive(ty)
    }

    /// Convenience constructor for a generic-address-space pointer
    pub fn pointer_to(element: TypeNode) -> Self {
        TypeNode::Pointer(PointerType::new(element, AddressSpace::Generic))
    }

    /// Convenience constructor for a structure type node
    pub fn structure(fields: impl IntoIterator<Item = TypeNode>) -> Self {
        TypeNode::Structure(StructureType::new(fields))
    }

    /// The type's own basic value kind (`None` for non-scalar categories)
    pub fn basic_value_type(&self) -> BasicValueType {
        match self {
            TypeNode::Primitive(p) | TypeNode::Padding(p) => p.basic_value_type(),
            _ => BasicValueType::None,
        }
    }

    /// Returns the wrapped primitive for primitive and padding types
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeNode::Primitive(p) | TypeNode::Padding(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns true for structure types
    pub fn is_structure(&self) -> bool {
        matches!(self, TypeNode::Structure(_))
    }

    /// Narrows this type into the categories that can live in registers
    pub fn register_class(&self) -> Result<RegisterClass<'_>> {
        match self {
            TypeNode::Primitive(p) => Ok(RegisterClass::Primitive(*p)),
            TypeNode::Pointer(p) => Ok(RegisterClass::Pointer(p)),
            TypeNode::String => Ok(RegisterClass::String),
            TypeNode::Structure(s) => Ok(RegisterClass::Structure(s)),
            TypeNode::Padding(p) => Ok(RegisterClass::Padding(*p)),
            TypeNode::Void | TypeNode::View(_) => Err(Error::UnsupportedType {
                ty: self.to_string(),
            }),
        }
    }
}

impl From<PrimitiveType> for TypeNode {
    fn from(ty: PrimitiveType) -> Self {
        TypeNode::Primitive(ty)
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Void => write!(f, "void"),
            TypeNode::Primitive(p) => write!(f, "{}", p),
            TypeNode::Pointer(p) => write!(f, "ptr<{}, {}>", p.element(), p.address_space()),
            TypeNode::String => write!(f, "string"),
            TypeNode::Structure(s) => {
                write!(f, "{{")?;
                for (i, field) in s.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, "}}")
            }
            TypeNode::Padding(p) => write!(f, "pad<{}>", p),
            TypeNode::View(p) => write!(f, "view<{}, {}>", p.element(), p.address_space()),
        }
    }
}
