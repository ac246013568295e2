//! IR values and compile-time literals

use std::fmt;

use super::types::{BasicValueType, PrimitiveType, TypeNode};

/// Identity of an IR value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

impl ValueId {
    /// Creates a value id
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// An IR value whose result may need a register
///
/// Values are compared and hashed by identity only.
#[derive(Debug, Clone)]
pub struct Value {
    id: ValueId,
    ty: TypeNode,
}

impl Value {
    /// Creates a value with the given identity and type
    pub fn new(id: u32, ty: TypeNode) -> Self {
        Self {
            id: ValueId(id),
            ty,
        }
    }

    /// Identity of this value
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// Type of this value
    pub fn ty(&self) -> &TypeNode {
        &self.ty
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.ty)
    }
}

/// A primitive literal known at compile time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue {
    /// Boolean / predicate literal
    Int1(bool),
    /// 8-bit integer literal
    Int8(i8),
    /// 16-bit integer literal
    Int16(i16),
    /// 32-bit integer literal
    Int32(i32),
    /// 64-bit integer literal
    Int64(i64),
    /// 16-bit float literal, stored as raw IEEE half bits
    Float16(u16),
    /// 32-bit float literal
    Float32(f32),
    /// 64-bit float literal
    Float64(f64),
}

impl PrimitiveValue {
    /// Basic value kind of the literal
    pub fn basic_value_type(&self) -> BasicValueType {
        match self {
            PrimitiveValue::Int1(_) => BasicValueType::Int1,
            PrimitiveValue::Int8(_) => BasicValueType::Int8,
            PrimitiveValue::Int16(_) => BasicValueType::Int16,
            PrimitiveValue::Int32(_) => BasicValueType::Int32,
            PrimitiveValue::Int64(_) => BasicValueType::Int64,
            PrimitiveValue::Float16(_) => BasicValueType::Float16,
            PrimitiveValue::Float32(_) => BasicValueType::Float32,
            PrimitiveValue::Float64(_) => BasicValueType::Float64,
        }
    }

    /// Primitive type of the literal
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            PrimitiveValue::Int1(_) => PrimitiveType::I1,
            PrimitiveValue::Int8(_) => PrimitiveType::I8,
            PrimitiveValue::Int16(_) => PrimitiveType::I16,
            PrimitiveValue::Int32(_) => PrimitiveType::I32,
            PrimitiveValue::Int64(_) => PrimitiveType::I64,
            PrimitiveValue::Float16(_) => PrimitiveType::F16,
            PrimitiveValue::Float32(_) => PrimitiveType::F32,
            PrimitiveValue::Float64(_) => PrimitiveType::F64,
        }
    }

    /// Raw bit pattern, zero-extended to 64 bits
    pub fn raw_bits(&self) -> u64 {
        match *self {
            PrimitiveValue::Int1(b) => b as u64,
            PrimitiveValue::Int8(v) => v as u8 as u64,
            PrimitiveValue::Int16(v) => v as u16 as u64,
            PrimitiveValue::Int32(v) => v as u32 as u64,
            PrimitiveValue::Int64(v) => v as u64,
            PrimitiveValue::Float16(bits) => bits as u64,
            PrimitiveValue::Float32(v) => v.to_bits() as u64,
            PrimitiveValue::Float64(v) => v.to_bits(),
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Int1(v) => write!(f, "{}", v),
            PrimitiveValue::Int8(v) => write!(f, "{}i8", v),
            PrimitiveValue::Int16(v) => write!(f, "{}i16", v),
            PrimitiveValue::Int32(v) => write!(f, "{}i32", v),
            PrimitiveValue::Int64(v) => write!(f, "{}i64", v),
            PrimitiveValue::Float16(bits) => write!(f, "0x{:04x}f16", bits),
            PrimitiveValue::Float32(v) => write!(f, "{}f32", v),
            PrimitiveValue::Float64(v) => write!(f, "{}f64", v),
        }
    }
}
