//! End-to-end allocation scenarios against the sample targets and a
//! recording resolver.

use std::rc::Rc;

use regbind::ir::{BasicValueType, PrimitiveType, PrimitiveValue, TypeNode, Value};
use regbind::regalloc::{
    CompoundRegister, HardwareRegister, Register, RegisterAllocator, RegisterDescription,
    TargetResolver,
};
use regbind::targets::{
    PointerWidth, RegisterFileConfig, RegisterFileKind, RegisterFileResolver,
    VirtualRegisterKind, VirtualRegisterResolver,
};
use regbind::{Error, Result};

/// Resolver that records every call and delegates to a virtual register file
#[derive(Default)]
struct RecordingResolver {
    inner: VirtualRegisterResolver,
    allocations: Vec<RegisterDescription<VirtualRegisterKind>>,
    frees: Vec<HardwareRegister<VirtualRegisterKind>>,
}

impl TargetResolver for RecordingResolver {
    type Kind = VirtualRegisterKind;

    fn resolve_register_description(
        &self,
        ty: &TypeNode,
    ) -> Result<RegisterDescription<VirtualRegisterKind>> {
        self.inner.resolve_register_description(ty)
    }

    fn allocate_register(
        &mut self,
        description: RegisterDescription<VirtualRegisterKind>,
    ) -> Result<HardwareRegister<VirtualRegisterKind>> {
        self.allocations.push(description.clone());
        self.inner.allocate_register(description)
    }

    fn free_register(&mut self, register: &HardwareRegister<VirtualRegisterKind>) -> Result<()> {
        self.frees.push(register.clone());
        self.inner.free_register(register)
    }
}

fn i32_ty() -> TypeNode {
    TypeNode::from(PrimitiveType::I32)
}

fn point_ty() -> TypeNode {
    // struct { x: i32, y: *i8 }
    TypeNode::structure([i32_ty(), TypeNode::pointer_to(PrimitiveType::I8.into())])
}

#[test]
fn test_struct_allocate_then_free() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let v = Value::new(0, point_ty());

    let register = allocator.allocate(&v).unwrap();
    let compound = match register.as_ref() {
        Register::Compound(c) => c,
        other => panic!("expected compound register, got {}", other),
    };
    assert_eq!(compound.num_children(), 2);

    let x = compound.child(0).unwrap();
    let y = compound.child(1).unwrap();
    assert_eq!(x.ty(), &i32_ty());
    assert_eq!(x.basic_value_type(), BasicValueType::Int32);
    assert!(matches!(y.ty(), TypeNode::Pointer(_)));
    assert_eq!(y.basic_value_type(), BasicValueType::Int64);

    allocator.free(&v).unwrap();

    let resolver = allocator.resolver();
    assert_eq!(resolver.frees.len(), 2);
    assert_eq!(resolver.frees[0].kind(), VirtualRegisterKind::Int32);
    assert_eq!(resolver.frees[1].kind(), VirtualRegisterKind::Int64);
    assert!(matches!(
        allocator.load(&v),
        Err(Error::MissingBinding { .. })
    ));
}

#[test]
fn test_nested_structure_field_order() {
    let inner = TypeNode::structure([
        TypeNode::from(PrimitiveType::F32),
        TypeNode::Padding(PrimitiveType::I16),
        TypeNode::from(PrimitiveType::I1),
    ]);
    let outer = TypeNode::structure([TypeNode::String, inner.clone(), i32_ty()]);
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let v = Value::new(7, outer.clone());

    let register = allocator.allocate(&v).unwrap();

    let compound = allocator
        .load_as::<CompoundRegister<VirtualRegisterKind>>(&v)
        .unwrap();
    let TypeNode::Structure(outer_struct) = &outer else {
        unreachable!()
    };
    for (child, field) in compound.children().iter().zip(outer_struct.fields()) {
        assert_eq!(child.ty(), field);
    }
    assert!(compound.child(1).unwrap().is_compound());

    // Depth-first leaf order follows declaration order.
    let kinds: Vec<_> = register.hardware_leaves().map(|h| h.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            VirtualRegisterKind::Int64,
            VirtualRegisterKind::Float32,
            VirtualRegisterKind::Int16,
            VirtualRegisterKind::Predicate,
            VirtualRegisterKind::Int32,
        ]
    );
    assert_eq!(allocator.resolver().allocations.len(), 5);
    assert_eq!(allocator.stats().compounds_built, 2);
}

#[test]
fn test_alias_to_unallocated_target() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let v1 = Value::new(1, i32_ty());
    let v2 = Value::new(2, i32_ty());

    allocator.alias(&v2, &v1).unwrap();
    assert!(!allocator.is_bound(&v1));

    let r2 = allocator.allocate(&v2).unwrap();
    let r1 = allocator.load(&v1).unwrap();

    assert!(Rc::ptr_eq(&r1, &r2));
    assert_eq!(allocator.resolver().allocations.len(), 1);
    assert_eq!(allocator.num_bindings(), 1);
}

#[test]
fn test_alias_transparency() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let a = Value::new(0, point_ty());
    let b = Value::new(1, point_ty());

    allocator.alias(&a, &b).unwrap();
    let rb = allocator.allocate(&b).unwrap();

    assert!(Rc::ptr_eq(&allocator.load(&a).unwrap(), &rb));
    assert!(Rc::ptr_eq(&allocator.allocate(&a).unwrap(), &rb));
}

#[test]
fn test_alias_flattening() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let a = Value::new(0, i32_ty());
    let b = Value::new(1, i32_ty());
    let c = Value::new(2, i32_ty());
    let d = Value::new(3, i32_ty());

    allocator.alias(&a, &b).unwrap();
    allocator.alias(&b, &c).unwrap();
    allocator.alias(&d, &b).unwrap();

    assert_eq!(allocator.alias_target(&d).map(Value::id), Some(c.id()));
    assert_eq!(allocator.alias_target(&a).map(Value::id), Some(b.id()));
    assert_eq!(allocator.resolve_alias(&a).id(), c.id());
}

#[test]
fn test_realias_cannot_close_a_loop() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let a = Value::new(0, i32_ty());
    let b = Value::new(1, i32_ty());
    let x = Value::new(2, i32_ty());

    allocator.alias(&b, &a).unwrap();
    allocator.alias(&a, &x).unwrap();
    let err = allocator.alias(&a, &b).unwrap_err();
    assert!(matches!(err, Error::AliasCycle { .. }));

    let rx = allocator.allocate(&x).unwrap();
    assert!(Rc::ptr_eq(&allocator.load(&a).unwrap(), &rx));
    assert!(Rc::ptr_eq(&allocator.load(&b).unwrap(), &rx));
    allocator.free(&b).unwrap();
    assert!(!allocator.is_bound(&a));
    assert_eq!(allocator.resolver().frees.len(), 1);
}

#[test]
fn test_alias_frees_bound_structure() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let a = Value::new(0, point_ty());
    let b = Value::new(1, point_ty());
    allocator.allocate(&a).unwrap();

    allocator.alias(&a, &b).unwrap();

    assert_eq!(allocator.resolver().frees.len(), 2);
    assert_eq!(allocator.num_bindings(), 0);
    assert_eq!(allocator.stats().hardware_live(), 0);
}

#[test]
fn test_free_skips_constant_leaves() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let x = Value::new(0, i32_ty());
    let k = Value::new(1, i32_ty());
    let ty = TypeNode::structure([i32_ty(), i32_ty()]);
    let pair = Value::new(2, ty.clone());

    let rx = allocator.allocate(&x).unwrap();
    let rk = allocator
        .allocate_constant(&k, PrimitiveValue::Int32(5))
        .unwrap();
    let TypeNode::Structure(structure) = ty else {
        unreachable!()
    };
    let compound = CompoundRegister::new(structure, vec![rx, rk]).unwrap();
    allocator.bind(&pair, Rc::new(compound.into())).unwrap();

    // Freeing the pair releases the shared hardware leaf once and skips the constant.
    allocator.free(&pair).unwrap();

    assert_eq!(allocator.resolver().frees.len(), 1);
    assert_eq!(allocator.resolver().allocations.len(), 1);
}

#[test]
fn test_bind_merges_join_registers() {
    let mut allocator = RegisterAllocator::new(RecordingResolver::default());
    let left = Value::new(0, i32_ty());
    let phi = Value::new(1, i32_ty());

    let r = allocator.allocate(&left).unwrap();
    allocator.bind(&phi, r.clone()).unwrap();

    assert!(Rc::ptr_eq(&allocator.load(&phi).unwrap(), &r));
    assert_eq!(
        allocator.load_hardware(&phi).unwrap().kind(),
        VirtualRegisterKind::Int32
    );
    assert_eq!(allocator.resolver().allocations.len(), 1);
}

#[test]
fn test_register_file_reuse_across_values() {
    let resolver = RegisterFileResolver::new(RegisterFileConfig {
        general: 2,
        float: 2,
        pointer_width: PointerWidth::Bits32,
    });
    let mut allocator = RegisterAllocator::new(resolver);
    let a = Value::new(0, point_ty());
    let b = Value::new(1, i32_ty());

    allocator.allocate(&a).unwrap();
    assert!(matches!(
        allocator.allocate(&b),
        Err(Error::RegisterFileExhausted { .. })
    ));

    allocator.free(&a).unwrap();
    let rb = allocator.allocate(&b).unwrap();

    assert_eq!(allocator.load_hardware(&b).unwrap().index(), 0);
    assert_eq!(rb.basic_value_type(), BasicValueType::Int32);
    let file = allocator.into_resolver();
    assert_eq!(file.in_use(RegisterFileKind::General), 1);
    assert_eq!(file.high_water_mark(RegisterFileKind::General), 2);
}

#[test]
fn test_view_must_be_lowered() {
    let mut allocator = RegisterAllocator::new(VirtualRegisterResolver::default());
    let view = TypeNode::View(regbind::ir::PointerType::new(
        i32_ty(),
        regbind::ir::AddressSpace::Global,
    ));
    let v = Value::new(0, TypeNode::structure([i32_ty(), view]));

    let err = allocator.allocate(&v).unwrap_err();

    assert!(matches!(err, Error::UnsupportedType { .. }));
    assert!(err.is_internal());
    assert_eq!(allocator.resolver().num_freed(), 1);
    assert_eq!(allocator.num_bindings(), 0);
}

#[test]
fn test_load_variant_mismatch() {
    let mut allocator = RegisterAllocator::new(VirtualRegisterResolver::default());
    let v = Value::new(0, point_ty());
    allocator.allocate(&v).unwrap();

    assert!(matches!(
        allocator.load_hardware(&v),
        Err(Error::UnexpectedRegister {
            expected: "hardware",
            found: "compound",
            ..
        })
    ));
    assert!(allocator.load_primitive(&v).is_err());
}
