use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regbind::ir::{PrimitiveType, TypeNode, Value};
use regbind::regalloc::RegisterAllocator;
use regbind::targets::{RegisterFileResolver, VirtualRegisterResolver};

fn nested_struct() -> TypeNode {
    let vec3 = TypeNode::structure([
        TypeNode::from(PrimitiveType::F32),
        TypeNode::from(PrimitiveType::F32),
        TypeNode::from(PrimitiveType::F32),
    ]);
    TypeNode::structure([
        vec3.clone(),
        vec3,
        TypeNode::pointer_to(TypeNode::from(PrimitiveType::I8)),
        TypeNode::Padding(PrimitiveType::I32),
    ])
}

fn allocation_benchmark(c: &mut Criterion) {
    let ty = nested_struct();

    c.bench_function("allocate and free 256 nested structs", |b| {
        b.iter(|| {
            let mut allocator = RegisterAllocator::new(VirtualRegisterResolver::default());
            let values: Vec<_> = (0..256).map(|id| Value::new(id, ty.clone())).collect();
            for value in &values {
                black_box(allocator.allocate(value).unwrap());
            }
            for value in &values {
                allocator.free(value).unwrap();
            }
        })
    });

    c.bench_function("register file churn", |b| {
        b.iter(|| {
            let mut allocator = RegisterAllocator::new(RegisterFileResolver::default());
            for id in 0..1024 {
                let value = Value::new(id, TypeNode::from(PrimitiveType::I64));
                black_box(allocator.allocate(&value).unwrap());
                allocator.free(&value).unwrap();
            }
        })
    });
}

fn alias_benchmark(c: &mut Criterion) {
    c.bench_function("resolve 64-deep alias chain", |b| {
        let mut allocator = RegisterAllocator::new(VirtualRegisterResolver::default());
        let values: Vec<_> = (0..64)
            .map(|id| Value::new(id, TypeNode::from(PrimitiveType::I32)))
            .collect();
        // Alias each value to its successor before the successor is aliased,
        // so the stored chain stays 64 hops long.
        for pair in values.windows(2) {
            allocator.alias(&pair[0], &pair[1]).unwrap();
        }
        allocator.allocate(&values[63]).unwrap();

        b.iter(|| black_box(allocator.load(&values[0]).unwrap()))
    });
}

criterion_group!(benches, allocation_benchmark, alias_benchmark);
criterion_main!(benches);
