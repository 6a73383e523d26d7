//! Benchmarks for recording annotations.
//!
//! Measures the cost of the full effect sequence (introspection, option merge, hook dispatch,
//! registry insertion) for the different declaration sites, and of the method merge under
//! repeated upserts.

extern crate attrscope;

use std::{collections::HashMap, hint::black_box, sync::Arc};

use attrscope::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};

fn described() -> (AnnotationContext, TypeHandle) {
    let table = Arc::new(DescriptorTable::new());
    let ty = TypeHandle::new("BenchController");
    let _ = table
        .describe(&ty)
        .constructor([PrimitiveKind::String.into()])
        .property("name", PrimitiveKind::String)
        .method(
            "update",
            [PrimitiveKind::U64.into(), PrimitiveKind::String.into()],
            Some(PrimitiveKind::Bool.into()),
        );
    let ctx = AnnotationContext::new(table).with_config(AnnotationConfig::minimal());
    (ctx, ty)
}

/// Class-level annotation with key index registration
fn bench_class_annotation(c: &mut Criterion) {
    let (ctx, ty) = described();
    let controller = ClassAnnotation::new(&ctx, "controller");

    c.bench_function("annotate_class", |b| {
        b.iter(|| {
            let record = controller
                .apply(black_box(&ty), AnnotationOptions::new().with_arg("/users"))
                .unwrap();
            black_box(record)
        });
    });
}

/// Property annotation with a declared type lookup
fn bench_property_annotation(c: &mut Criterion) {
    let (ctx, ty) = described();
    let column = PropertyAnnotation::new(&ctx, "column");

    c.bench_function("annotate_property", |b| {
        b.iter(|| {
            let record = column
                .apply(
                    black_box(&ty),
                    "name",
                    MemberScope::Instance,
                    AnnotationOptions::new(),
                )
                .unwrap();
            black_box(record)
        });
    });
}

/// Method and parameter annotations merging into one record
fn bench_method_merge(c: &mut Criterion) {
    let (ctx, ty) = described();
    let put = MethodAnnotation::new(&ctx, "put");
    let param = ParameterAnnotation::new(&ctx, "param");
    let descriptor = MethodDescriptor::new(MethodAttributes::empty());

    c.bench_function("annotate_method_merge", |b| {
        b.iter(|| {
            param
                .apply(
                    black_box(&ty),
                    Some("update"),
                    MemberScope::Instance,
                    0,
                    AnnotationOptions::new(),
                )
                .unwrap();
            let record = put
                .apply(
                    black_box(&ty),
                    "update",
                    MemberScope::Instance,
                    descriptor,
                    AnnotationOptions::new().with_arg("/users/:id"),
                )
                .unwrap();
            black_box(record)
        });
    });
}

/// Class annotation with site and global hooks installed
fn bench_hooked_annotation(c: &mut Criterion) {
    let (ctx, ty) = described();
    ctx.set_global_before_handlers(HashMap::from([(
        AnnotationKey::from("audited"),
        hook(|decoration| {
            black_box(decoration.kind());
            Ok(())
        }),
    )]))
    .unwrap();
    let audited = ClassAnnotation::new(&ctx, "audited").after(|decoration| {
        black_box(decoration.target());
        Ok(())
    });

    c.bench_function("annotate_class_hooked", |b| {
        b.iter(|| {
            let record = audited
                .apply(black_box(&ty), AnnotationOptions::new())
                .unwrap();
            black_box(record)
        });
    });
}

/// Registry lookup for a known type
fn bench_registry_lookup(c: &mut Criterion) {
    let (ctx, ty) = described();
    let others: Vec<TypeHandle> = (0..256)
        .map(|i| TypeHandle::new(format!("Type{i}")))
        .collect();
    for other in &others {
        let _ = ctx.registry_for(other);
    }

    c.bench_function("registry_for", |b| {
        b.iter(|| black_box(ctx.registry_for(black_box(&ty))));
    });
}

criterion_group!(
    benches,
    bench_class_annotation,
    bench_property_annotation,
    bench_method_merge,
    bench_hooked_annotation,
    bench_registry_lookup
);
criterion_main!(benches);
