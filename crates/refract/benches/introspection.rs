use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use refract::{
    catalog, impl_structural, matcher, AbstractTuple, Describe, FromValue, IntoValue, ObjectHandle,
    Pair, TypeDescriptor, TypeKind, Value,
};

#[derive(Clone)]
struct Sample {
    id: i64,
    label: String,
    weight: f64,
    tags: Vec<String>,
}

impl Describe for Sample {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Sample>("Sample")
            .field_mut(
                "id",
                TypeKind::LONG,
                |s| s.id.into_value(),
                |s, v| {
                    s.id = i64::from_value(v)?;
                    Ok(())
                },
            )
            .field("label", TypeKind::Str, |s| s.label.clone().into_value())
            .field("weight", TypeKind::DOUBLE, |s| s.weight.into_value())
            .field("tags", TypeKind::List, |s| s.tags.clone().into_value())
            .constructor(vec![], |_| Ok(sample(0)))
            .constructor(vec![TypeKind::LONG], |args| Ok(sample(args.take()?)))
            .constructor(vec![TypeKind::Str], |args| {
                let mut s = sample(0);
                s.label = args.take()?;
                Ok(s)
            })
            .constructor(vec![TypeKind::Any], |_| Ok(sample(-1)))
            .build()
    }
}

impl_structural!(Sample);

fn sample(id: i64) -> Sample {
    Sample {
        id,
        label: format!("sample-{}", id),
        weight: id as f64 * 0.5,
        tags: vec!["a".into(), "b".into(), "c".into()],
    }
}

fn bench_catalog(c: &mut Criterion) {
    let ty = Sample::descriptor();
    c.bench_function("catalog_fields", |b| {
        b.iter(|| catalog::fields(black_box(&ty)).len());
    });
}

fn bench_matcher(c: &mut Criterion) {
    let ty = Sample::descriptor();
    let mut group = c.benchmark_group("select_constructor");

    let cases = [
        ("long", vec![Value::Int(7)]),
        ("text", vec![Value::Str("x".into())]),
        ("any", vec![Value::Bool(true)]),
    ];
    for (name, args) in cases.iter() {
        group.bench_with_input(BenchmarkId::new("arity_1", name), args, |b, args| {
            b.iter(|| matcher::select("Sample", ty.constructors(), black_box(args)).is_ok());
        });
    }

    group.finish();
}

fn bench_handle(c: &mut Criterion) {
    let handle = ObjectHandle::of(sample(1));
    c.bench_function("handle_field_value", |b| {
        b.iter(|| handle.field_value(black_box("weight")).unwrap());
    });
    c.bench_function("handle_set_field", |b| {
        b.iter(|| handle.set_field("id", black_box(Value::Long(2))).unwrap());
    });
}

fn bench_structural(c: &mut Criterion) {
    let a = sample(42);
    let b = sample(42);
    c.bench_function("structural_eq", |bench| {
        bench.iter(|| black_box(&a) == black_box(&b));
    });
    c.bench_function("print_object", |bench| {
        bench.iter(|| black_box(&a).to_string());
    });

    let pair = Pair::new(sample(1), sample(2));
    c.bench_function("tuple_filter", |bench| {
        bench.iter(|| pair.filter(|(l, r)| l.id < r.id).is_present());
    });
}

criterion_group!(
    benches,
    bench_catalog,
    bench_matcher,
    bench_handle,
    bench_structural
);
criterion_main!(benches);
