//! Dispatch overhead against a direct arm invocation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hydra::{args, dispatch, lineage, polymorphic, Arms, Hierarchy, Polymorphic};

#[derive(Default)]
struct Shape;

#[derive(Default)]
struct Circle {
    base: Shape,
}

#[derive(Default)]
struct Tool;

#[derive(Default)]
struct Brush {
    base: Tool,
}

polymorphic!(Shape);
polymorphic!(Circle: Shape, base);
polymorphic!(Tool);
polymorphic!(Brush: Tool, base);

struct Paint;

impl<'a, 'b> Arms<(&'a Shape, &'b Tool)> for Paint {
    type Output = u32;

    fn call(&mut self, _: (&Shape, &Tool)) -> u32 {
        0
    }
}

impl<'a, 'b> Arms<(&'a Shape, &'b Brush)> for Paint {
    type Output = u32;

    fn call(&mut self, _: (&Shape, &Brush)) -> u32 {
        1
    }
}

impl<'a, 'b> Arms<(&'a Circle, &'b Tool)> for Paint {
    type Output = u32;

    fn call(&mut self, _: (&Circle, &Tool)) -> u32 {
        2
    }
}

impl<'a, 'b> Arms<(&'a Circle, &'b Brush)> for Paint {
    type Output = u32;

    fn call(&mut self, _: (&Circle, &Brush)) -> u32 {
        3
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let shapes = Hierarchy::<lineage![Circle, Shape]>::new().unwrap();
    let tools = Hierarchy::<lineage![Brush, Tool]>::new().unwrap();

    let circle = Circle::default();
    let brush = Brush::default();

    c.bench_function("dispatch_2x2", |b| {
        let mut paint = Paint;
        let shape: &dyn Polymorphic = &circle;
        let tool: &dyn Polymorphic = &brush;
        b.iter(|| {
            dispatch(
                &mut paint,
                args![(&shapes, black_box(shape)), (&tools, black_box(tool))],
            )
            .unwrap()
        })
    });

    c.bench_function("direct_call", |b| {
        let mut paint = Paint;
        b.iter(|| paint.call((black_box(&circle), black_box(&brush))))
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
