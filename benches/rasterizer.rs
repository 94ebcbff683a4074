use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyshade::bench::{
    fill_polygon, fill_triangle, Bresenham, Dda, FrameBuffer, LineRasterizer, ScreenVertex,
};
use polyshade::colors::Color;
use polyshade::loader::grid_polygons;
use polyshade::math::vec3::Vec3;
use polyshade::{ColoringMode, Engine, RasterAlgorithm};

const BUFFER_WIDTH: usize = 800;
const BUFFER_HEIGHT: usize = 600;

fn vertex(x: f32, y: f32) -> ScreenVertex {
    ScreenVertex::new(x, y, 0.0, Color::RED)
}

fn benchmark_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("line");

    for (name, to) in [
        ("shallow", (750.0, 180.0)),
        ("steep", (180.0, 550.0)),
        ("diagonal", (550.0, 550.0)),
    ] {
        let a = vertex(20.0, 20.0);
        let b = vertex(to.0, to.1);

        group.bench_with_input(BenchmarkId::new("dda", name), &(a, b), |bench, (a, b)| {
            let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            bench.iter(|| Dda.draw_line(black_box(a), black_box(b), &mut fb));
        });

        group.bench_with_input(
            BenchmarkId::new("bresenham", name),
            &(a, b),
            |bench, (a, b)| {
                let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
                bench.iter(|| Bresenham.draw_line(black_box(a), black_box(b), &mut fb));
            },
        );
    }

    group.finish();
}

fn benchmark_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");

    let triangle = [vertex(50.0, 50.0), vertex(750.0, 100.0), vertex(400.0, 550.0)];
    let quad = [
        vertex(50.0, 50.0),
        vertex(750.0, 100.0),
        vertex(700.0, 550.0),
        vertex(80.0, 500.0),
    ];

    group.bench_function("triangle_split", |bench| {
        let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        bench.iter(|| fill_triangle(black_box(triangle), &Dda, &mut fb));
    });

    group.bench_function("quad_triangles", |bench| {
        let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        bench.iter(|| {
            fill_triangle([quad[0], quad[1], quad[2]], &Dda, &mut fb);
            fill_triangle([quad[0], quad[2], quad[3]], &Dda, &mut fb);
        });
    });

    group.bench_function("quad_active_edge_table", |bench| {
        let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        bench.iter(|| fill_polygon(black_box(&quad), &Dda, &mut fb));
    });

    group.finish();
}

/// Height field over an `n x n` grid.
fn wave_grid(n: usize) -> (Vec<Vec3>, Vec<Vec<usize>>) {
    let mut points = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let (x, y) = (col as f32, row as f32);
            points.push(Vec3::new(x, y, (x * 0.4).sin() * (y * 0.3).cos() * 3.0));
        }
    }
    (points, grid_polygons(n))
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_grid");
    let (points, polygons) = wave_grid(40);

    for mode in [
        ColoringMode::Wireframe,
        ColoringMode::FilledBySide,
        ColoringMode::FilledByVertex,
    ] {
        for algorithm in [RasterAlgorithm::Dda, RasterAlgorithm::Bresenham] {
            let mut engine = Engine::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            if engine.load_mesh(&points, &polygons).is_err() {
                continue;
            }
            engine.set_coloring_mode(mode);
            engine.set_raster_algorithm(algorithm);
            engine.rotate_camera(0.9, 0.4);

            group.bench_function(BenchmarkId::new(mode.to_string(), algorithm), |bench| {
                bench.iter(|| {
                    engine.render();
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_lines, benchmark_fill, benchmark_render);
criterion_main!(benches);
