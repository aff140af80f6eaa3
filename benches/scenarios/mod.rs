//! Benchmarks for whole-block rendering.

mod render;

pub use render::bench_render;
