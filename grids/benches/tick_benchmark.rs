// Flocking-style tick loop: move every element, relocate it, tighten, then
// query the neighbourhood of each element.
use grids::grid::{Config, Element, LooseDoubleGrid, LooseTightGrid, SpatialGrid, UniformGrid};
use grids::shapes::Aabb;
use rand::prelude::*;
use std::env;
use std::time::{Duration, Instant};

const COUNT: u32 = 20_000;
const ARENA_WIDTH: f32 = 4000.0;
const ARENA_HEIGHT: f32 = 4000.0;
const MAX_SIZE: u32 = 8;
const CELL_SIZE: f32 = 16.0;
const COARSE_SIZE: f32 = 128.0;
const MAX_SPEED: f32 = 2.0;
const VISION: f32 = 24.0;
const MEASURE_TICKS: usize = 200;
const SEED: u64 = 36207250;

#[derive(Clone, Copy)]
struct Velocity {
    vx: f32,
    vy: f32,
}

fn step(elt: &Element, velocity: &mut Velocity) -> (f32, f32) {
    let mut x = elt.x + velocity.vx;
    let mut y = elt.y + velocity.vy;
    let max_x = ARENA_WIDTH - elt.width as f32;
    let max_y = ARENA_HEIGHT - elt.height as f32;
    if x < 0.0 {
        x = 0.0;
        velocity.vx = velocity.vx.abs();
    } else if x > max_x {
        x = max_x;
        velocity.vx = -velocity.vx.abs();
    }
    if y < 0.0 {
        y = 0.0;
        velocity.vy = velocity.vy.abs();
    } else if y > max_y {
        y = max_y;
        velocity.vy = -velocity.vy.abs();
    }
    (x, y)
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn run<G: SpatialGrid>(name: &str, mut grid: G, ticks: usize) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut store: Vec<Element> = Vec::with_capacity(COUNT as usize);
    let mut velocities = Vec::with_capacity(COUNT as usize);
    let arena = Aabb::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT);

    let start = Instant::now();
    for id in 0..COUNT {
        let width = rng.gen_range(2..=MAX_SIZE);
        let height = rng.gen_range(2..=MAX_SIZE);
        let (x, y) = arena.get_random_anchor_inside(width as f32, height as f32, &mut rng);
        store.push(Element::new(id, x, y, width, height));
        velocities.push(Velocity {
            vx: rng.gen_range(-MAX_SPEED..MAX_SPEED),
            vy: rng.gen_range(-MAX_SPEED..MAX_SPEED),
        });
        grid.insert(&mut store, id);
    }
    let insert_time = start.elapsed();

    let mut relocate_total = Duration::ZERO;
    let mut tighten_total = Duration::ZERO;
    let mut query_total = Duration::ZERO;
    let mut neighbours = 0usize;
    let mut results = Vec::new();

    for _ in 0..ticks {
        let start = Instant::now();
        for index in 0..COUNT {
            let elt = store[index as usize];
            let (to_x, to_y) = step(&elt, &mut velocities[index as usize]);
            store[index as usize].set_position(to_x, to_y);
            if let Err(err) = grid.relocate(&mut store, index, elt.x, elt.y, to_x, to_y) {
                panic!("{} relocate failed: {}", name, err);
            }
        }
        relocate_total += start.elapsed();

        let start = Instant::now();
        grid.tighten(&store);
        tighten_total += start.elapsed();

        let start = Instant::now();
        for index in 0..COUNT {
            let elt = &store[index as usize];
            let area = Aabb::from_anchor(elt.x, elt.y, elt.width as f32, elt.height as f32)
                .inflate(VISION, VISION);
            grid.query(&store, area, Some(elt.id), &mut results);
            neighbours += results.len();
        }
        query_total += start.elapsed();
    }

    let ticks_f = ticks.max(1) as f64;
    println!();
    println!("{}:", name);
    println!("Insert: {:.02}ms", duration_ms(insert_time));
    println!("Relocate: {:.02}ms", duration_ms(relocate_total) / ticks_f);
    println!("Tighten: {:.02}ms", duration_ms(tighten_total) / ticks_f);
    println!("Queries: {:.02}ms", duration_ms(query_total) / ticks_f);
    println!("Avg neighbours: {:.02}", neighbours as f64 / (ticks_f * COUNT as f64));
}

fn main() {
    let ticks = env::var("GRIDS_BENCH_TICKS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(MEASURE_TICKS);
    let only = env::var("GRIDS_BENCH_GRID").ok();
    let selected = |name: &str| only.as_deref().map_or(true, |only| only == name);

    println!("Simulation settings:");
    println!("Element count:    {}", COUNT);
    println!("Arena size:       {:.01} x {:.01}", ARENA_WIDTH, ARENA_HEIGHT);
    println!("Cell size:        {:.01} (coarse {:.01})", CELL_SIZE, COARSE_SIZE);
    println!("Seed:             {}", SEED);
    println!("Measure ticks:    {}", ticks);

    let config = Config {
        coarse_capacity: 16,
        ..Default::default()
    };

    if selected("uniform") {
        let grid = UniformGrid::new_with_config(
            MAX_SIZE,
            MAX_SIZE,
            CELL_SIZE,
            CELL_SIZE,
            ARENA_WIDTH,
            ARENA_HEIGHT,
            config.clone(),
        )
        .unwrap();
        run("uniform", grid, ticks);
    }
    if selected("loose_tight") {
        let grid = LooseTightGrid::new_with_config(
            CELL_SIZE,
            CELL_SIZE,
            ARENA_WIDTH,
            ARENA_HEIGHT,
            config.clone(),
        )
        .unwrap();
        run("loose_tight", grid, ticks);
    }
    if selected("loose_double") {
        let grid = LooseDoubleGrid::new_with_config(
            CELL_SIZE,
            CELL_SIZE,
            COARSE_SIZE,
            COARSE_SIZE,
            ARENA_WIDTH,
            ARENA_HEIGHT,
            config,
        )
        .unwrap();
        run("loose_double", grid, ticks);
    }
}
