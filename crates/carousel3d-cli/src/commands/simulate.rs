use anyhow::{bail, Result};
use serde::Serialize;

use carousel3d_core::{
    AppConfig, Axis, Carousel, GestureEvent, ScrollDirection, SwipeDirection, Vec2, Viewport,
};

/// Simulated frame interval in seconds
const FRAME_DT: f64 = 1.0 / 60.0;
/// Give up on a spring that has not settled after this many frames
const MAX_FRAMES: usize = 60 * 30;
/// Intermediate move events between start and release
const MOVE_STEPS: usize = 5;

const DEFAULT_WIDTH: f64 = 400.0;
const DEFAULT_HEIGHT: f64 = 600.0;

pub struct SimulateOptions {
    pub items: usize,
    pub dx: f64,
    pub dy: f64,
    pub loop_enabled: bool,
    pub direction: Option<ScrollDirection>,
    pub current: usize,
    pub json: bool,
}

/// Where a replayed drag ended up
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub from: usize,
    pub direction: SwipeDirection,
    pub index: usize,
    pub axis: Axis,
    pub settled_offset: Vec2,
    pub frames: usize,
    pub seconds: f64,
}

pub fn run(config: &AppConfig, options: SimulateOptions) -> Result<()> {
    let report = simulate(config, &options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} -> {} ({} swipe on {} axis)",
            report.from,
            report.index,
            report.direction,
            report.axis.as_str()
        );
        println!(
            "settled at ({:.2}, {:.2}) after {} frames ({:.2}s)",
            report.settled_offset.x, report.settled_offset.y, report.frames, report.seconds
        );
    }
    Ok(())
}

fn simulate(config: &AppConfig, options: &SimulateOptions) -> Result<SimulationReport> {
    let mut carousel_config = config.carousel.clone();
    carousel_config.loop_enabled |= options.loop_enabled;
    if let Some(direction) = options.direction {
        carousel_config.scroll_direction = direction;
    }

    let viewport = Viewport::new(
        carousel_config.custom_width.unwrap_or(DEFAULT_WIDTH),
        carousel_config.custom_height.unwrap_or(DEFAULT_HEIGHT),
    )?;
    let mut carousel = Carousel::new(options.items, viewport, carousel_config);
    carousel.jump_to(options.current);
    let from = carousel.current_index();

    carousel.handle_gesture(GestureEvent::Start);
    for step in 1..=MOVE_STEPS {
        let t = step as f64 / MOVE_STEPS as f64;
        carousel.handle_gesture(GestureEvent::Move {
            dx: options.dx * t,
            dy: options.dy * t,
        });
    }
    let outcome = carousel.handle_gesture(GestureEvent::Release {
        dx: options.dx,
        dy: options.dy,
    });

    let mut frames = 0;
    while carousel.tick(FRAME_DT) {
        frames += 1;
        if frames >= MAX_FRAMES {
            bail!("Spring did not settle within {} frames", MAX_FRAMES);
        }
    }

    let (direction, index) = match outcome {
        Some(o) => (o.direction, o.index),
        None => (SwipeDirection::None, carousel.current_index()),
    };

    Ok(SimulationReport {
        from,
        direction,
        index,
        axis: carousel.axis(),
        settled_offset: carousel.offset(),
        frames,
        seconds: frames as f64 * FRAME_DT,
    })
}
