use std::fmt::Write;

use anyhow::Result;

use carousel3d_core::{AppConfig, Axis, GeometryTable, ItemFrame, TransformEngine, Vec2, Viewport};

/// Cell size used when neither the flag nor the config gives one
const DEFAULT_WIDTH: f64 = 400.0;
const DEFAULT_HEIGHT: f64 = 600.0;

pub struct InspectOptions {
    pub items: usize,
    pub offset_x: f64,
    pub offset_y: f64,
    pub axis: Axis,
    pub loop_enabled: bool,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub json: bool,
}

pub fn run(config: &AppConfig, options: InspectOptions) -> Result<()> {
    let frames = frames(config, &options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
    } else {
        print!("{}", render_text(&frames));
    }
    Ok(())
}

fn frames(config: &AppConfig, options: &InspectOptions) -> Result<Vec<ItemFrame>> {
    let mut carousel = config.carousel.clone();
    carousel.loop_enabled |= options.loop_enabled;

    let width = options
        .width
        .or(carousel.custom_width)
        .unwrap_or(DEFAULT_WIDTH);
    let height = options
        .height
        .or(carousel.custom_height)
        .unwrap_or(DEFAULT_HEIGHT);
    let viewport = Viewport::new(width, height)?;

    let engine = TransformEngine::new(GeometryTable::new(options.items, viewport), &carousel);
    tracing::debug!(
        items = options.items,
        x = options.offset_x,
        y = options.offset_y,
        looping = engine.loops(),
        "Inspecting transforms"
    );
    Ok(engine.frames(Vec2::new(options.offset_x, options.offset_y), options.axis))
}

fn render_text(frames: &[ItemFrame]) -> String {
    let mut out = String::new();
    for frame in frames {
        let marker = if frame.transform.is_visible() { ' ' } else { '-' };
        // writing to a String cannot fail
        let _ = writeln!(
            out,
            "{}#{:<3} z={:<3} {}",
            marker, frame.index, frame.z_order, frame.transform
        );
    }
    out
}
