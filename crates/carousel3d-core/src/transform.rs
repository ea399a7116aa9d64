//! Per-item 3D transform derivation
//!
//! Each item owns four interpolations per axis, all keyed on the live offset:
//! a pre-rotation translate, a rotation, a post-rotation "hinge" translate
//! and an opacity. Together they swing cards around a shared edge as the
//! offset sweeps past them.

use std::fmt;

use serde::Serialize;

use crate::config::{CarouselConfig, FadeConfig, PerspectiveConfig};
use crate::geometry::GeometryTable;
use crate::gesture::Axis;
use crate::motion::{interpolate, interpolate_wrapped, Vec2};

/// Maximum card rotation in degrees
pub const MAX_ROTATION_DEG: f64 = 60.0;

/// Distance inside each cell edge where the hinge translate breaks
const HINGE_EPSILON: f64 = 0.1;

/// Opacity at the fade breakpoints
const FADE_SHOULDER: f64 = 0.6;

/// A single transform operation, applied in list order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformOp {
    Perspective(f64),
    TranslateX(f64),
    TranslateY(f64),
    /// Degrees
    RotateX(f64),
    /// Degrees
    RotateY(f64),
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformOp::Perspective(d) => write!(f, "perspective({:.2})", d),
            TransformOp::TranslateX(v) => write!(f, "translateX({:.2})", v),
            TransformOp::TranslateY(v) => write!(f, "translateY({:.2})", v),
            TransformOp::RotateX(deg) => write!(f, "rotateX({:.2}deg)", deg),
            TransformOp::RotateY(deg) => write!(f, "rotateY({:.2}deg)", deg),
        }
    }
}

/// Transform descriptor handed to the renderer for one item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTransform {
    pub axis: Axis,
    /// perspective, translate, rotate, translate
    pub transform: [TransformOp; 4],
    pub opacity: f64,
}

impl ItemTransform {
    pub fn perspective(&self) -> f64 {
        match self.transform[0] {
            TransformOp::Perspective(d) => d,
            _ => 0.0,
        }
    }

    /// Rotation in degrees, about Y for horizontal and about X for vertical
    pub fn rotation(&self) -> f64 {
        match self.transform[2] {
            TransformOp::RotateX(deg) | TransformOp::RotateY(deg) => deg,
            _ => 0.0,
        }
    }

    pub fn translate(&self) -> f64 {
        match self.transform[1] {
            TransformOp::TranslateX(v) | TransformOp::TranslateY(v) => v,
            _ => 0.0,
        }
    }

    pub fn translate_after_rotate(&self) -> f64 {
        match self.transform[3] {
            TransformOp::TranslateX(v) | TransformOp::TranslateY(v) => v,
            _ => 0.0,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

impl fmt::Display for ItemTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.transform {
            write!(f, "{} ", op)?;
        }
        write!(f, "opacity({:.3})", self.opacity)
    }
}

/// Where and how to draw one item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFrame {
    pub index: usize,
    /// Every item fills one full cell, absolutely positioned at the origin
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub transform: ItemTransform,
    /// Stacking rank, 0 at the back; more opaque items sit higher
    pub z_order: usize,
}

/// Fixed breakpoints for one channel, kept on the stack
#[derive(Debug, Clone, Copy)]
struct Breakpoints<const N: usize> {
    input: [f64; N],
    output: [f64; N],
}

impl<const N: usize> Breakpoints<N> {
    #[inline]
    fn new(input: [f64; N], output: [f64; N]) -> Self {
        debug_assert!(input.windows(2).all(|w| w[0] <= w[1]));
        Self { input, output }
    }

    #[inline]
    fn at(&self, x: f64) -> f64 {
        interpolate(&self.input, &self.output, x)
    }

    #[inline]
    fn at_wrapped(&self, x: f64, period: f64) -> f64 {
        interpolate_wrapped(&self.input, &self.output, x, period)
    }
}

/// The four channels for one item on one axis
#[derive(Debug, Clone, Copy)]
struct Channels {
    translate: Breakpoints<3>,
    rotate: Breakpoints<3>,
    translate_after: Breakpoints<5>,
    opacity: Breakpoints<5>,
}

/// Maps the live offset onto every item's transform
#[derive(Debug, Clone)]
pub struct TransformEngine {
    geometry: GeometryTable,
    perspective: PerspectiveConfig,
    fade: FadeConfig,
    loop_enabled: bool,
}

impl TransformEngine {
    pub fn new(geometry: GeometryTable, config: &CarouselConfig) -> Self {
        Self {
            geometry,
            perspective: config.perspective,
            fade: config.fade,
            loop_enabled: config.loop_enabled,
        }
    }

    pub fn geometry(&self) -> &GeometryTable {
        &self.geometry
    }

    /// Whether horizontal interpolation wraps; a single item never loops
    #[inline]
    pub fn loops(&self) -> bool {
        self.loop_enabled && self.geometry.count() > 1
    }

    /// Transform of item `index` for the given live offset
    ///
    /// Pure in `(index, offset, axis)`: repeated calls return identical results.
    pub fn transform_for(&self, index: usize, offset: Vec2, axis: Axis) -> ItemTransform {
        match axis {
            Axis::Horizontal => {
                let width = self.geometry.width();
                let ch = self.channels_x(index);
                let x = offset.x;
                ItemTransform {
                    axis,
                    transform: [
                        TransformOp::Perspective(width),
                        TransformOp::TranslateX(self.eval_x(&ch.translate, x)),
                        TransformOp::RotateY(self.eval_x(&ch.rotate, x)),
                        TransformOp::TranslateX(self.eval_x(&ch.translate_after, x)),
                    ],
                    opacity: self.eval_x(&ch.opacity, x),
                }
            }
            Axis::Vertical => {
                let height = self.geometry.height();
                let ch = self.channels_y(index);
                ItemTransform {
                    axis,
                    transform: [
                        TransformOp::Perspective(height),
                        TransformOp::TranslateY(ch.translate.at(offset.y)),
                        TransformOp::RotateX(ch.rotate.at(offset.y)),
                        TransformOp::TranslateY(ch.translate_after.at(offset.y)),
                    ],
                    opacity: ch.opacity.at(offset.y),
                }
            }
        }
    }

    /// One frame per item in list order, with stacking ranks assigned
    pub fn frames(&self, offset: Vec2, axis: Axis) -> Vec<ItemFrame> {
        let mut frames: Vec<ItemFrame> = (0..self.geometry.count())
            .map(|index| ItemFrame {
                index,
                width: self.geometry.width(),
                height: self.geometry.height(),
                transform: self.transform_for(index, offset, axis),
                z_order: 0,
            })
            .collect();

        let mut ranked: Vec<usize> = (0..frames.len()).collect();
        ranked.sort_by(|&a, &b| {
            frames[a]
                .transform
                .opacity
                .total_cmp(&frames[b].transform.opacity)
                .then(a.cmp(&b))
        });
        for (z, index) in ranked.into_iter().enumerate() {
            frames[index].z_order = z;
        }
        frames
    }

    /// Horizontal channels wrap when looping
    #[inline]
    fn eval_x<const N: usize>(&self, f: &Breakpoints<N>, x: f64) -> f64 {
        if self.loops() {
            f.at_wrapped(x, self.geometry.loop_period_x())
        } else {
            f.at(x)
        }
    }

    /// Breakpoints for the horizontal channel of item `index`
    fn channels_x(&self, index: usize) -> Channels {
        let size = self.geometry.width();
        let page = self.geometry.page_x(index);
        let k = self.perspective.rotation_factor;
        let around = [page - size, page, page + size];

        Channels {
            translate: Breakpoints::new(around, [-size / k, 0.0, size / k]),
            rotate: Breakpoints::new(around, [-MAX_ROTATION_DEG, 0.0, MAX_ROTATION_DEG]),
            translate_after: self.hinge(page, size),
            opacity: fade(page, size, self.fade.fade_in_x, self.fade.fade_out_x),
        }
    }

    /// Breakpoints for the vertical channel of item `index`
    fn channels_y(&self, index: usize) -> Channels {
        let size = self.geometry.height();
        let page = self.geometry.page_y(index);
        let k = self.perspective.rotation_factor;
        let around = [page - size, page, page + size];

        Channels {
            translate: Breakpoints::new(around, [-size / k, 0.0, size / k]),
            rotate: Breakpoints::new(around, [MAX_ROTATION_DEG, 0.0, -MAX_ROTATION_DEG]),
            translate_after: self.hinge(page, size),
            opacity: fade(page, size, self.fade.fade_in_y, self.fade.fade_out_y),
        }
    }

    fn hinge(&self, page: f64, size: f64) -> Breakpoints<5> {
        let edge = size + 1.0;
        let k2 = self.perspective.depth_factor;
        Breakpoints::new(
            [
                page - size,
                page - size + HINGE_EPSILON,
                page,
                page + size - HINGE_EPSILON,
                page + size,
            ],
            [-edge, -edge / k2, 0.0, edge / k2, edge],
        )
    }
}

fn fade(page: f64, size: f64, fade_in: f64, fade_out: f64) -> Breakpoints<5> {
    // keep the shoulders inside the cell so the domain stays ordered
    let limit = size * 0.9;
    let fade_in = fade_in.clamp(0.0, limit);
    let fade_out = fade_out.clamp(0.0, limit);
    Breakpoints::new(
        [
            page - size,
            page - size + fade_in,
            page,
            page + size - fade_out,
            page + size,
        ],
        [0.0, FADE_SHOULDER, 1.0, FADE_SHOULDER, 0.0],
    )
}
