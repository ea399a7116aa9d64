//! Perspective projection of a card's two hinge edges
//!
//! A card is a flat `width x height` rectangle centered on the origin. Its
//! transform list is applied right to left to each point, then divided by
//! the perspective term, the same way a CSS transform chain is.

use carousel3d_core::{Axis, ItemFrame};

/// Cards whose perspective divisor falls below this are behind the eye
const MIN_DIVISOR: f64 = 0.05;

/// One projected edge of a card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Position along the swipe axis, in carousel units from the center
    pub along: f64,
    /// Half the card's extent across the swipe axis at this edge
    pub half_across: f64,
}

/// A card flattened onto the screen as a trapezoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedCard {
    pub index: usize,
    pub axis: Axis,
    pub opacity: f64,
    /// Edge with the smaller `along`
    pub near: Edge,
    pub far: Edge,
}

impl ProjectedCard {
    /// Half extent across the axis at `along`, linear between the edges
    pub fn half_across_at(&self, along: f64) -> f64 {
        let span = self.far.along - self.near.along;
        if span.abs() < f64::EPSILON {
            return self.near.half_across.max(self.far.half_across);
        }
        let t = ((along - self.near.along) / span).clamp(0.0, 1.0);
        self.near.half_across + (self.far.half_across - self.near.half_across) * t
    }

    pub fn center(&self) -> f64 {
        (self.near.along + self.far.along) / 2.0
    }
}

/// Project a frame; `None` when invisible or folded behind the viewer
pub fn project(frame: &ItemFrame) -> Option<ProjectedCard> {
    let t = &frame.transform;
    if !t.is_visible() {
        return None;
    }

    let (length, cross) = match t.axis {
        Axis::Horizontal => (frame.width, frame.height),
        Axis::Vertical => (frame.height, frame.width),
    };
    let depth = t.perspective();
    let theta = t.rotation().to_radians();
    // rotateX tilts the far edge toward the viewer with the opposite sign of rotateY
    let tilt = match t.axis {
        Axis::Horizontal => -theta.sin(),
        Axis::Vertical => theta.sin(),
    };

    let edge = |local: f64| -> Option<Edge> {
        let shifted = local + t.translate_after_rotate();
        let along = shifted * theta.cos() + t.translate();
        let z = shifted * tilt;
        let divisor = if depth > 0.0 { 1.0 - z / depth } else { 1.0 };
        if divisor < MIN_DIVISOR {
            return None;
        }
        Some(Edge {
            along: along / divisor,
            half_across: cross / 2.0 / divisor,
        })
    };

    let a = edge(-length / 2.0)?;
    let b = edge(length / 2.0)?;
    let (near, far) = if a.along <= b.along { (a, b) } else { (b, a) };

    Some(ProjectedCard {
        index: frame.index,
        axis: t.axis,
        opacity: t.opacity,
        near,
        far,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel3d_core::{Carousel, CarouselConfig, GestureEvent, ScrollDirection, Viewport};

    fn carousel(direction: ScrollDirection) -> Carousel {
        let config = CarouselConfig {
            scroll_direction: direction,
            ..Default::default()
        };
        Carousel::new(3, Viewport::new(400.0, 300.0).unwrap(), config)
    }

    #[test]
    fn test_centered_card_projects_flat() {
        let c = carousel(ScrollDirection::Horizontal);
        let card = project(&c.frames()[0]).unwrap();
        assert!((card.near.along + 200.0).abs() < 1e-9);
        assert!((card.far.along - 200.0).abs() < 1e-9);
        assert!((card.near.half_across - 150.0).abs() < 1e-9);
        assert!((card.half_across_at(0.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_offscreen_cards_are_skipped() {
        let c = carousel(ScrollDirection::Horizontal);
        assert!(project(&c.frames()[2]).is_none());
    }

    #[test]
    fn test_swinging_cards_sit_on_either_side() {
        let mut c = carousel(ScrollDirection::Horizontal);
        c.handle_gesture(GestureEvent::Start);
        c.handle_gesture(GestureEvent::Move { dx: -200.0, dy: 0.0 });

        let frames = c.frames();
        let outgoing = project(&frames[0]).unwrap();
        let incoming = project(&frames[1]).unwrap();
        assert!(outgoing.center() < 0.0);
        assert!(incoming.center() > 0.0);
        // the shared edge is nearest the viewer, the outer edges recede
        assert!(outgoing.far.half_across > outgoing.near.half_across);
        assert!(incoming.near.half_across > incoming.far.half_across);
        assert!((outgoing.far.along - incoming.near.along).abs() < 1.0);
    }

    #[test]
    fn test_vertical_cards_project_along_y() {
        let c = carousel(ScrollDirection::Vertical);
        let card = project(&c.frames()[0]).unwrap();
        assert_eq!(card.axis, Axis::Vertical);
        assert!((card.far.along - 150.0).abs() < 1e-9);
        assert!((card.near.half_across - 200.0).abs() < 1e-9);
    }
}
