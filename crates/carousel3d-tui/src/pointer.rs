//! Terminal mouse events to carousel gesture events

use carousel3d_core::GestureEvent;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Tracks a left-button drag and reports cumulative deltas in carousel units
#[derive(Debug, Clone)]
pub struct PointerTracker {
    units_per_column: f64,
    units_per_row: f64,
    origin: Option<(u16, u16)>,
}

impl PointerTracker {
    pub fn new(units_per_column: f64, units_per_row: f64) -> Self {
        Self {
            units_per_column,
            units_per_row,
            origin: None,
        }
    }

    /// Whether the left button is currently held
    pub fn is_pressed(&self) -> bool {
        self.origin.is_some()
    }

    /// Translate one mouse event; anything but the left button is ignored
    pub fn handle(&mut self, event: &MouseEvent) -> Option<GestureEvent> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                Some(GestureEvent::Start)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (dx, dy) = self.delta(event)?;
                Some(GestureEvent::Move { dx, dy })
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (dx, dy) = self.delta(event)?;
                self.origin = None;
                Some(GestureEvent::Release { dx, dy })
            }
            _ => None,
        }
    }

    /// Forget a press whose release will never arrive
    pub fn cancel(&mut self) {
        self.origin = None;
    }

    fn delta(&self, event: &MouseEvent) -> Option<(f64, f64)> {
        let (col, row) = self.origin?;
        let dx = (f64::from(event.column) - f64::from(col)) * self.units_per_column;
        let dy = (f64::from(event.row) - f64::from(row)) * self.units_per_row;
        Some((dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_drag_reports_cumulative_delta() {
        let mut tracker = PointerTracker::new(10.0, 20.0);
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 10)),
            Some(GestureEvent::Start)
        );
        assert!(tracker.is_pressed());
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Drag(MouseButton::Left), 35, 10)),
            Some(GestureEvent::Move { dx: -50.0, dy: 0.0 })
        );
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Drag(MouseButton::Left), 30, 12)),
            Some(GestureEvent::Move { dx: -100.0, dy: 40.0 })
        );
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 30, 12)),
            Some(GestureEvent::Release { dx: -100.0, dy: 40.0 })
        );
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut tracker = PointerTracker::new(10.0, 20.0);
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5)),
            None
        );
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 5, 5)),
            None
        );
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut tracker = PointerTracker::new(10.0, 20.0);
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Down(MouseButton::Right), 5, 5)),
            None
        );
        assert_eq!(tracker.handle(&mouse(MouseEventKind::ScrollDown, 5, 5)), None);
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_cancel_drops_press() {
        let mut tracker = PointerTracker::new(10.0, 20.0);
        tracker.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
        tracker.cancel();
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 9, 1)),
            None
        );
    }
}
