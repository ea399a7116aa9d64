use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Block,
    Frame,
};

use carousel3d_core::Axis;

use crate::app::App;
use crate::projection::{project, ProjectedCard};
use crate::theme::GruvboxMaterial;

/// Labels are only drawn on cards at least this opaque
const LABEL_MIN_OPACITY: f64 = 0.6;

pub struct StageWidget;

impl StageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let background = Block::default().style(Style::default().bg(GruvboxMaterial::BG0));
        frame.render_widget(background, area);
        draw_cards(frame.buffer_mut(), area, app);
    }
}

/// Maps terminal cells to carousel units around the stage center
#[derive(Debug, Clone, Copy)]
struct StageMapping {
    center_x: f64,
    center_y: f64,
    units_per_column: f64,
    units_per_row: f64,
}

impl StageMapping {
    fn new(area: Rect, app: &App) -> Self {
        Self {
            center_x: f64::from(area.x) + f64::from(area.width) / 2.0,
            center_y: f64::from(area.y) + f64::from(area.height) / 2.0,
            units_per_column: app.ui.units_per_column,
            units_per_row: app.ui.units_per_row,
        }
    }

    /// Center of cell `(col, row)` in carousel units
    fn to_units(&self, col: u16, row: u16) -> (f64, f64) {
        (
            (f64::from(col) + 0.5 - self.center_x) * self.units_per_column,
            (f64::from(row) + 0.5 - self.center_y) * self.units_per_row,
        )
    }

    /// Cell containing the point `(x, y)` in carousel units
    fn to_cell(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.center_x + x / self.units_per_column,
            self.center_y + y / self.units_per_row,
        )
    }
}

/// Whether a card covers the point `(x, y)`
fn covers(card: &ProjectedCard, x: f64, y: f64) -> bool {
    let (along, across) = match card.axis {
        Axis::Horizontal => (x, y),
        Axis::Vertical => (y, x),
    };
    along >= card.near.along && along <= card.far.along && across.abs() <= card.half_across_at(along)
}

/// Paint every visible card back to front, each with its label
fn draw_cards(buf: &mut Buffer, area: Rect, app: &App) {
    let mapping = StageMapping::new(area, app);
    let cards = app
        .carousel
        .paint_order()
        .iter()
        .filter_map(project)
        .collect::<Vec<_>>();

    for card in &cards {
        let color = GruvboxMaterial::card(card.index, card.opacity);
        for row in area.top()..area.bottom() {
            for col in area.left()..area.right() {
                let (x, y) = mapping.to_units(col, row);
                if !covers(card, x, y) {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((col, row)) {
                    cell.set_symbol(" ");
                    cell.set_bg(color);
                }
            }
        }

        if card.opacity >= LABEL_MIN_OPACITY {
            if let Some(label) = app.items.get(card.index) {
                draw_label(buf, area, &mapping, card, label);
            }
        }
    }
}

fn draw_label(buf: &mut Buffer, area: Rect, mapping: &StageMapping, card: &ProjectedCard, label: &str) {
    let (x, y) = match card.axis {
        Axis::Horizontal => (card.center(), 0.0),
        Axis::Vertical => (0.0, card.center()),
    };
    let (col, row) = mapping.to_cell(x, y);

    // Keep the label inside the card's narrower edge
    let span = match card.axis {
        Axis::Horizontal => card.far.along - card.near.along,
        Axis::Vertical => 2.0 * card.near.half_across.min(card.far.half_across),
    };
    let cols_span = span / mapping.units_per_column;
    let max_width = (cols_span.floor() as usize).saturating_sub(2);
    if max_width == 0 {
        return;
    }

    let width = Line::from(label).width().min(max_width);
    let start = (col - width as f64 / 2.0).round();
    let row = row.floor();
    if start < f64::from(area.left()) || row < f64::from(area.top()) || row >= f64::from(area.bottom()) {
        return;
    }

    let style = Style::default()
        .fg(GruvboxMaterial::BG0)
        .bg(GruvboxMaterial::card(card.index, card.opacity))
        .add_modifier(Modifier::BOLD);
    let room = usize::from(area.right()).saturating_sub(start as usize);
    buf.set_stringn(start as u16, row as u16, label, max_width.min(room), style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel3d_core::{AppConfig, GestureEvent};
    use ratatui::style::Color;

    fn app() -> App {
        let items = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        App::new(items, &AppConfig::default(), 40, 21).unwrap()
    }

    fn render(app: &App) -> Buffer {
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        draw_cards(&mut buf, area, app);
        buf
    }

    fn row_text(buf: &Buffer, row: u16) -> String {
        (0..buf.area.width)
            .filter_map(|col| buf.cell((col, row)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_resting_card_fills_its_cell() {
        let app = app();
        let buf = render(&app);
        let front = GruvboxMaterial::card(0, 1.0);
        // 40x20 terminal cells -> 400x400 units, card is 400x320
        assert_eq!(buf.cell((0, 10)).map(|c| c.bg), Some(front));
        assert_eq!(buf.cell((39, 10)).map(|c| c.bg), Some(front));
        assert_eq!(buf.cell((20, 1)).map(|c| c.bg), Some(Color::Reset));
        assert_eq!(buf.cell((20, 2)).map(|c| c.bg), Some(front));
    }

    #[test]
    fn test_label_is_centered() {
        let app = app();
        let buf = render(&app);
        let text = row_text(&buf, 10);
        assert!(text.contains("alpha"), "row was {:?}", text);
        assert!(!text.contains("beta"));
    }

    #[test]
    fn test_drag_shows_both_cards() {
        let mut app = app();
        app.carousel.handle_gesture(GestureEvent::Start);
        app.carousel.handle_gesture(GestureEvent::Move { dx: -200.0, dy: 0.0 });
        let buf = render(&app);

        let outgoing = GruvboxMaterial::card(0, app.carousel.transform_for(0).opacity);
        let incoming = GruvboxMaterial::card(1, app.carousel.transform_for(1).opacity);
        assert_eq!(buf.cell((12, 10)).map(|c| c.bg), Some(outgoing));
        assert_eq!(buf.cell((28, 10)).map(|c| c.bg), Some(incoming));
    }

    #[test]
    fn test_vertical_cards_cover_rows() {
        let card = ProjectedCard {
            index: 0,
            axis: Axis::Vertical,
            opacity: 1.0,
            near: crate::projection::Edge { along: -100.0, half_across: 50.0 },
            far: crate::projection::Edge { along: 100.0, half_across: 50.0 },
        };
        assert!(covers(&card, 40.0, 90.0));
        assert!(!covers(&card, 60.0, 0.0));
        assert!(!covers(&card, 0.0, 110.0));
    }
}
