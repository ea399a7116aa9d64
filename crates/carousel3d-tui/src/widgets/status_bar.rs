use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let status_text = status_text(app);

        let help_hint = " q:quit arrows:swipe l:loop d:direction ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default()
                    .fg(GruvboxMaterial::FG0)
                    .bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}

fn status_text(app: &App) -> String {
    if let Some(msg) = &app.status_message {
        return format!(" {}", msg);
    }

    let carousel = &app.carousel;
    let position = if carousel.count() == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", carousel.current_index() + 1, carousel.count())
    };
    let last = app
        .last_swipe()
        .map(|o| format!("{} -> {}", o.direction, o.index + 1))
        .unwrap_or_else(|| "-".to_string());

    format!(
        " {} | {} | {} | loop {} | last: {}",
        position,
        carousel.axis().as_str(),
        carousel.config().scroll_direction.as_str(),
        if carousel.config().loop_enabled { "on" } else { "off" },
        last
    )
}
