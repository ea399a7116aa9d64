use std::io::{self, Stdout};
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use carousel3d_core::{AppConfig, ScrollDirection};
use carousel3d_tui::{
    app::{App, STATUS_BAR_HEIGHT},
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{StageWidget, StatusBarWidget},
};

/// Cards shown when neither labels nor a count are given
const DEFAULT_CARD_COUNT: usize = 6;
/// Longest spring step taken after an idle poll
const MAX_FRAME_DT: f64 = 0.05;

#[derive(Debug, Default)]
pub struct RunOptions {
    pub labels: Vec<String>,
    pub count: Option<usize>,
    pub loop_enabled: bool,
    pub direction: Option<ScrollDirection>,
}

pub fn run(config: &AppConfig, options: RunOptions) -> Result<()> {
    let mut config = config.clone();
    config.carousel.loop_enabled |= options.loop_enabled;
    if let Some(direction) = options.direction {
        config.carousel.scroll_direction = direction;
    }
    let items = card_labels(options.labels, options.count);
    tracing::info!(items = items.len(), "Starting carousel viewer");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("carousel3d"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &config, items);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Viewer exited with error: {}", e);
    }
    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &AppConfig,
    items: Vec<String>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(items, config, size.width, size.height)?;

    // Create event handler with animation FPS support
    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    let mut last_frame = Instant::now();
    let mut needs_redraw = true;

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64().min(MAX_FRAME_DT);
        last_frame = now;
        app.tick(dt);

        // The carousel flags every offset change; other state changes set needs_redraw
        if app.carousel.take_dirty() || needs_redraw {
            terminal.draw(|frame| {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(STATUS_BAR_HEIGHT)])
                    .split(frame.area());

                StageWidget::render(frame, layout[0], &app);
                StatusBarWidget::render(frame, layout[1], &app);
            })?;
            needs_redraw = false;
        }

        // Poll at the frame rate while a drag or spring is in flight
        let event = if app.is_animating() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    app.handle_action(handle_key_event(key));
                    needs_redraw = true;
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(&mouse),
                AppEvent::Resize(width, height) => {
                    app.resize(width, height);
                    needs_redraw = true;
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Labels from the command line, or numbered cards
fn card_labels(labels: Vec<String>, count: Option<usize>) -> Vec<String> {
    if !labels.is_empty() {
        return labels;
    }
    let count = count.unwrap_or(DEFAULT_CARD_COUNT);
    (1..=count).map(|i| format!("Card {}", i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_labels_prefer_explicit_labels() {
        let labels = card_labels(vec!["a".into(), "b".into()], Some(9));
        assert_eq!(labels, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_card_labels_default_count() {
        let labels = card_labels(Vec::new(), None);
        assert_eq!(labels.len(), DEFAULT_CARD_COUNT);
        assert_eq!(labels[0], "Card 1");
        assert_eq!(card_labels(Vec::new(), Some(2)).len(), 2);
    }
}
