use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::App;
use crate::renderer::{self, CellMapper};

const TIMELINE_ROWS: u16 = 8;
const KEY_HELP: &str =
    " t type | c compare | 1-7 genres | [ ] radius | ←→ +- years | x clear | tab inspect | q quit ";

/// Screen regions of one frame.
#[derive(Debug, Clone, Copy, Default)]
struct Regions {
    timeline: Rect,
}

pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut regions = Regions::default();
    let mut drag_start: Option<u16> = None;

    while !app.quit {
        terminal.draw(|frame| regions = draw(frame, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
            Event::Mouse(mouse) => {
                let inside = regions.timeline.contains((mouse.column, mouse.row).into());
                let map = CellMapper::new(
                    &app.dashboard.config().timeline_viewport,
                    regions.timeline,
                );
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) if inside => {
                        drag_start = Some(mouse.column);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        if let Some(start) = drag_start.take() {
                            let end = mouse.column.clamp(
                                regions.timeline.x,
                                regions.timeline.right().saturating_sub(1),
                            );
                            if start == end {
                                app.brush_pixels(0.0, 0.0);
                            } else {
                                app.brush_pixels(map.pixel_x(start), map.pixel_x(end));
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &App) -> Regions {
    let [header, timeline, bubble, status, controls] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(TIMELINE_ROWS),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let state = app.dashboard.state();
    let title = format!(
        " bubblescope | {} | {}{} ",
        state.game_type.label(),
        state.year_range,
        if state.compare_mode { " | compare" } else { "" },
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(KEY_HELP),
        ]))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        header,
    );

    frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), timeline);
    frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), bubble);

    let config = app.dashboard.config();
    let buf = frame.buffer_mut();
    renderer::render_commands(
        buf,
        timeline,
        &config.timeline_viewport,
        &app.dashboard.timeline_commands(),
    );
    renderer::render_commands(
        buf,
        bubble,
        &config.bubble_viewport,
        &app.dashboard.bubble_commands(),
    );

    let stats = app.dashboard.stats();
    let status_line = match (&app.notice, app.inspected_label()) {
        (Some(notice), _) => Line::styled(format!(" {notice}"), Style::default().fg(Color::Red)),
        (None, Some(label)) => Line::raw(format!(" {label}")),
        (None, None) => Line::raw(format!(
            " {} games on the timeline, {} bubbles (indie {}, studio {}) | min radius {:.2}",
            stats.timeline,
            stats.bubble_total(),
            stats.indie,
            stats.studio,
            state.radius_extent.min,
        )),
    };
    frame.render_widget(Paragraph::new(status_line), status);

    let mut spans = vec![Span::raw(" ")];
    for (i, genre) in config.genre_catalog.iter().enumerate() {
        let checked = state.required_genres.contains(genre.as_str());
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = if checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{} {mark} {genre}  ", i + 1), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), controls);

    Regions { timeline }
}
