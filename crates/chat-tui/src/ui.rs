use chat_core::RequestState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::theme::Palette;

pub const TITLE: &str = "AmazeBot Chat";
pub const SUBTITLE: &str = "Your AI assistant for amazing conversations";
pub const PLACEHOLDER: &str = "Type your message here...";

pub fn draw(f: &mut Frame, app: &App) {
    let palette = app.theme.palette();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    let (header_area, input_area, status_area, result_area) =
        (chunks[0], chunks[1], chunks[2], chunks[3]);

    draw_header(f, header_area, &palette);
    draw_input(f, input_area, app, &palette);
    draw_status(f, status_area, app, &palette);
    draw_result(f, result_area, app.controller.state(), &palette);
}

fn draw_header(f: &mut Frame, area: Rect, palette: &Palette) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(palette.subtitle))),
    ])
    .alignment(Alignment::Center);

    f.render_widget(header, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let width = area.width.saturating_sub(2).max(1) as usize;
    let scroll = app.input.visual_scroll(width);

    let text = if app.input.value().is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(palette.disabled))
    } else {
        Span::raw(app.input.value())
    };

    let input = Paragraph::new(Line::from(text))
        .style(match app.controller.is_pending() {
            true => Style::default().fg(palette.disabled),
            false => Style::default().fg(palette.input),
        })
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title("Message"),
        );

    f.render_widget(input, area);

    if let Some((x, y)) = cursor_position(app, area) {
        f.set_cursor(x, y);
    }
}

/// Cursor sits just after the border, offset by the scrolled cursor column.
/// Hidden while the input box is drawn as disabled.
fn cursor_position(app: &App, area: Rect) -> Option<(u16, u16)> {
    if app.controller.is_pending() {
        return None;
    }
    let width = area.width.saturating_sub(2).max(1) as usize;
    let scroll = app.input.visual_scroll(width);
    Some((
        area.x + 1 + app.input.visual_cursor().saturating_sub(scroll) as u16,
        area.y + 1,
    ))
}

/// The submit trigger: a busy indicator while pending, otherwise a hint.
fn draw_status(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = if app.can_submit() {
        Line::from(vec![
            Span::styled(
                "[Enter] Send Message",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  [Esc] Clear  [Ctrl+C] Quit", Style::default().fg(palette.subtitle)),
        ])
    } else {
        Line::from(Span::styled(
            format!("{} Processing...", app.spinner()),
            Style::default().fg(palette.disabled),
        ))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_result(f: &mut Frame, area: Rect, state: &RequestState, palette: &Palette) {
    let (title, text, color) = match state {
        RequestState::Idle | RequestState::Pending => return,
        RequestState::Succeeded(text) => ("Response", text.as_str(), palette.response),
        RequestState::Failed(message) => ("Error", message.as_str(), palette.error),
    };

    let result = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );

    f.render_widget(result, area);
}
