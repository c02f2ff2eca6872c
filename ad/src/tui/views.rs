//! TUI views and rendering
//!
//! Everything here reads session state and draws it. Nothing here mutates
//! state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::trace;

use super::app::App;
use crate::session::{Message, PLANNER_AUTHOR, SessionState};

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const USER: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const PLANNER: Color = Color::Rgb(218, 112, 214); // Orchid
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const PENDING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const DIM: Color = Color::DarkGray;

    /// Agent names are hashed onto this palette so each keeps one color
    pub const AGENTS: &[Color] = &[
        Color::Rgb(100, 149, 237), // Cornflower blue
        Color::Rgb(255, 165, 0),   // Orange
        Color::Rgb(64, 224, 208),  // Turquoise
        Color::Rgb(186, 85, 211),  // Medium orchid
        Color::Rgb(154, 205, 50),  // Yellow green
        Color::Rgb(240, 128, 128), // Light coral
    ];
}

/// Maximum number of text rows the composer grows to
const MAX_INPUT_ROWS: u16 = 6;

/// Render the whole screen
pub fn render(app: &App, frame: &mut Frame) {
    let state = app.state();
    trace!(messages = state.messages.len(), loading = state.loading, "render: called");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Sidebar + conversation
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);

    render_plan_sidebar(state, frame, body[0]);
    render_chat(app, frame, body[1]);
    render_status_line(state, frame, chunks[2]);
}

fn render_header(state: &SessionState, frame: &mut Frame, area: Rect) {
    let (indicator_color, status) = match (&state.session_id, &state.error) {
        (Some(_), _) => (Color::Green, "connected"),
        (None, Some(_)) => (colors::ERROR, "no session"),
        (None, None) => (colors::PENDING, "creating plan"),
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled("●", Style::default().fg(indicator_color)),
        Span::styled(
            " AutoDev Architect",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            "Coordinate planner, coding and DevOps agents from a single interface",
            Style::default().fg(colors::DIM),
        ),
        Span::raw(" │ "),
        Span::styled(status, Style::default().fg(indicator_color)),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_plan_sidebar(state: &SessionState, frame: &mut Frame, area: Rect) {
    trace!(steps = state.plan.len(), "render_plan_sidebar: called");
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Execution plan ")
        .border_style(Style::default().fg(colors::HEADER));

    let lines: Vec<Line> = if state.plan.is_empty() {
        let placeholder = if state.has_session() {
            "No steps"
        } else {
            "Waiting for plan..."
        };
        vec![Line::from(Span::styled(placeholder, Style::default().fg(colors::DIM)))]
    } else {
        state
            .plan
            .iter()
            .enumerate()
            .map(|(i, step)| {
                Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(colors::DIM)),
                    Span::raw(step.as_str()),
                ])
            })
            .collect()
    };

    let plan = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(plan, area);
}

fn render_chat(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    // Inner width of the composer: borders take two columns
    let input_height = calculate_input_height(&state.pending_input, area.width.saturating_sub(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(input_height)])
        .split(area);

    render_message_list(state, frame, chunks[0]);
    render_composer(app, frame, chunks[1]);
}

/// Composer height including borders
fn calculate_input_height(input: &str, width: u16) -> u16 {
    if width == 0 {
        return 3;
    }
    let width = width as usize;
    let max_rows = MAX_INPUT_ROWS as usize;
    // "> " prompt plus a trailing cursor cell
    let mut rows = 0usize;
    for line in input.split('\n') {
        let cells = line.chars().count().saturating_add(3);
        rows = rows.saturating_add(cells.div_ceil(width).max(1));
        if rows >= max_rows {
            break;
        }
    }
    u16::try_from(rows.clamp(1, max_rows)).unwrap_or(MAX_INPUT_ROWS) + 2
}

fn render_message_list(state: &SessionState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Conversation ")
        .border_style(Style::default().fg(colors::HEADER));
    let inner = block.inner(area);

    if state.messages.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No messages yet.",
            Style::default().fg(colors::DIM),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines = message_lines(&state.messages);
    // Keep the newest messages in view
    let total = wrapped_height(&lines, inner.width);
    let scroll = total.saturating_sub(inner.height);

    let list = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(list, area);
}

/// Lines for the conversation log: author header, indented content, spacer
fn message_lines(messages: &[Message]) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            message.author.as_str(),
            Style::default()
                .fg(author_color(&message.author))
                .add_modifier(Modifier::BOLD),
        )));
        for content_line in message.content.lines() {
            lines.push(Line::from(vec![Span::raw("  "), Span::raw(content_line)]));
        }
    }
    lines
}

/// Rows the lines occupy once wrapped to `width`
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width as usize).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn author_color(author: &str) -> Color {
    if author == crate::session::USER_AUTHOR {
        return colors::USER;
    }
    if author == PLANNER_AUTHOR {
        return colors::PLANNER;
    }
    let hash = author
        .to_lowercase()
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    colors::AGENTS[hash % colors::AGENTS.len()]
}

fn render_composer(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let enabled = state.has_session() && !state.loading;

    let title = if state.loading {
        format!(" {} Thinking... ", app.spinner())
    } else if !state.has_session() {
        " Waiting for session ".to_string()
    } else {
        " Send ".to_string()
    };
    let border_color = if enabled { colors::USER } else { colors::DIM };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));

    let input_style = if enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(colors::DIM)
    };

    let mut spans = vec![Span::styled(
        "> ",
        Style::default().fg(colors::USER).add_modifier(Modifier::BOLD),
    )];

    if state.pending_input.is_empty() && enabled {
        spans.push(Span::styled(
            "Describe the next action for the agents",
            Style::default().fg(colors::DIM),
        ));
    } else {
        let (before_cursor, after_cursor) = state.pending_input.split_at(app.cursor_pos());
        spans.push(Span::styled(before_cursor, input_style));

        let mut chars = after_cursor.chars();
        match chars.next() {
            Some(c) => {
                spans.push(Span::styled(
                    c.to_string(),
                    Style::default().fg(Color::Black).bg(Color::White),
                ));
                spans.push(Span::styled(chars.as_str(), input_style));
            }
            None => spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK))),
        }
    }

    let composer = Paragraph::new(Line::from(spans))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(composer, area);
}

fn render_status_line(state: &SessionState, frame: &mut Frame, area: Rect) {
    let line = match &state.error {
        Some(error) => Line::from(vec![
            Span::styled(" ! ", Style::default().fg(colors::ERROR).add_modifier(Modifier::BOLD)),
            Span::styled(error.as_str(), Style::default().fg(colors::ERROR)),
        ]),
        None => Line::from(vec![
            Span::styled(" Enter", Style::default().fg(colors::HEADER)),
            Span::styled(" send  ", Style::default().fg(colors::DIM)),
            Span::styled("Esc", Style::default().fg(colors::HEADER)),
            Span::styled(" clear  ", Style::default().fg(colors::DIM)),
            Span::styled("Ctrl+C", Style::default().fg(colors::HEADER)),
            Span::styled(" quit", Style::default().fg(colors::DIM)),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}
