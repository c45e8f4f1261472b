use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Pane, ToastKind};
use crate::loader::DataSource;

use super::styles;
use super::tabs::{cart, menu};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if app.loading {
        render_loading_overlay(frame);
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Menucache";
    let help_hint = "[?] Help";

    let cart_hint = if app.menu.order_system && !app.cart.is_empty() {
        format!("[c] Order ({})  ", app.cart.count())
    } else {
        String::new()
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.len() + cart_hint.len() + help_hint.len() + 4),
        )),
        Span::styled(cart_hint, styles::highlight_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = app.tab_titles();

    let mut spans = vec![Span::raw(" ")];
    for (i, title) in titles.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = if i < 9 {
            format!("[{}] {}", i + 1, title)
        } else {
            title.clone()
        };
        let selected = i == app.tab_index && matches!(app.pane, Pane::Menu);
        spans.push(Span::styled(label, styles::tab_style(selected)));
    }

    if matches!(app.pane, Pane::Cart) {
        spans.push(Span::styled("  |  ", styles::muted_style()));
        spans.push(Span::styled("Order", styles::tab_style(true)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.pane {
        Pane::Menu if app.menu.is_empty() && !app.loading => render_empty_state(frame, area),
        Pane::Menu => menu::render(frame, app, area),
        Pane::Cart => cart::render(frame, app, area),
    }
}

fn render_empty_state(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   The menu could not be loaded.",
            styles::error_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "   Check the connection and restart, or configure a",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "   static menu source in config.json.",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[q]uit";
    let right_text = format!(" {} ", shortcuts);

    let (left_text, left_style) = if let Some(ref toast) = app.toast {
        let style = match toast.kind {
            ToastKind::Success => styles::success_style(),
            ToastKind::Degraded => styles::highlight_style(),
            ToastKind::Error => styles::error_style(),
        };
        (format!(" {} ", toast.message), style)
    } else if app.loading {
        (" Loading menu... ".to_string(), styles::muted_style())
    } else {
        let source = match (app.source, &app.source_age) {
            (DataSource::Live, _) => "live data".to_string(),
            (other, Some(age)) => format!("showing {} ({})", other.label(), age),
            (other, None) => format!("showing {}", other.label()),
        };
        (format!(" {} ", source), styles::muted_style())
    };

    let width = area.width as usize;
    let padding = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_loading_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(36, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("       M E N U C A C H E", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "      loading the menu...",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(48, 18, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("   Menucache", styles::title_style())),
        Line::from(Span::styled(
            format!("   version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("  1-9     ", "Jump to section tab"),
        help_line("  ←/→     ", "Prev/next section"),
        help_line("  ↑/↓     ", "Navigate items"),
        Line::from(""),
        Line::from(Span::styled(" Ordering", styles::highlight_style())),
        help_line("  Enter   ", "Add selected item to order"),
        help_line("  c       ", "Show/hide the order"),
        help_line("  d       ", "Remove selected order line"),
        Line::from(""),
        help_line("  q       ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("     Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(44, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
