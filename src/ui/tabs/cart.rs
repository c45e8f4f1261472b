use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Pane};
use crate::ui::styles;
use crate::utils::format_currency;

/// Render the cart pane - order lines plus a total footer
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    render_lines(frame, app, chunks[0]);
    render_total(frame, app, chunks[1]);
}

fn render_lines(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.pane, Pane::Cart);

    let header = Row::new(vec![
        Cell::from("Item"),
        Cell::from("Price"),
        Cell::from("Qty"),
        Cell::from("Total"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .cart
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == app.cart_selection && focused {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(line.name.clone()),
                Cell::from(format_currency(line.amount())),
                Cell::from(format!("{:>3}", line.quantity)),
                Cell::from(format_currency(line.line_total())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(10),
    ];

    let title = format!(" Order ({}) - [d] remove | [esc] back ", app.cart.count());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.cart_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_total(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.cart.is_empty() {
        Line::from(Span::styled(
            " Order is empty - add items from the menu with [enter]",
            styles::muted_style(),
        ))
    } else {
        Line::from(vec![
            Span::styled(" Total: ", styles::muted_style()),
            Span::styled(
                format_currency(app.cart.total()),
                styles::highlight_style(),
            ),
        ])
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(line).block(block), area);
}
