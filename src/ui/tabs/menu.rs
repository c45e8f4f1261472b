use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, Pane};
use crate::models::Item;
use crate::ui::styles;
use crate::utils::{format_amount, truncate_string};

/// Max characters of ingredients text shown in the table
const INGREDIENTS_COLUMN_WIDTH: usize = 40;

/// Render the menu tab - item table plus a detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_item_table(frame, app, chunks[0]);
    render_item_detail(frame, app, chunks[1]);
}

fn item_name_cell(item: &Item) -> Cell<'static> {
    let marker = if item.featured { "★ " } else { "" };
    let name = format!("{}{}", marker, item.name);
    if !item.visible {
        Cell::from(name).style(styles::unavailable_style())
    } else if item.featured {
        Cell::from(name).style(styles::featured_style())
    } else {
        Cell::from(name)
    }
}

fn render_item_table(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.items_in_view();
    let focused = matches!(app.pane, Pane::Menu);
    let all_tab = app.tab_index == 0;

    let category_name = |item: &Item| -> String {
        app.menu
            .categories
            .iter()
            .find(|c| c.id == item.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    };

    let header_cells = if all_tab {
        vec![
            Cell::from("Item"),
            Cell::from("Section"),
            Cell::from("Price"),
        ]
    } else {
        vec![
            Cell::from("Item"),
            Cell::from("Ingredients"),
            Cell::from("Price"),
        ]
    };
    let header = Row::new(header_cells).style(styles::title_style()).height(1);

    let rows: Vec<Row> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let row_style = if i == app.item_selection && focused {
                styles::selected_style()
            } else if !item.visible {
                styles::unavailable_style()
            } else {
                styles::list_item_style()
            };

            let middle = if all_tab {
                category_name(item)
            } else {
                truncate_string(
                    item.ingredients.as_deref().unwrap_or("-"),
                    INGREDIENTS_COLUMN_WIDTH,
                )
            };

            let mut price = item.price_display();
            if let Some(tw) = item.takeaway_price() {
                price.push_str(&format!("  TW {}", format_amount(tw)));
            }

            Row::new(vec![
                item_name_cell(item),
                Cell::from(middle),
                Cell::from(price),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Fill(2),
        Constraint::Length(18),
    ];

    let title = if app.menu.order_system {
        format!(" Menu ({}) - [enter] add to order ", items.len())
    } else {
        format!(" Menu ({}) ", items.len())
    };

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
    state.select(Some(app.item_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_item_detail(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.items_in_view();
    let selected = items.get(app.item_selection);

    let content = match selected {
        Some(item) => {
            let mut lines = vec![];

            let name_style = if item.visible {
                styles::title_style()
            } else {
                styles::unavailable_style()
            };
            lines.push(Line::from(Span::styled(item.name.clone(), name_style)));
            if item.featured {
                lines.push(Line::from(Span::styled("★ Featured", styles::featured_style())));
            }
            if !item.visible {
                lines.push(Line::from(Span::styled(
                    "Currently unavailable",
                    styles::error_style(),
                )));
            }
            lines.push(Line::from(""));

            let section = app
                .menu
                .categories
                .iter()
                .find(|c| c.id == item.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(vec![
                Span::styled("Section:     ", styles::muted_style()),
                Span::raw(section),
            ]));

            let tiers = item.price.tiers();
            let price_label = if tiers.len() > 1 { "Prices:      " } else { "Price:       " };
            lines.push(Line::from(vec![
                Span::styled(price_label, styles::muted_style()),
                Span::raw(tiers.join(" / ")),
            ]));

            if let Some(tw) = item.takeaway_price() {
                lines.push(Line::from(vec![
                    Span::styled("Takeaway:    ", styles::muted_style()),
                    Span::raw(format_amount(tw)),
                ]));
            }

            if let Some(ref ingredients) = item.ingredients {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Ingredients",
                    styles::highlight_style(),
                )));
                lines.push(Line::from(Span::raw(ingredients.clone())));
            }

            if let Some(ref image) = item.image {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Image:       ", styles::muted_style()),
                    Span::raw(image.clone()),
                ]));
            }

            lines
        }
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Nothing on the menu yet.",
                styles::muted_style(),
            )),
            Line::from(Span::styled(
                "  Waiting for the kitchen...",
                styles::muted_style(),
            )),
        ],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
