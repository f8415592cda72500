use crate::app::catalog::CatalogController;
use crate::app::state::*;
use crate::ui::layout;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let parts = layout::books_layout(area);
    render_controls(frame, parts.controls, state);
    render_table(frame, parts.table, &state.catalog);
    frame.render_widget(
        Paragraph::new(pagination_text(&state.catalog))
            .style(Theme::label())
            .alignment(Alignment::Right),
        parts.pagination,
    );
}

fn render_controls(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.books_focus == BooksFocus::Search;
    let query = &state.catalog.query;

    let block = Block::default()
        .title(" Search ")
        .title_style(if focused { Theme::title() } else { Theme::label() })
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sort = format!(
        "sort: {} · {}",
        query.sort_field.label(),
        query.sort_order.label()
    );
    let sort_w = sort.chars().count() as u16;
    let text_w = inner.width.saturating_sub(sort_w + 1);

    let search_area = Rect::new(inner.x, inner.y, text_w, inner.height.min(1));
    let text = if state.search_input.text.is_empty() && !focused {
        Span::styled("press / to search by title or author", Theme::muted())
    } else {
        Span::styled(state.search_input.text.as_str(), Theme::input_text())
    };
    frame.render_widget(Paragraph::new(Line::from(text)), search_area);

    let sort_area = Rect::new(inner.x + text_w, inner.y, inner.width - text_w, inner.height.min(1));
    frame.render_widget(
        Paragraph::new(Span::styled(sort, Theme::key_hint())).alignment(Alignment::Right),
        sort_area,
    );

    if focused && search_area.width > 0 {
        let cursor_x = search_area.x + state.search_input.cursor_column();
        frame.set_cursor_position((cursor_x.min(search_area.right() - 1), search_area.y));
    }
}

fn render_table(frame: &mut Frame, area: Rect, catalog: &CatalogController) {
    let title = if catalog.loading { " Books (loading…) " } else { " Books " };
    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border());

    if catalog.items.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("No books found.")
                .style(Theme::muted())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header = Row::new(["Title", "Author", "Year"].map(|h| Cell::from(h).style(Theme::header())));
    let rows = catalog.items.iter().map(|book| {
        Row::new(vec![
            Cell::from(book.title.as_str()),
            Cell::from(book.author.as_str()),
            Cell::from(
                book.publication_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "—".to_string()),
            ),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(35),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Theme::row_selected())
    .highlight_symbol("▶ ");

    let mut table_state = TableState::default().with_selected(Some(catalog.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// `rows per page 5 · 6–6 of 6 · page 2/2`
pub fn pagination_text(catalog: &CatalogController) -> String {
    let query = &catalog.query;
    let shown = catalog.items.len() as u64;
    let (first, last) = if shown == 0 {
        (0, 0)
    } else {
        let first = u64::from(query.page_index) * u64::from(query.page_size) + 1;
        (first, first + shown - 1)
    };
    format!(
        "rows per page {} · {}–{} of {} · page {}/{} ",
        query.page_size,
        first,
        last,
        catalog.total,
        query.page_index + 1,
        catalog.page_count().max(1)
    )
}
