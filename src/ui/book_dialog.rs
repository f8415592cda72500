use crate::app::catalog::{BookDialog, DialogMode};
use crate::ui::form_view::{self, FIELD_HEIGHT};
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub fn render(frame: &mut Frame, dialog: &BookDialog) {
    let BookDialog::Open {
        mode,
        form,
        submitting,
    } = dialog
    else {
        return;
    };

    let title = match mode {
        DialogMode::Create => " Add book ",
        DialogMode::Edit(_) => " Edit book ",
    };
    let fields_h = form.form.fields.len() as u16 * FIELD_HEIGHT;
    let popup = centered(frame.area(), 56, fields_h + 3);

    // Clear background
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Style::default().fg(Theme::ACCENT))
        .style(Style::default().bg(Theme::BG_SURFACE));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let fields_area = Rect::new(inner.x, inner.y, inner.width, fields_h.min(inner.height));
    form_view::render(frame, fields_area, &form.form, !submitting);

    let footer_y = inner.y + fields_h;
    if footer_y < inner.bottom() {
        let footer = if *submitting {
            Span::styled("Saving…", Theme::key_hint())
        } else {
            Span::styled("Enter save · Esc cancel", Theme::muted())
        };
        frame.render_widget(
            Paragraph::new(footer).alignment(Alignment::Right),
            Rect::new(inner.x, footer_y, inner.width, 1),
        );
    }
}
