use crate::app::form::Form;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Rows taken by one field.
pub const FIELD_HEIGHT: u16 = 3;

/// Draw each field as a titled input box stacked from the top of `area`.
/// The terminal cursor follows the focused field while `editable`.
pub fn render(frame: &mut Frame, area: Rect, form: &Form, editable: bool) {
    for (idx, field) in form.fields.iter().enumerate() {
        let y = area.y + idx as u16 * FIELD_HEIGHT;
        if y + FIELD_HEIGHT > area.bottom() {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, FIELD_HEIGHT);
        let focused = idx == form.focus;

        let block = Block::default()
            .title(format!(" {} ", field.label))
            .title_style(if focused { Theme::title() } else { Theme::label() })
            .borders(Borders::ALL)
            .border_type(Theme::border_type())
            .border_style(if focused {
                Theme::border_focused()
            } else {
                Theme::border()
            })
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        frame.render_widget(
            Paragraph::new(field.input.display()).style(Theme::input_text()),
            inner,
        );

        if focused && editable && inner.width > 0 {
            let cursor_x = inner.x + field.input.cursor_column();
            frame.set_cursor_position((cursor_x.min(inner.right() - 1), inner.y));
        }
    }
}
