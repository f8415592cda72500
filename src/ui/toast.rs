use crate::app::notification::Notification;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

/// One-line toast in the top right corner of the screen body.
pub fn render(frame: &mut Frame, body: Rect, notification: Option<&Notification>) {
    let Some(n) = notification else {
        return;
    };
    if body.height == 0 {
        return;
    }
    let text = format!(" {} ", n.message);
    let width = (text.width() as u16).min(body.width);
    let rect = Rect::new(body.right() - width, body.y, width, 1);

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(text).style(Theme::severity(n.severity)), rect);
}
