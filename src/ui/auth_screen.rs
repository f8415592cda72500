use crate::app::event::AuthKind;
use crate::app::form::AuthForm;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use crate::ui::form_view::{self, FIELD_HEIGHT};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, auth: &AuthForm) {
    let (title, busy, switch) = match auth.kind {
        AuthKind::Login => (" Sign in ", "Signing in…", "No account yet? Press F2 to register."),
        AuthKind::Register => (
            " Create account ",
            "Creating account…",
            "Already registered? Press F2 to sign in.",
        ),
    };

    let fields_h = auth.form.fields.len() as u16 * FIELD_HEIGHT;
    let popup = centered(area, 50, fields_h + 7);

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
    form_view::render(frame, fields_area, &auth.form, !auth.loading);

    let footer_y = inner.y + fields_h;
    if footer_y >= inner.bottom() {
        return;
    }
    let footer = Rect::new(inner.x, footer_y, inner.width, inner.bottom() - footer_y);

    let mut lines = Vec::new();
    if auth.loading {
        lines.push(Line::from(Span::styled(busy, Theme::key_hint())));
    } else if let Some(err) = &auth.error {
        lines.push(Line::from(Span::styled(err.as_str(), Theme::error_text())));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(switch, Theme::muted())));
    let reveal = if auth.form.secrets_revealed() {
        "F3 hides the password."
    } else {
        "F3 shows the password."
    };
    lines.push(Line::from(Span::styled(reveal, Theme::muted())));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), footer);
}
