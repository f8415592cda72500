use crate::app::catalog::{BookDialog, DeleteConfirm};
use crate::app::route::Route;
use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    parts.push(Span::styled(
        format!(" {} ", state.status_line()),
        Theme::status_bar(),
    ));

    let hints = key_hints(state);
    let used: usize = parts.iter().map(|s| s.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + hints.chars().count() + 2);
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        format!(" {} ", hints),
        Style::default().fg(Theme::ACCENT).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn key_hints(state: &AppState) -> &'static str {
    match state.route {
        Route::Login => "Enter sign in · F2 register · F3 show password · Esc quit",
        Route::Register => "Enter register · F2 sign in · F3 show password · Esc quit",
        Route::Books => {
            if !matches!(state.catalog.delete, DeleteConfirm::Hidden) {
                "y confirm · n cancel"
            } else if matches!(state.catalog.dialog, BookDialog::Open { .. }) {
                "Tab next · Enter save · Esc cancel"
            } else if state.books_focus == BooksFocus::Search {
                "type to filter · Esc done"
            } else {
                "/ search · s sort · o order · ←/→ page · +/- size · a add · e edit · d delete · L logout · q quit"
            }
        }
    }
}
