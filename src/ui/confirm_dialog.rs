use crate::app::catalog::DeleteConfirm;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub fn render(frame: &mut Frame, confirm: &DeleteConfirm) {
    let (target, deleting) = match confirm {
        DeleteConfirm::Hidden => return,
        DeleteConfirm::Confirming { target } => (target, false),
        DeleteConfirm::Deleting { target, .. } => (target, true),
    };

    let popup = centered(frame.area(), 48, 7);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Delete book ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::error_text())
        .style(Style::default().bg(Theme::BG_SURFACE));

    let prompt = if deleting {
        Line::from(Span::styled("Deleting…", Theme::key_hint()))
    } else {
        Line::from(vec![
            Span::styled("y", Theme::key_hint()),
            Span::raw(" delete   "),
            Span::styled("n", Theme::key_hint()),
            Span::raw(" keep"),
        ])
    };
    let lines = vec![
        Line::from("Are you sure you want to delete"),
        Line::from(Span::styled(format!("\"{}\"?", target.title), Theme::title())),
        Line::from(""),
        prompt,
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup,
    );
}
