use crate::app::state::AppState;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let user = match state.session.session() {
        Some(s) => Span::styled(format!("signed in as {} · L to log out ", s.display_name()), Theme::label()),
        None => Span::styled("not signed in ", Theme::muted()),
    };

    let title = Span::styled(" Bookshelf ", Theme::header());
    let used = title.width() + user.width();
    let pad = Span::raw(" ".repeat((area.width as usize).saturating_sub(used)));

    frame.render_widget(Paragraph::new(Line::from(vec![title, pad, user])), area);
}
