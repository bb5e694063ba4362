//! Frame drawing: menu tabs, the transcript (or a placeholder panel), the
//! status bar, and the input line.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;
use crate::core::session::MenuPanel;

pub fn ui(f: &mut Frame, app: &mut App) {
    // Paint the background first; the /ai handler can recolor it.
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // menu tabs
            Constraint::Min(0),    // transcript / panel
            Constraint::Length(1), // status bar
            Constraint::Length(3), // input
        ])
        .split(f.area());

    let selected = MenuPanel::ALL
        .iter()
        .position(|p| *p == app.session.menu)
        .unwrap_or(0);
    let tabs = Tabs::new(MenuPanel::ALL.iter().map(|p| Line::from(p.title())))
        .select(selected)
        .style(app.theme.tab_style)
        .highlight_style(app.theme.tab_selected_style);
    f.render_widget(tabs, chunks[0]);

    if app.session.menu == MenuPanel::Chat {
        let lines = app.build_display_lines();
        let transcript = Paragraph::new(lines).wrap(Wrap { trim: true });

        // Measure in wrapped rows, not transcript entries; a long entry can
        // occupy several rows on a narrow terminal.
        let total_rows = transcript.line_count(chunks[1].width) as u16;
        let max_offset = total_rows.saturating_sub(chunks[1].height);
        app.clamp_scroll(max_offset);

        f.render_widget(transcript.scroll((app.scroll_offset, 0)), chunks[1]);
    } else {
        let placeholder = Paragraph::new(app.session.menu.placeholder())
            .style(app.theme.system_text_style)
            .wrap(Wrap { trim: true });
        f.render_widget(placeholder, chunks[1]);
    }

    f.render_widget(status_bar(app), chunks[2]);

    let input_title = if app.pending_ai.is_some() {
        "Awaiting confirmation (y/n, Esc to cancel)"
    } else {
        "Type a message (/help for commands, Ctrl+C to quit)"
    };
    let input = Paragraph::new(app.input.as_str())
        .style(app.theme.input_text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.input_border_style)
                .title(input_title),
        );
    f.render_widget(input, chunks[3]);

    if app.session.menu == MenuPanel::Chat {
        f.set_cursor_position((
            chunks[3].x + app.input.width() as u16 + 1,
            chunks[3].y + 1,
        ));
    }
}

fn status_bar(app: &App) -> Paragraph<'_> {
    let session = &app.session;
    let mut spans = vec![Span::styled(
        format!(
            " TermChat v{} | LINK: {} | ID: {} | LV {} ({}/{} XP)",
            env!("CARGO_PKG_VERSION"),
            session.link.indicator(),
            session.nickname,
            session.level,
            session.experience,
            session.threshold(),
        ),
        app.theme.status_style,
    )];
    if let Some(pending) = &app.pending_ai {
        spans.push(Span::styled(
            format!(" | {}", pending.prompt()),
            app.theme.prompt_style,
        ));
    }
    Paragraph::new(Line::from(spans))
}
