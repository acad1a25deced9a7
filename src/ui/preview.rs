//! Preview modal overlay
//!
//! Drawn on top of everything else. Dismissed with Esc/x or a click
//! outside [`dialog_rect`].

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::preview::{PreviewContent, PreviewState, LOADING_MESSAGE};
use crate::trailer::TrailerView;
use crate::ui::Theme;

/// Message for a movie without any videos
pub const NO_TRAILER_MESSAGE: &str = "No trailer available.";

/// Centered popup covering `percent_x` × `percent_y` of `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// The dialog area within the full frame
pub fn dialog_rect(area: Rect) -> Rect {
    centered_rect(70, 60, area)
}

/// Body lines for a loaded preview
pub fn content_lines(content: &PreviewContent) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            content.title.clone(),
            Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(content.release_date.clone(), Theme::year())),
        Line::from(""),
    ];

    match &content.view {
        TrailerView::Player {
            name,
            embed_url,
            watch_url,
        } => {
            lines.push(Line::from(vec![
                Span::styled("▶ ", Theme::success()),
                Span::styled(name.clone(), Theme::highlighted()),
            ]));
            lines.push(Line::from(Span::styled(watch_url.clone(), Theme::link())));
            lines.push(Line::from(Span::styled(embed_url.clone(), Theme::dimmed())));
        }
        TrailerView::LinkList { videos } => {
            lines.push(Line::from(Span::styled("Available videos:", Theme::accent())));
            for video in videos {
                let line = match &video.url {
                    Some(url) => Line::from(vec![
                        Span::styled("  • ", Theme::dimmed()),
                        Span::styled(video.label.clone(), Theme::text()),
                        Span::raw(" "),
                        Span::styled(url.clone(), Theme::link()),
                    ]),
                    None => Line::from(vec![
                        Span::styled("  • ", Theme::dimmed()),
                        Span::styled(video.label.clone(), Theme::text()),
                    ]),
                };
                lines.push(line);
            }
        }
        TrailerView::NoTrailer { tmdb_url } => {
            lines.push(Line::from(Span::styled(NO_TRAILER_MESSAGE, Theme::warning())));
            lines.push(Line::from(vec![
                Span::styled("View on TMDb: ", Theme::dimmed()),
                Span::styled(tmdb_url.clone(), Theme::link()),
            ]));
        }
    }

    lines
}

fn keybind_line(can_launch: bool) -> Line<'static> {
    let mut spans = Vec::new();
    if can_launch {
        spans.extend([
            Span::styled(" o ", Theme::keybind()),
            Span::styled("Open in browser  ", Theme::keybind_desc()),
            Span::styled(" p ", Theme::keybind()),
            Span::styled("Play in mpv  ", Theme::keybind_desc()),
        ]);
    }
    spans.extend([
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("Close", Theme::keybind_desc()),
    ]);
    Line::from(spans)
}

/// Render the modal for `state`; closed draws nothing
pub fn render(frame: &mut Frame, area: Rect, state: &PreviewState) {
    let (body, can_launch): (Vec<Line<'static>>, bool) = match state {
        PreviewState::Closed => return,
        PreviewState::Loading { .. } => (
            vec![
                Line::from(""),
                Line::from(Span::styled(format!("⟳ {}", LOADING_MESSAGE), Theme::loading())),
            ],
            false,
        ),
        PreviewState::Loaded(content) => (content_lines(content), true),
        PreviewState::Failed { message, .. } => (
            vec![
                Line::from(""),
                Line::from(Span::styled(message.clone(), Theme::error())),
            ],
            false,
        ),
    };

    let popup = dialog_rect(area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Theme::border_focused())
        .title(Span::styled(" ▶ PREVIEW ", Theme::title()))
        .style(Theme::modal());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), chunks[0]);
    frame.render_widget(
        Paragraph::new(keybind_line(can_launch)).alignment(Alignment::Center),
        chunks[1],
    );
}
