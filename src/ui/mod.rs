//! Terminal UI components
//!
//! Built with ratatui for a cyberpunk neon aesthetic.
//! Keyboard-first, with mouse clicks for cards, rows and closing the modal.

pub mod credentials;
pub mod grid;
pub mod preview;
pub mod recent;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, InputMode};

/// Width of the recently watched panel
pub const RECENT_PANEL_WIDTH: u16 = 36;

/// Screen regions shared by rendering and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub logo: Rect,
    pub search: Rect,
    pub grid: Rect,
    pub recent: Option<Rect>,
    pub status: Rect,
}

impl Regions {
    /// Inner area of the grid (where cards go)
    pub fn grid_inner(&self) -> Rect {
        grid::block("", false).inner(self.grid)
    }
}

/// Main layout: header, content, status bar
pub fn layout(area: Rect, recent_open: bool) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1)])
        .split(chunks[0]);

    let (grid, recent) = if recent_open {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(RECENT_PANEL_WIDTH)])
            .split(chunks[1]);
        (body[0], Some(body[1]))
    } else {
        (chunks[1], None)
    };

    Regions {
        logo: header[0],
        search: header[1],
        grid,
        recent,
        status: chunks[2],
    }
}

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Clear with background color
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let regions = layout(area, app.recent_open);

    render_header(frame, &regions, app);
    render_grid(frame, regions.grid, app);
    if let Some(recent_area) = regions.recent {
        recent::render(frame, recent_area, &app.recent, app.recent_list.selected, true);
    }
    render_status_bar(frame, regions.status, app);

    // Overlays, top-most last
    preview::render(frame, area, app.preview.state());
    if let Some(dialog) = &app.credentials {
        credentials::render(frame, area, dialog);
    }
}

fn render_header(frame: &mut Frame, regions: &Regions, app: &App) {
    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "REEL",
            Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "PEEK",
            Style::default()
                .fg(Theme::SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, regions.logo);

    let editing = app.input_mode == InputMode::Editing;
    let search_text = if editing {
        let (before, after) = app.search.split_at_cursor();
        format!("⌕ {}│{}", before, after)
    } else if app.search.value().is_empty() {
        "⌕ Type / to search...".to_string()
    } else {
        format!("⌕ {}", app.search.value())
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, regions.search);
}

fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    let title = app.catalog.title();
    if let Some(message) = app.catalog.loading.message().filter(|_| app.catalog.loading.is_loading()) {
        let block = grid::block(&title, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let loading = Paragraph::new(format!("⟳ {}", message))
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    let focused = !app.recent_open && app.input_mode == InputMode::Normal;
    grid::render(frame, area, &app.catalog.view, app.catalog.list.selected, &title, focused);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let count = Span::styled(
        format!(" {} movies ", app.catalog.view.len()),
        Style::default().fg(Theme::DIM),
    );

    let mut spans = vec![mode_indicator, count, Span::raw(" │ ")];
    match &app.status {
        Some(status) => spans.push(Span::styled(status.clone(), Theme::warning())),
        None => spans.push(Span::styled(
            " q:quit  /:search  ↵:preview  r:recent  k:credentials ",
            Theme::dimmed(),
        )),
    }

    let status = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_without_panel() {
        let regions = layout(Rect::new(0, 0, 120, 40), false);
        assert_eq!(regions.recent, None);
        assert_eq!(regions.grid.width, 120);
        assert_eq!(regions.status.y, 39);
    }

    #[test]
    fn test_layout_with_panel() {
        let regions = layout(Rect::new(0, 0, 120, 40), true);
        let recent = regions.recent.unwrap();
        assert_eq!(recent.width, RECENT_PANEL_WIDTH);
        assert_eq!(regions.grid.width + recent.width, 120);
    }
}
