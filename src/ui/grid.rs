//! Movie card grid
//!
//! `GridView` is the pure movies → cards transform; the render and
//! hit-test functions below share one layout so mouse clicks land on
//! the card that was drawn.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::catalog::CatalogOutcome;
use crate::models::{format_rating, poster_url, MovieSummary};
use crate::ui::Theme;

/// Card footprint in terminal cells (borders included)
pub const CARD_WIDTH: u16 = 30;
pub const CARD_HEIGHT: u16 = 6;

/// One movie card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
    /// One decimal or "N/A"
    pub rating: String,
    pub vote_average: Option<f32>,
}

impl Card {
    pub fn from_movie(movie: &MovieSummary, image_base: &str) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: poster_url(image_base, movie.poster_path.as_deref()),
            rating: format_rating(movie.vote_average),
            vote_average: movie.vote_average,
        }
    }
}

/// Grid content: cards, or a message in their place
#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    Cards(Vec<Card>),
    Message { text: String, is_error: bool },
}

impl Default for GridView {
    fn default() -> Self {
        GridView::Message {
            text: String::new(),
            is_error: false,
        }
    }
}

impl GridView {
    /// One card per movie; empty input renders `empty_message`
    pub fn from_movies(movies: &[MovieSummary], image_base: &str, empty_message: &str) -> Self {
        if movies.is_empty() {
            return GridView::Message {
                text: empty_message.to_string(),
                is_error: false,
            };
        }
        GridView::Cards(movies.iter().map(|m| Card::from_movie(m, image_base)).collect())
    }

    pub fn from_outcome(outcome: &CatalogOutcome, image_base: &str) -> Self {
        match outcome {
            CatalogOutcome::Movies(movies) => {
                Self::from_movies(movies, image_base, crate::catalog::NO_MOVIES_MESSAGE)
            }
            CatalogOutcome::Message { text, is_error, .. } => GridView::Message {
                text: text.clone(),
                is_error: *is_error,
            },
        }
    }

    pub fn cards(&self) -> &[Card] {
        match self {
            GridView::Cards(cards) => cards,
            GridView::Message { .. } => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Columns that fit in `area` (inner, borders excluded)
pub fn columns_for(area: Rect) -> usize {
    (area.width / CARD_WIDTH).max(1) as usize
}

/// Rows that fit in `area`
pub fn visible_rows_for(area: Rect) -> usize {
    (area.height / CARD_HEIGHT).max(1) as usize
}

/// First visible row so that `selected` stays on screen
pub fn first_visible_row(selected: usize, columns: usize, visible_rows: usize) -> usize {
    let row = selected / columns.max(1);
    row.saturating_sub(visible_rows.saturating_sub(1))
}

/// Rects for every visible card, paired with its index
pub fn card_rects(inner: Rect, len: usize, selected: usize) -> Vec<(usize, Rect)> {
    let columns = columns_for(inner);
    let rows = visible_rows_for(inner);
    let first_row = first_visible_row(selected, columns, rows);

    (first_row * columns..len)
        .take(columns * rows)
        .map(|index| {
            let row = (index / columns - first_row) as u16;
            let col = (index % columns) as u16;
            let rect = Rect {
                x: inner.x + col * CARD_WIDTH,
                y: inner.y + row * CARD_HEIGHT,
                width: CARD_WIDTH.min(inner.width),
                height: CARD_HEIGHT.min(inner.height),
            };
            (index, rect.intersection(inner))
        })
        .collect()
}

/// Index of the card under (column, row), if any
pub fn hit_test(inner: Rect, len: usize, selected: usize, column: u16, row: u16) -> Option<usize> {
    let pos = Position::new(column, row);
    card_rects(inner, len, selected)
        .into_iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(index, _)| index)
}

/// Outer block for the grid
pub fn block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" {} ", title), Theme::title()))
}

// =============================================================================
// Rendering
// =============================================================================

/// Render the grid into `area` (block included)
pub fn render(frame: &mut Frame, area: Rect, view: &GridView, selected: usize, title: &str, focused: bool) {
    let block = block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match view {
        GridView::Message { text, is_error } => {
            let style = if *is_error { Theme::error() } else { Theme::dimmed() };
            let message = Paragraph::new(text.as_str())
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            let middle = Rect {
                y: inner.y + inner.height / 2,
                height: inner.height.saturating_sub(inner.height / 2),
                ..inner
            };
            frame.render_widget(message, middle);
        }
        GridView::Cards(cards) => {
            for (index, rect) in card_rects(inner, cards.len(), selected) {
                render_card(frame, rect, &cards[index], index == selected);
            }
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card, is_selected: bool) {
    let body = if is_selected { Theme::card_selected() } else { Theme::card() };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if is_selected {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .style(body);

    let lines = vec![
        Line::from(Span::styled(
            card.title.clone(),
            if is_selected { Theme::selected() } else { Theme::text() },
        )),
        Line::from(Span::styled(
            format!("⭐ {}", card.rating),
            Theme::rating(card.vote_average),
        )),
        Line::from(Span::styled(card.poster_url.clone(), Theme::dimmed())),
    ];

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
