//! Neon palette and style helpers for ReelPeek

use ratatui::style::{Color, Modifier, Style};

/// Cyberpunk neon color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// #0a0a0f
    pub const BACKGROUND: Color = Color::Rgb(0x0a, 0x0a, 0x0f);
    /// #00fff2, logo "REEL", focus rings
    pub const PRIMARY: Color = Color::Rgb(0x00, 0xff, 0xf2);
    /// #ff00ff, logo "PEEK", dates
    pub const SECONDARY: Color = Color::Rgb(0xff, 0x00, 0xff);
    /// #ffff00
    pub const ACCENT: Color = Color::Rgb(0xff, 0xff, 0x00);
    /// #ff0080
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0x00, 0x80);
    pub const TEXT: Color = Color::Rgb(0xe0, 0xe0, 0xe0);
    pub const DIM: Color = Color::Rgb(0x40, 0x40, 0x50);
    pub const SUCCESS: Color = Color::Rgb(0x00, 0xff, 0x00);
    pub const WARNING: Color = Color::Rgb(0xff, 0xaa, 0x00);
    pub const ERROR: Color = Color::Rgb(0xff, 0x00, 0x40);

    /// Card and panel surface
    pub const SURFACE: Color = Color::Rgb(0x14, 0x14, 0x1e);
    /// Selected card surface
    pub const SURFACE_SELECTED: Color = Color::Rgb(0x1e, 0x1e, 0x2d);
    pub const BORDER: Color = Color::Rgb(0x00, 0x80, 0x78);

    // ═══════════════════════════════════════════════════════════════════════
    // CHROME
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    /// Inverted primary, used for the active search box label
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default().fg(Self::HIGHLIGHT).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::SURFACE)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::SURFACE)
    }

    /// Preview and credential dialogs
    pub fn modal() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CONTENT
    // ═══════════════════════════════════════════════════════════════════════

    pub fn card() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::SURFACE)
    }

    pub fn card_selected() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::SURFACE_SELECTED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn list_item() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Star rating: green from 7.5, orange from 6, red under 4
    pub fn rating(vote_average: Option<f32>) -> Style {
        let color = match vote_average {
            Some(v) if v >= 7.5 => Self::SUCCESS,
            Some(v) if v >= 6.0 => Self::WARNING,
            Some(v) if v < 4.0 => Self::ERROR,
            _ => Self::DIM,
        };
        Style::default().fg(color)
    }

    /// URLs (posters, trailers)
    pub fn link() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::UNDERLINED)
    }

    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FEEDBACK
    // ═══════════════════════════════════════════════════════════════════════

    pub fn loading() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS).add_modifier(Modifier::BOLD)
    }
}
