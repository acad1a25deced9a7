//! Credential dialog
//!
//! Two inputs (V4 token, V3 API key) pre-filled with the current values.
//! Tab switches field, Enter saves and retries, Esc cancels.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::TextInput;
use crate::config::{CredentialUpdate, Credentials};
use crate::ui::preview::centered_rect;
use crate::ui::Theme;

/// Which input has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialField {
    #[default]
    Token,
    ApiKey,
}

/// Dialog state
#[derive(Debug, Clone, Default)]
pub struct CredentialsDialog {
    pub token: TextInput,
    pub api_key: TextInput,
    pub field: CredentialField,
    /// Why the dialog opened (e.g. the 401 message)
    pub reason: Option<String>,
}

impl CredentialsDialog {
    pub fn new(current: &Credentials, reason: Option<String>) -> Self {
        Self {
            token: TextInput::with_value(current.token().unwrap_or_default()),
            api_key: TextInput::with_value(current.api_key().unwrap_or_default()),
            field: CredentialField::Token,
            reason,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            CredentialField::Token => CredentialField::ApiKey,
            CredentialField::ApiKey => CredentialField::Token,
        };
    }

    /// The focused input
    pub fn active_mut(&mut self) -> &mut TextInput {
        match self.field {
            CredentialField::Token => &mut self.token,
            CredentialField::ApiKey => &mut self.api_key,
        }
    }

    /// Both trimmed values; blank clears the stored one
    pub fn update(&self) -> CredentialUpdate {
        CredentialUpdate {
            token: Some(self.token.value().trim().to_string()),
            api_key: Some(self.api_key.value().trim().to_string()),
        }
    }
}

fn input_line(label: &str, input: &TextInput, focused: bool) -> Vec<Line<'static>> {
    let text = if focused {
        let (before, after) = input.split_at_cursor();
        format!("{}│{}", before, after)
    } else {
        input.value().to_string()
    };

    vec![
        Line::from(Span::styled(
            label.to_string(),
            if focused { Theme::accent() } else { Theme::dimmed() },
        )),
        Line::from(Span::styled(
            format!("  {}", text),
            if focused {
                Theme::input().fg(Theme::PRIMARY)
            } else {
                Theme::input()
            },
        )),
        Line::from(""),
    ]
}

pub fn render(frame: &mut Frame, area: Rect, dialog: &CredentialsDialog) {
    let popup = centered_rect(70, 50, area);
    frame.render_widget(Clear, popup);

    let mut lines = Vec::new();
    if let Some(reason) = &dialog.reason {
        lines.push(Line::from(Span::styled(reason.clone(), Theme::error())));
        lines.push(Line::from(""));
    }
    lines.extend(input_line(
        "TMDb V4 read access token",
        &dialog.token,
        dialog.field == CredentialField::Token,
    ));
    lines.extend(input_line(
        "TMDb V3 API key",
        &dialog.api_key,
        dialog.field == CredentialField::ApiKey,
    ));
    lines.push(Line::from(vec![
        Span::styled(" TAB ", Theme::keybind()),
        Span::styled("Switch field  ", Theme::keybind_desc()),
        Span::styled(" ↵ ", Theme::keybind()),
        Span::styled("Save & Retry  ", Theme::keybind_desc()),
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("Cancel", Theme::keybind_desc()),
    ]));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::warning())
            .title(Span::styled(" 🔑 TMDb CREDENTIALS ", Theme::warning()))
            .style(Theme::modal()),
    );
    frame.render_widget(body, popup);
}
