//! App state and core application logic
//!
//! `App` is pure state: key and mouse handlers mutate it and return an
//! [`Action`] when something async has to happen. The runtime performs
//! the action and feeds the result back as an [`AppEvent`].

use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::{debug, info, warn};

use crate::api::TmdbError;
use crate::catalog::{CatalogOutcome, CatalogQuery, CatalogTicket};
use crate::config::Credentials;
use crate::history::{RecentPanel, RecentlyWatched};
use crate::launcher::LaunchTarget;
use crate::models::{MovieDetail, RecentEntry, Video};
use crate::preview::{PreviewContent, PreviewModal, PreviewTicket};
use crate::storage::Storage;
use crate::ui::{self, credentials::CredentialsDialog};

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for lists and the card grid
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection back by one
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection forward by one
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Move selection back by `step` (a grid row, a page)
    pub fn page_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    /// Move selection forward by `step`, clamped to the last item
    pub fn page_down(&mut self, step: usize) {
        if self.len > 0 {
            self.selected = (self.selected + step).min(self.len - 1);
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        // Clamp selected to valid range
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Text Input
// =============================================================================

/// Single-line text input; the cursor counts chars, not bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn with_value(value: &str) -> Self {
        let mut input = Self::default();
        input.set(value);
        input
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the value, cursor at the end
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Text before and after the cursor
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index(self.cursor))
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Shared editing keys; returns false for keys it doesn't handle
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor_home(),
            KeyCode::End => self.cursor_end(),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Catalog State
// =============================================================================

/// Grid content plus the query behind it
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub view: ui::grid::GridView,
    pub list: ListState,
    pub loading: LoadingState,
    /// Query shown in the grid
    pub query: Option<CatalogQuery>,
    /// Load in flight; results for any other ticket are ignored
    pub pending: Option<CatalogTicket>,
    generation: u64,
}

impl CatalogState {
    pub fn title(&self) -> String {
        match self.pending.as_ref().map(|t| &t.query).or(self.query.as_ref()) {
            Some(CatalogQuery::Search(term)) => format!("🔎 RESULTS: {}", term),
            _ => "🔥 POPULAR".to_string(),
        }
    }

    /// Id of the selected card
    pub fn selected_id(&self) -> Option<u64> {
        self.view.cards().get(self.list.selected).map(|c| c.id)
    }
}

// =============================================================================
// Actions and Events
// =============================================================================

/// Async work requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch popular movies or run a search
    LoadCatalog(CatalogTicket),
    /// Fetch detail + videos for the ticket's movie
    OpenPreview(PreviewTicket),
    /// Credentials changed; rebuild the client, then run `reload`
    Reconnect {
        credentials: Credentials,
        reload: CatalogTicket,
    },
    /// Hand a URL to the browser or mpv
    Launch { target: LaunchTarget, url: String },
}

/// Results coming back from spawned tasks
#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded {
        ticket: CatalogTicket,
        outcome: CatalogOutcome,
    },
    PreviewLoaded {
        ticket: PreviewTicket,
        result: Result<(MovieDetail, Vec<Video>), TmdbError>,
    },
    LaunchFailed(String),
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Transient status line message (launch errors etc.)
    pub status: Option<String>,

    pub search: TextInput,
    pub catalog: CatalogState,
    pub preview: PreviewModal,

    pub recent_open: bool,
    pub recent: RecentPanel,
    pub recent_list: ListState,

    /// Credential dialog, when open
    pub credentials: Option<CredentialsDialog>,

    /// Columns currently laid out in the grid (for up/down moves)
    pub grid_columns: usize,

    storage: Arc<dyn Storage>,
    current_credentials: Credentials,
    history: RecentlyWatched,
    image_base: String,
}

impl App {
    /// Create a new App instance
    pub fn new(storage: Arc<dyn Storage>, credentials: Credentials, image_base: impl Into<String>) -> Self {
        let image_base = image_base.into();
        let history = RecentlyWatched::new(storage.clone());
        let recent = history.panel(&image_base);

        Self {
            running: true,
            input_mode: InputMode::Normal,
            status: None,
            search: TextInput::default(),
            catalog: CatalogState::default(),
            preview: PreviewModal::new(),
            recent_open: false,
            recent_list: ListState::new(recent.len()),
            recent,
            credentials: None,
            grid_columns: 1,
            storage,
            current_credentials: credentials,
            history,
            image_base,
        }
    }

    pub fn current_credentials(&self) -> &Credentials {
        &self.current_credentials
    }

    pub fn history(&self) -> &RecentlyWatched {
        &self.history
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set status line message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Recompute grid columns for the current terminal size
    pub fn set_viewport(&mut self, area: Rect) {
        let regions = ui::layout(area, self.recent_open);
        self.grid_columns = ui::grid::columns_for(regions.grid_inner());
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Start loading a query; the grid shows a spinner until it lands
    pub fn begin_load(&mut self, query: CatalogQuery) -> Action {
        Action::LoadCatalog(self.issue_load(query))
    }

    fn issue_load(&mut self, query: CatalogQuery) -> CatalogTicket {
        let message = match &query {
            CatalogQuery::Popular => "Loading movies...".to_string(),
            CatalogQuery::Search(term) => format!("Searching for \"{}\"...", term),
        };
        self.catalog.loading = LoadingState::Loading(Some(message));
        self.catalog.generation += 1;
        let ticket = CatalogTicket::new(query, self.catalog.generation);
        self.catalog.pending = Some(ticket.clone());
        ticket
    }

    fn apply_catalog(&mut self, ticket: CatalogTicket, outcome: CatalogOutcome) {
        if self.catalog.pending.as_ref() != Some(&ticket) {
            debug!(query = ?ticket.query, "dropping superseded catalog result");
            return;
        }

        self.catalog.view = ui::grid::GridView::from_outcome(&outcome, &self.image_base);
        self.catalog.list = ListState::new(self.catalog.view.len());
        self.catalog.loading = LoadingState::Idle;
        self.catalog.query = self.catalog.pending.take().map(|t| t.query);

        if outcome.needs_credentials() {
            let reason = match &outcome {
                CatalogOutcome::Message { text, .. } => Some(text.clone()),
                CatalogOutcome::Movies(_) => None,
            };
            self.open_credentials(reason);
        }
    }

    // -------------------------------------------------------------------------
    // Preview
    // -------------------------------------------------------------------------

    /// Open the preview for `movie_id`; id 0 means "no movie" and is ignored
    pub fn open_preview(&mut self, movie_id: u64) -> Option<Action> {
        if movie_id == 0 {
            return None;
        }
        info!(movie_id, "opening preview");
        Some(Action::OpenPreview(self.preview.open(movie_id)))
    }

    pub fn close_preview(&mut self) {
        self.preview.close();
    }

    fn apply_preview(&mut self, ticket: PreviewTicket, result: Result<(MovieDetail, Vec<Video>), TmdbError>) {
        if !self.preview.is_current(ticket) {
            return;
        }

        let result = result.map(|(detail, videos)| {
            if let Err(e) = self.history.record(RecentEntry::from_detail(&detail, Utc::now())) {
                warn!(error = %e, "failed to save recently watched");
            }
            PreviewContent::new(&detail, &videos)
        });
        let unauthorized = matches!(&result, Err(e) if e.is_unauthorized());

        self.preview.resolve(ticket, result);
        self.refresh_recent();

        if unauthorized {
            self.open_credentials(Some(
                "Invalid or missing API key. Please update your credentials.".into(),
            ));
        }
    }

    /// Launch the loaded trailer
    fn launch(&self, target: LaunchTarget) -> Option<Action> {
        let url = self.preview.content()?.view.primary_url()?;
        Some(Action::Launch {
            target,
            url: url.to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Recently watched
    // -------------------------------------------------------------------------

    fn refresh_recent(&mut self) {
        self.recent = self.history.panel(&self.image_base);
        self.recent_list.set_len(self.recent.len());
    }

    pub fn toggle_recent(&mut self) {
        self.recent_open = !self.recent_open;
        if self.recent_open {
            self.refresh_recent();
            self.recent_list.first();
        }
    }

    pub fn clear_recent(&mut self) {
        if let Err(e) = self.history.clear() {
            warn!(error = %e, "failed to clear recently watched");
            self.set_status(format!("Failed to clear history: {}", e));
        }
        self.refresh_recent();
    }

    /// Open the selected row's preview and close the panel
    fn open_recent(&mut self, index: usize) -> Option<Action> {
        let id = self.recent.rows().get(index)?.id;
        self.recent_open = false;
        self.open_preview(id)
    }

    // -------------------------------------------------------------------------
    // Credentials
    // -------------------------------------------------------------------------

    /// Show the credential dialog; an open dialog keeps its input and only
    /// takes the new reason
    pub fn open_credentials(&mut self, reason: Option<String>) {
        self.input_mode = InputMode::Normal;
        match self.credentials.as_mut() {
            Some(dialog) => {
                if reason.is_some() {
                    dialog.reason = reason;
                }
            }
            None => self.credentials = Some(CredentialsDialog::new(&self.current_credentials, reason)),
        }
    }

    fn save_credentials(&mut self) -> Option<Action> {
        let dialog = self.credentials.take()?;
        if let Err(e) = self
            .current_credentials
            .update(self.storage.as_ref(), dialog.update())
        {
            warn!(error = %e, "failed to persist credentials");
            self.set_status(format!("Failed to save credentials: {}", e));
        }
        info!(mode = %self.current_credentials.default_mode(), "credentials updated");
        Some(Action::Reconnect {
            credentials: self.current_credentials.clone(),
            reload: self.issue_load(CatalogQuery::Popular),
        })
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Apply a completed async result
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogLoaded { ticket, outcome } => self.apply_catalog(ticket, outcome),
            AppEvent::PreviewLoaded { ticket, result } => self.apply_preview(ticket, result),
            AppEvent::LaunchFailed(message) => self.set_status(message),
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Clear status on any keypress
        self.status = None;

        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        // Route to the top-most layer
        if self.credentials.is_some() {
            self.handle_credentials_key(key)
        } else if self.preview.is_open() {
            self.handle_preview_key(key)
        } else if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else if self.recent_open {
            self.handle_recent_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_credentials_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.credentials = None;
                None
            }
            KeyCode::Enter => self.save_credentials(),
            KeyCode::Tab | KeyCode::BackTab => {
                if let Some(dialog) = &mut self.credentials {
                    dialog.toggle_field();
                }
                None
            }
            _ => {
                if let Some(dialog) = &mut self.credentials {
                    dialog.active_mut().handle_key(key);
                }
                None
            }
        }
    }

    fn handle_preview_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('x') => {
                self.close_preview();
                None
            }
            KeyCode::Char('o') => self.launch(LaunchTarget::Browser),
            KeyCode::Char('p') => self.launch(LaunchTarget::Mpv),
            KeyCode::Char('q') => {
                self.quit();
                None
            }
            _ => None,
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                None
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let query = CatalogQuery::from_term(self.search.value());
                Some(self.begin_load(query))
            }
            _ => {
                self.search.handle_key(key);
                None
            }
        }
    }

    fn handle_recent_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('r') => {
                self.recent_open = false;
                None
            }
            KeyCode::Up => {
                self.recent_list.up();
                None
            }
            KeyCode::Down => {
                self.recent_list.down();
                None
            }
            KeyCode::Char('c') => {
                self.clear_recent();
                None
            }
            KeyCode::Enter => self.open_recent(self.recent_list.selected),
            _ => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        let columns = self.grid_columns.max(1);
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('/') | KeyCode::Char('s') => self.focus_search(),
            KeyCode::Char('r') => self.toggle_recent(),
            KeyCode::Char('k') => self.open_credentials(None),
            KeyCode::Left => self.catalog.list.up(),
            KeyCode::Right => self.catalog.list.down(),
            KeyCode::Up => self.catalog.list.page_up(columns),
            KeyCode::Down => self.catalog.list.page_down(columns),
            KeyCode::Home => self.catalog.list.first(),
            KeyCode::End => self.catalog.list.last(),
            KeyCode::Enter => {
                let id = self.catalog.selected_id()?;
                return self.open_preview(id);
            }
            _ => {}
        }
        None
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    /// Handle a mouse event against the current frame `area`
    pub fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) -> Option<Action> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let pos = Position::new(mouse.column, mouse.row);

        if self.credentials.is_some() {
            return None;
        }

        if self.preview.is_open() {
            // Click on the backdrop closes; clicks inside the dialog are inert
            if !ui::preview::dialog_rect(area).contains(pos) {
                self.close_preview();
            }
            return None;
        }

        let regions = ui::layout(area, self.recent_open);

        if regions.search.contains(pos) {
            self.focus_search();
            return None;
        }

        if let Some(recent_area) = regions.recent {
            if recent_area.contains(pos) {
                let index = ui::recent::hit_test(
                    recent_area,
                    self.recent.len(),
                    self.recent_list.selected,
                    mouse.column,
                    mouse.row,
                )?;
                return self.open_recent(index);
            }
        }

        let index = ui::grid::hit_test(
            regions.grid_inner(),
            self.catalog.view.len(),
            self.catalog.list.selected,
            mouse.column,
            mouse.row,
        )?;
        self.input_mode = InputMode::Normal;
        self.catalog.list.selected = index;
        let id = self.catalog.selected_id()?;
        self.open_preview(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieSummary;
    use crate::preview::PreviewState;
    use crate::storage::MemoryStorage;

    fn app() -> App {
        App::new(
            Arc::new(MemoryStorage::new()),
            Credentials::new(None, Some("key".into())),
            crate::models::IMAGE_BASE_URL,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn movies(n: u64) -> Vec<MovieSummary> {
        (1..=n)
            .map(|id| MovieSummary {
                id,
                title: format!("Movie {}", id),
                poster_path: None,
                vote_average: Some(7.0),
            })
            .collect()
    }

    fn detail(id: u64) -> MovieDetail {
        MovieDetail {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            vote_average: Some(7.0),
            release_date: Some("2020-01-01".into()),
            overview: None,
        }
    }

    fn ticket(action: Option<Action>) -> CatalogTicket {
        match action {
            Some(Action::LoadCatalog(ticket)) => ticket,
            other => panic!("expected catalog load, got {:?}", other),
        }
    }

    fn unauthorized() -> CatalogOutcome {
        CatalogOutcome::Message {
            text: "Failed to load movies. 401 Invalid API key".into(),
            is_error: true,
            needs_credentials: true,
        }
    }

    fn loaded(app: &mut App, n: u64) {
        let ticket = ticket(Some(app.begin_load(CatalogQuery::Popular)));
        assert_eq!(ticket.query, CatalogQuery::Popular);
        app.apply_event(AppEvent::CatalogLoaded {
            ticket,
            outcome: CatalogOutcome::Movies(movies(n)),
        });
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        assert_eq!(list.selected, 0);

        list.down();
        assert_eq!(list.selected, 1);

        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 4);

        // Can't go past end
        list.down();
        assert_eq!(list.selected, 4);

        list.up();
        assert_eq!(list.selected, 3);

        list.first();
        assert_eq!(list.selected, 0);

        list.last();
        assert_eq!(list.selected, 4);
    }

    #[test]
    fn test_list_state_empty() {
        let mut list = ListState::new(0);
        list.down();
        assert_eq!(list.selected, 0);
        list.up();
        assert_eq!(list.selected, 0);
        list.page_down(3);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_set_len() {
        let mut list = ListState::new(10);
        list.selected = 8;

        // Shrinking should clamp selection
        list.set_len(5);
        assert_eq!(list.selected, 4);

        // Growing shouldn't change selection
        list.set_len(10);
        assert_eq!(list.selected, 4);
    }

    // -------------------------------------------------------------------------
    // TextInput Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::default();

        for c in "hello".chars() {
            input.insert(c);
        }
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor(), 5);

        input.cursor_left();
        input.cursor_left();
        input.insert('X');
        assert_eq!(input.value(), "helXlo");

        input.backspace();
        assert_eq!(input.value(), "hello");

        input.cursor_home();
        assert_eq!(input.cursor(), 0);
        input.delete();
        assert_eq!(input.value(), "ello");

        input.cursor_end();
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_text_input_multibyte() {
        let mut input = TextInput::with_value("Amélie");
        input.cursor_left();
        input.cursor_left();
        input.cursor_left();
        assert_eq!(input.split_at_cursor(), ("Amé", "lie"));
        input.backspace();
        assert_eq!(input.value(), "Amlie");
    }

    // -------------------------------------------------------------------------
    // Key Handling Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_app_quit_key() {
        let mut app = app();
        assert!(app.running);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_app_quit_ctrl_c() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_search_submit_trims_term() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in " dune ".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(ticket(action).query, CatalogQuery::Search("dune".into()));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.catalog.loading.is_loading());
    }

    #[test]
    fn test_blank_search_loads_popular() {
        let mut app = app();
        app.focus_search();
        app.handle_key(key(KeyCode::Char(' ')));
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(ticket(action).query, CatalogQuery::Popular);
    }

    #[test]
    fn test_grid_navigation_by_columns() {
        let mut app = app();
        loaded(&mut app, 10);
        app.grid_columns = 3;

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.catalog.list.selected, 3);
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.catalog.list.selected, 4);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.catalog.list.selected, 1);
    }

    #[test]
    fn test_enter_opens_preview_for_selected_card() {
        let mut app = app();
        loaded(&mut app, 3);
        app.handle_key(key(KeyCode::Right));

        let action = app.handle_key(key(KeyCode::Enter));
        match action {
            Some(Action::OpenPreview(ticket)) => assert_eq!(ticket.movie_id, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(app.preview.state(), &PreviewState::Loading { movie_id: 2 });
    }

    #[test]
    fn test_open_preview_ignores_zero_id() {
        let mut app = app();
        assert_eq!(app.open_preview(0), None);
        assert!(!app.preview.is_open());
    }

    #[test]
    fn test_stale_catalog_result_ignored() {
        let mut app = app();
        let popular = ticket(Some(app.begin_load(CatalogQuery::Popular)));
        app.begin_load(CatalogQuery::Search("alien".into()));

        app.apply_event(AppEvent::CatalogLoaded {
            ticket: popular,
            outcome: CatalogOutcome::Movies(movies(5)),
        });
        assert!(app.catalog.loading.is_loading());
        assert!(app.catalog.view.is_empty());
    }

    #[test]
    fn test_older_load_of_same_query_ignored() {
        let mut app = app();
        let first = ticket(Some(app.begin_load(CatalogQuery::Popular)));
        let second = ticket(Some(app.begin_load(CatalogQuery::Popular)));
        assert_ne!(first, second);

        app.apply_event(AppEvent::CatalogLoaded {
            ticket: first,
            outcome: unauthorized(),
        });
        assert!(app.catalog.loading.is_loading());
        assert!(app.credentials.is_none());

        app.apply_event(AppEvent::CatalogLoaded {
            ticket: second,
            outcome: CatalogOutcome::Movies(movies(3)),
        });
        assert_eq!(app.catalog.view.len(), 3);
        assert_eq!(app.catalog.query, Some(CatalogQuery::Popular));
    }

    #[test]
    fn test_unauthorized_catalog_opens_credentials() {
        let mut app = app();
        let ticket = ticket(Some(app.begin_load(CatalogQuery::Popular)));
        app.apply_event(AppEvent::CatalogLoaded {
            ticket,
            outcome: unauthorized(),
        });
        let dialog = app.credentials.as_ref().unwrap();
        assert_eq!(dialog.api_key.value(), "key");
        assert!(dialog.reason.as_ref().unwrap().contains("401"));
    }

    #[test]
    fn test_late_unauthorized_keeps_dialog_input() {
        let mut app = app();
        let ticket = ticket(Some(app.begin_load(CatalogQuery::Popular)));
        app.handle_key(key(KeyCode::Char('k')));
        for c in "newtoken".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }

        app.apply_event(AppEvent::CatalogLoaded {
            ticket,
            outcome: unauthorized(),
        });

        let dialog = app.credentials.as_ref().unwrap();
        assert_eq!(dialog.token.value(), "newtoken");
        assert_eq!(dialog.api_key.value(), "key");
        assert!(dialog.reason.as_ref().unwrap().contains("401"));
    }

    // -------------------------------------------------------------------------
    // Preview Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_preview_success_records_history() {
        let mut app = app();
        let ticket = app.preview.open(7);
        app.apply_event(AppEvent::PreviewLoaded {
            ticket,
            result: Ok((detail(7), vec![])),
        });

        assert_eq!(app.preview.content().unwrap().movie_id, 7);
        assert_eq!(app.history().entries()[0].id, 7);
        assert_eq!(app.recent.len(), 1);
    }

    #[test]
    fn test_stale_preview_not_recorded() {
        let mut app = app();
        let first = app.preview.open(1);
        let _second = app.preview.open(2);
        app.apply_event(AppEvent::PreviewLoaded {
            ticket: first,
            result: Ok((detail(1), vec![])),
        });

        assert_eq!(app.preview.state(), &PreviewState::Loading { movie_id: 2 });
        assert!(app.history().entries().is_empty());
    }

    #[test]
    fn test_preview_failure_keeps_history() {
        let mut app = app();
        let ticket = app.preview.open(1);
        app.apply_event(AppEvent::PreviewLoaded {
            ticket,
            result: Err(TmdbError::Http {
                status: 500,
                message: "Internal Server Error".into(),
            }),
        });
        assert!(matches!(app.preview.state(), PreviewState::Failed { .. }));
        assert!(app.history().entries().is_empty());
    }

    #[test]
    fn test_preview_escape_closes() {
        let mut app = app();
        app.preview.open(1);
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.preview.is_open());
        // Esc is one-shot: the next Esc has nothing to close
        app.handle_key(key(KeyCode::Esc));
        assert!(app.running);
    }

    #[test]
    fn test_preview_open_in_browser() {
        let mut app = app();
        let ticket = app.preview.open(3);
        app.apply_event(AppEvent::PreviewLoaded {
            ticket,
            result: Ok((detail(3), vec![])),
        });
        let action = app.handle_key(key(KeyCode::Char('o')));
        assert_eq!(
            action,
            Some(Action::Launch {
                target: LaunchTarget::Browser,
                url: "https://www.themoviedb.org/movie/3".into()
            })
        );
    }

    #[test]
    fn test_click_outside_dialog_closes_preview() {
        let mut app = app();
        app.preview.open(1);
        let area = Rect::new(0, 0, 100, 40);

        let inside = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 50,
            row: 20,
            modifiers: KeyModifiers::empty(),
        };
        app.handle_mouse(inside, area);
        assert!(app.preview.is_open());

        let outside = MouseEvent { column: 1, row: 1, ..inside };
        app.handle_mouse(outside, area);
        assert!(!app.preview.is_open());
    }

    #[test]
    fn test_click_card_opens_preview() {
        let mut app = app();
        loaded(&mut app, 4);
        let area = Rect::new(0, 0, 100, 40);
        app.set_viewport(area);

        // Grid starts below the 3-row header; first card's inner area at (1, 4)
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 5,
            modifiers: KeyModifiers::empty(),
        };
        match app.handle_mouse(click, area) {
            Some(Action::OpenPreview(ticket)) => assert_eq!(ticket.movie_id, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    // -------------------------------------------------------------------------
    // Recent Panel Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_recent_toggle_and_clear() {
        let mut app = app();
        app.history().record(RecentEntry::from_detail(&detail(5), Utc::now())).unwrap();

        app.handle_key(key(KeyCode::Char('r')));
        assert!(app.recent_open);
        assert_eq!(app.recent.len(), 1);

        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.recent.is_empty());
        assert!(app.history().entries().is_empty());

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.recent_open);
    }

    #[test]
    fn test_recent_enter_opens_preview_and_closes_panel() {
        let mut app = app();
        app.history().record(RecentEntry::from_detail(&detail(9), Utc::now())).unwrap();
        app.toggle_recent();

        let action = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(action, Some(Action::OpenPreview(t)) if t.movie_id == 9));
        assert!(!app.recent_open);
    }

    // -------------------------------------------------------------------------
    // Credential Dialog Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_credentials_save_and_retry() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('k')));
        assert!(app.credentials.is_some());

        for c in "tok".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let action = app.handle_key(key(KeyCode::Enter));

        assert!(app.credentials.is_none());
        match action {
            Some(Action::Reconnect { credentials, reload }) => {
                assert_eq!(credentials.token(), Some("tok"));
                assert_eq!(credentials.api_key(), Some("key"));
                assert_eq!(reload.query, CatalogQuery::Popular);
                assert_eq!(app.catalog.pending, Some(reload));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            app.storage.get(crate::storage::TOKEN_KEY).unwrap().as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn test_credentials_escape_cancels() {
        let mut app = app();
        app.open_credentials(None);
        app.handle_key(key(KeyCode::Char('z')));
        assert_eq!(app.handle_key(key(KeyCode::Esc)), None);
        assert!(app.credentials.is_none());
        assert_eq!(app.current_credentials().token(), None);
    }
}
