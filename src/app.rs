//! Application state management for Skycast
//!
//! This module contains the main application state: the dashboard, the search
//! input, keyboard handling, and the bookkeeping that ties background fetch
//! results back to the request that started them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::location::{resolve_from_text, LocationQuery};
use crate::pipeline::{self, PipelineOutcome, Renderer};
use crate::ui::Dashboard;
use crate::worker::WorkerMessage;

/// Whether keystrokes go to the search bar or to commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// A fetch that has been started and not yet completed
#[derive(Debug, Clone, PartialEq)]
struct InFlight {
    request_id: u64,
    query: LocationQuery,
}

/// Main application struct managing state and data
#[derive(Debug, Default)]
pub struct App {
    /// Display surfaces and loading flag
    pub dashboard: Dashboard,
    /// Text typed into the search bar
    pub input: String,
    /// Current keyboard mode
    pub input_mode: InputMode,
    /// Place shown on the dashboard, if any
    pub current_query: Option<LocationQuery>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Search waiting to be started by the UI loop
    pending_search: Option<LocationQuery>,
    /// Id of the most recently started fetch
    last_request_id: u64,
    /// Latest fetch still waiting for its result
    in_flight: Option<InFlight>,
}

impl App {
    /// Creates a new App instance with default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an App that searches for `query` as soon as the loop starts
    pub fn with_initial_search(query: LocationQuery) -> Self {
        let mut app = Self::new();
        app.request_search(query);
        app
    }

    /// Queue a search for the UI loop; empty queries are dropped
    pub fn request_search(&mut self, query: LocationQuery) {
        if query.is_empty() {
            tracing::debug!("ignoring empty search");
            return;
        }
        self.pending_search = Some(query);
    }

    /// Takes the queued search, if any
    pub fn take_pending_search(&mut self) -> Option<LocationQuery> {
        self.pending_search.take()
    }

    /// Whether a search has been queued, started, or shown already
    fn has_user_search(&self) -> bool {
        self.pending_search.is_some() || self.last_request_id > 0 || self.current_query.is_some()
    }

    /// Whether a fetch is currently waiting for its result
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a fetch: show the loader and hand out a request id
    ///
    /// Returns `None` for an empty query, in which case nothing should be
    /// fetched. A newer request supersedes any fetch still in flight.
    pub fn begin_search(&mut self, query: LocationQuery) -> Option<u64> {
        if query.is_empty() {
            return None;
        }

        self.last_request_id += 1;
        let request_id = self.last_request_id;

        if let Some(previous) = self.in_flight.replace(InFlight {
            request_id,
            query: query.clone(),
        }) {
            tracing::debug!(
                superseded = previous.request_id,
                location = %previous.query,
                "search superseded by a newer one"
            );
        }

        tracing::info!(request_id, location = %query, "fetching weather");
        self.dashboard.show_loading();
        Some(request_id)
    }

    /// Apply a result from a background task
    pub fn handle_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::LocationResolved(Ok(query)) => {
                if self.has_user_search() {
                    tracing::debug!(
                        location = %query,
                        "device location resolved after a search, ignoring"
                    );
                    return;
                }
                tracing::info!(location = %query, "device location resolved");
                self.request_search(query);
            }
            WorkerMessage::LocationResolved(Err(e)) => {
                // No dialog: the user can still search manually
                tracing::info!(error = %e, "device location unavailable");
            }
            WorkerMessage::FetchCompleted {
                request_id,
                query,
                snapshot,
            } => self.complete_search(request_id, query, snapshot.as_deref()),
        }
    }

    fn complete_search(
        &mut self,
        request_id: u64,
        query: LocationQuery,
        snapshot: Option<&crate::data::WeatherSnapshot>,
    ) {
        match &self.in_flight {
            Some(in_flight) if in_flight.request_id == request_id => {}
            _ => {
                tracing::debug!(request_id, location = %query, "dropping stale result");
                return;
            }
        }
        self.in_flight = None;

        if pipeline::finish(&mut self.dashboard, &query, snapshot) == PipelineOutcome::Applied {
            self.current_query = Some(query);
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `/` or `s`: Focus the search bar
    /// - `Enter` (editing): Search for the typed place
    /// - `Esc` (editing): Leave the search bar, keeping the text
    /// - `r`: Refresh the current place
    /// - `?`: Toggle help
    /// - `q` or `Esc`: Quit
    /// - `Ctrl+C`: Quit from any mode
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {} // Ignore other keys when help is shown
            }
            return;
        }

        match self.input_mode {
            InputMode::Normal => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('/') | KeyCode::Char('s') => {
                    self.input_mode = InputMode::Editing;
                }
                KeyCode::Char('r') => {
                    if let Some(query) = self.current_query.clone() {
                        self.request_search(query);
                    }
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            InputMode::Editing => match key_event.code {
                KeyCode::Enter => {
                    self.submit_search();
                }
                KeyCode::Esc => {
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                }
                _ => {}
            },
        }
    }

    /// Resolve the search bar text and queue it
    fn submit_search(&mut self) {
        let query = resolve_from_text(&self.input);
        self.input.clear();
        self.input_mode = InputMode::Normal;
        self.request_search(query);
    }
}
