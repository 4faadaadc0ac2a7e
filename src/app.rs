//! Application State
//!
//! Central application state management for ttargets.

use crate::api::client::{format_api_error, ApiClient};
use crate::config::Config;
use crate::resource::FetchState;
use crate::router::{parse_command, Routable, RouteRequest, Router};
use crate::view::{ActiveView, ListFragment, Renderable, TargetItemView, TargetListView};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use std::ops::Range;

/// Default viewport height (will be updated during render based on terminal size)
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Commands that are not routes
const BUILTIN_COMMANDS: &[&str] = &["back", "help", "quit", "refresh"];

/// Application modes
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,  // Viewing the current route
    Command, // : command input
    Help,    // ? help popup
}

/// Main application state
pub struct App {
    pub client: ApiClient,
    pub router: Router,

    // Current route and the view built for it
    pub view: Option<ActiveView>,
    pub current_route: Option<RouteRequest>,
    pub history: Vec<RouteRequest>,

    // Navigation state
    pub selected: usize,
    pub mode: Mode,
    pub filter_active: bool,
    pub describe_scroll: usize,

    // Command input
    pub command_text: String,
    pub command_suggestions: Vec<String>,
    pub command_suggestion_selected: usize,
    pub command_preview: Option<String>,

    // UI state
    pub error_message: Option<String>,
    pub last_updated: Option<DateTime<Local>>,

    // Persistent configuration
    pub config: Config,

    // Key press tracking
    pub last_key_press: Option<(KeyCode, std::time::Instant)>,

    // Virtual scrolling
    pub viewport_height: usize,
    pub scroll_offset: usize,
}

impl App {
    pub fn new(client: ApiClient, router: Router, config: Config) -> Self {
        Self {
            client,
            router,
            view: None,
            current_route: None,
            history: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            filter_active: false,
            describe_scroll: 0,
            command_text: String::new(),
            command_suggestions: Vec::new(),
            command_suggestion_selected: 0,
            command_preview: None,
            error_message: None,
            last_updated: None,
            config,
            last_key_press: None,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_offset: 0,
        }
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Open a route, remembering the current one for `back`
    pub fn navigate(&mut self, request: RouteRequest) {
        let previous = self.current_route.clone();
        if self.open_route(request) {
            if let Some(prev) = previous {
                self.history.push(prev);
            }
        }
    }

    /// Open a route given as command text (`target 42`, `/targets/42`)
    pub fn navigate_command(&mut self, input: &str) {
        match parse_command(input) {
            Some(request) => self.navigate(request),
            None => self.error_message = Some(format!("Not a route: {}", input.trim())),
        }
    }

    /// Return to the previous route with fresh data
    pub fn navigate_back(&mut self) {
        if let Some(prev) = self.history.pop() {
            if !self.open_route(prev.clone()) {
                self.history.push(prev);
            }
        }
    }

    /// Re-open the current route, which fetches again
    pub fn refresh_current(&mut self) {
        if let Some(current) = self.current_route.clone() {
            self.open_route(current);
        }
    }

    fn open_route(&mut self, request: RouteRequest) -> bool {
        match self.router.navigate(&self.client, &request) {
            Ok(view) => {
                self.view = Some(view);
                self.selected = 0;
                self.scroll_offset = 0;
                self.describe_scroll = 0;
                self.filter_active = false;
                self.error_message = None;
                self.last_updated = None;
                self.mode = Mode::Normal;

                if let Err(e) = self.config.set_last_route(&request.to_string()) {
                    tracing::warn!("Failed to save last route: {}", e);
                }
                self.current_route = Some(request);
                true
            },
            Err(e) => {
                tracing::warn!("Navigation failed: {:#}", e);
                self.error_message = Some(format_api_error(&e));
                false
            },
        }
    }

    /// Apply a resolved fetch to the current view
    pub fn sync_view(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };

        if view.sync() {
            self.last_updated = Some(Local::now());
            let rows = self.row_count();
            if self.selected >= rows {
                self.selected = rows.saturating_sub(1);
            }
        }
    }

    /// Fetch state of the current view
    pub fn fetch_state(&self) -> FetchState {
        self.view
            .as_ref()
            .map(ActiveView::fetch_state)
            .unwrap_or(FetchState::Unfetched)
    }

    pub fn route_label(&self) -> String {
        self.current_route
            .as_ref()
            .map(RouteRequest::to_string)
            .unwrap_or_else(|| "-".to_string())
    }

    /// Breadcrumb from history to current route
    pub fn get_breadcrumb(&self) -> Vec<String> {
        self.history
            .iter()
            .chain(self.current_route.iter())
            .map(RouteRequest::to_string)
            .collect()
    }

    // =========================================================================
    // List View Access
    // =========================================================================

    pub fn list_view(&self) -> Option<&TargetListView> {
        match &self.view {
            Some(ActiveView::List(view)) => Some(view),
            _ => None,
        }
    }

    pub fn list_view_mut(&mut self) -> Option<&mut TargetListView> {
        match &mut self.view {
            Some(ActiveView::List(view)) => Some(view),
            _ => None,
        }
    }

    pub fn item_view(&self) -> Option<&TargetItemView> {
        match &self.view {
            Some(ActiveView::Item(view)) => Some(view),
            _ => None,
        }
    }

    /// Rendered home table, when the list route is open
    pub fn list_fragment(&self) -> Option<ListFragment> {
        self.list_view().map(|view| view.render())
    }

    /// Rows shown by the list view after filtering
    pub fn row_count(&self) -> usize {
        self.list_fragment().map(|f| f.rows.len()).unwrap_or(0)
    }

    /// Id of the highlighted row
    pub fn selected_row_id(&self) -> Option<String> {
        self.list_fragment()?
            .rows
            .into_iter()
            .nth(self.selected)
            .and_then(|row| row.id)
    }

    /// Open the detail route of the highlighted row
    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_row_id() {
            self.navigate(RouteRequest::new(TargetItemView::ROUTE_NAME, vec![id]));
        }
    }

    // =========================================================================
    // Filtering and Sorting
    // =========================================================================

    pub fn filter_text(&self) -> &str {
        self.list_view().map(|v| v.filter.text()).unwrap_or("")
    }

    pub fn push_filter_char(&mut self, c: char) {
        if let Some(view) = self.list_view_mut() {
            view.filter.push(c);
        }
        self.reset_selection();
    }

    pub fn pop_filter_char(&mut self) {
        if let Some(view) = self.list_view_mut() {
            view.filter.pop();
        }
        self.reset_selection();
    }

    pub fn clear_filter(&mut self) {
        self.filter_active = false;
        if let Some(view) = self.list_view_mut() {
            view.filter.clear();
        }
        self.reset_selection();
    }

    pub fn sort_by_column(&mut self, column_index: usize) {
        let Some(view) = self.list_view_mut() else {
            return;
        };
        if column_index < view.column_count() {
            view.sorter.sort_by_column(column_index);
        }
    }

    /// Restore response order
    pub fn clear_sort(&mut self) {
        if let Some(view) = self.list_view_mut() {
            view.sorter.clear();
        }
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn in_item_view(&self) -> bool {
        self.item_view().is_some()
    }

    pub fn next(&mut self) {
        if self.in_item_view() {
            self.describe_scroll = self.describe_scroll.saturating_add(1);
            return;
        }
        let rows = self.row_count();
        if rows > 0 {
            self.selected = (self.selected + 1).min(rows - 1);
        }
    }

    pub fn previous(&mut self) {
        if self.in_item_view() {
            self.describe_scroll = self.describe_scroll.saturating_sub(1);
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        if self.in_item_view() {
            self.describe_scroll = 0;
        } else {
            self.selected = 0;
        }
    }

    pub fn go_to_bottom(&mut self) {
        if self.in_item_view() {
            self.describe_scroll = self.describe_line_count();
            return;
        }
        let rows = self.row_count();
        if rows > 0 {
            self.selected = rows - 1;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.in_item_view() {
            self.describe_scroll = self.describe_scroll.saturating_add(page_size);
            return;
        }
        let rows = self.row_count();
        if rows > 0 {
            self.selected = (self.selected + page_size).min(rows - 1);
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        if self.in_item_view() {
            self.describe_scroll = self.describe_scroll.saturating_sub(page_size);
        } else {
            self.selected = self.selected.saturating_sub(page_size);
        }
    }

    /// Lines of the rendered detail page
    pub fn describe_line_count(&self) -> usize {
        self.item_view()
            .map(|view| {
                let fragment = view.render();
                fragment.fields.len() + fragment.json.lines().count() + 2
            })
            .unwrap_or(0)
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_text.clear();
        self.command_suggestions = self.get_available_commands();
        self.command_suggestion_selected = 0;
        self.update_preview();
    }

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Route names, built-ins, and `target <id>` for loaded rows
    pub fn get_available_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = self
            .router
            .route_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        commands.extend(BUILTIN_COMMANDS.iter().map(|s| s.to_string()));

        if let Some(view) = self.list_view() {
            commands.extend(view.collection().models().iter().filter_map(|m| {
                m.id().map(|id| {
                    RouteRequest::new(TargetItemView::ROUTE_NAME, vec![id.to_string()])
                        .to_string()
                })
            }));
        }

        commands.sort();
        commands.dedup();
        commands
    }

    pub fn update_command_suggestions(&mut self) {
        let input = self.command_text.to_lowercase();
        let all_commands = self.get_available_commands();

        if input.is_empty() {
            self.command_suggestions = all_commands;
        } else {
            self.command_suggestions = all_commands
                .into_iter()
                .filter(|cmd| cmd.to_lowercase().contains(&input))
                .collect();
        }

        if self.command_suggestion_selected >= self.command_suggestions.len() {
            self.command_suggestion_selected = 0;
        }

        self.update_preview();
    }

    fn update_preview(&mut self) {
        self.command_preview = self
            .command_suggestions
            .get(self.command_suggestion_selected)
            .cloned();
    }

    pub fn next_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            self.command_suggestion_selected =
                (self.command_suggestion_selected + 1) % self.command_suggestions.len();
            self.update_preview();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            if self.command_suggestion_selected == 0 {
                self.command_suggestion_selected = self.command_suggestions.len() - 1;
            } else {
                self.command_suggestion_selected -= 1;
            }
            self.update_preview();
        }
    }

    pub fn apply_suggestion(&mut self) {
        if let Some(preview) = &self.command_preview {
            self.command_text = preview.clone();
            self.update_command_suggestions();
        }
    }

    /// Run the typed command (or the highlighted suggestion); true means quit
    pub fn execute_command(&mut self) -> Result<bool> {
        let typed = self.command_text.trim().to_string();
        let command = if typed.is_empty() {
            self.command_preview.clone().unwrap_or_default()
        } else {
            typed
        };

        self.mode = Mode::Normal;
        self.command_text.clear();

        match command.as_str() {
            "" => {},
            "q" | "quit" => return Ok(true),
            "back" => self.navigate_back(),
            "refresh" => self.refresh_current(),
            "help" => self.enter_help_mode(),
            other => self.navigate_command(other),
        }

        Ok(false)
    }

    // =========================================================================
    // Virtual Scrolling
    // =========================================================================

    /// Update the viewport height (called from UI during render)
    pub fn update_viewport(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Ensure the selected row is visible in the viewport
    pub fn ensure_visible(&mut self, total_rows: usize) {
        if total_rows == 0 {
            self.scroll_offset = 0;
            return;
        }

        let visible_height = self.viewport_height.max(1);
        // Small viewports cannot afford the full margin
        let margin = 2.min((visible_height - 1) / 2);

        if self.selected < self.scroll_offset + margin {
            self.scroll_offset = self.selected.saturating_sub(margin);
        } else if self.selected >= self.scroll_offset + visible_height - margin {
            self.scroll_offset = self.selected - (visible_height - margin - 1);
        }

        let max_offset = total_rows.saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Range of visible rows based on scroll offset and viewport
    pub fn visible_range(&self, total_rows: usize) -> Range<usize> {
        let start = self.scroll_offset.min(total_rows);
        let end = (self.scroll_offset + self.viewport_height).min(total_rows);
        start..end
    }
}
