//! Main application state.
//!
//! This module implements The Elm Architecture (TEA) pattern: [`App::update`]
//! handles terminal events, [`App::handle_api_message`] handles results of
//! background requests, and [`App::view`] renders the current state.
//!
//! The app never performs I/O for server calls itself. Requests are queued
//! in an outbox that the main loop drains with [`App::take_requests`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, error, info, trace, warn};

use crate::api::{ResumeClient, ResumeId, ResumeSummary};
use crate::config::{Profile, Settings};
use crate::events::Event;
use crate::resume::Record;
use crate::tasks::{ApiMessage, ApiRequest, LoadPurpose};
use crate::ui::components::{
    render_help_bar, ConfirmAction, ConfirmDialog, ErrorDialog, LoadingIndicator,
    NotificationManager, ResumePicker, ResumePickerAction,
};
use crate::ui::theme::theme;
use crate::ui::views::{DetailAction, DetailView, EditAction, EditView};

/// Opens a URL outside the terminal.
pub type UrlOpener = Box<dyn Fn(&str) -> std::io::Result<()>>;

/// The current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Waiting for the client to connect.
    #[default]
    Connecting,
    /// No resume open.
    Home,
    ResumeDetail,
    ResumeEdit,
    Exiting,
}

pub struct App {
    state: AppState,
    should_quit: bool,
    profile: Profile,
    settings: Settings,
    client: Option<ResumeClient>,
    picker: ResumePicker,
    detail_view: DetailView,
    edit_view: EditView,
    confirm_dialog: ConfirmDialog<ResumeId>,
    error_dialog: ErrorDialog,
    notifications: NotificationManager,
    loading: LoadingIndicator,
    /// Requests waiting to be dispatched by the main loop.
    outbox: Vec<ApiRequest>,
    open_url: UrlOpener,
}

impl App {
    /// Create the app and queue the initial connection.
    pub fn new(profile: Profile, settings: Settings) -> Self {
        debug!(profile = %profile.name, "Creating application");
        let mut app = Self {
            state: AppState::Connecting,
            should_quit: false,
            profile,
            settings,
            client: None,
            picker: ResumePicker::new(),
            detail_view: DetailView::new(),
            edit_view: EditView::new(),
            confirm_dialog: ConfirmDialog::new(),
            error_dialog: ErrorDialog::new(),
            notifications: NotificationManager::new(),
            loading: LoadingIndicator::new(),
            outbox: Vec::new(),
            open_url: Box::new(open_in_browser),
        };
        app.connect();
        app
    }

    /// Replace the browser launcher.
    pub fn with_url_opener(mut self, open_url: UrlOpener) -> Self {
        self.open_url = open_url;
        self
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn client(&self) -> Option<&ResumeClient> {
        self.client.as_ref()
    }

    pub fn picker(&self) -> &ResumePicker {
        &self.picker
    }

    pub fn detail_view(&self) -> &DetailView {
        &self.detail_view
    }

    pub fn edit_view(&self) -> &EditView {
        &self.edit_view
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn error_dialog(&self) -> &ErrorDialog {
        &self.error_dialog
    }

    pub fn confirm_dialog(&self) -> &ConfirmDialog<ResumeId> {
        &self.confirm_dialog
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    /// Drain the queued requests.
    pub fn take_requests(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.outbox)
    }

    fn queue(&mut self, request: ApiRequest, message: &str) {
        trace!(?request, "Queueing request");
        self.loading.start(message);
        self.outbox.push(request);
    }

    /// Queue a connection attempt with the current profile.
    pub fn connect(&mut self) {
        info!(profile = %self.profile.name, url = %self.profile.url, "Connecting");
        self.state = AppState::Connecting;
        let request = ApiRequest::Connect {
            profile: self.profile.clone(),
            settings: self.settings.clone(),
        };
        self.queue(request, "Connecting...");
    }

    /// Show the resume list with no entries and queue one list request.
    pub fn open_resume_list(&mut self) {
        if self.client.is_none() {
            self.notifications.warning("Not connected to a server");
            return;
        }
        self.picker.show();
        self.queue(ApiRequest::ListResumeIds, "Loading resumes...");
    }

    /// Apply a fetched resume list.
    ///
    /// Failures are logged only; the list stays empty.
    pub fn on_resume_ids(&mut self, result: Result<Vec<ResumeSummary>, String>) {
        match result {
            Ok(list) => {
                debug!(count = list.len(), "Resume list received");
                self.picker.set_entries(list);
            }
            Err(e) => {
                error!(error = %e, "Failed to load resume list");
                self.picker.clear_loading();
            }
        }
    }

    /// Queue loading a resume for the detail view.
    pub fn view_resume(&mut self, id: ResumeId) {
        self.load_resume(id, LoadPurpose::View);
    }

    /// Queue loading a resume into the edit form.
    pub fn edit_resume(&mut self, id: ResumeId) {
        self.load_resume(id, LoadPurpose::Edit);
    }

    fn load_resume(&mut self, id: ResumeId, purpose: LoadPurpose) {
        self.picker.hide();
        self.queue(ApiRequest::LoadResume { id, purpose }, "Loading resume...");
    }

    /// Show a loaded resume. Failures leave the current view untouched.
    pub fn on_resume_loaded(
        &mut self,
        id: ResumeId,
        purpose: LoadPurpose,
        result: Result<Record, String>,
    ) {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                error!(resume_id = %id, error = %e, "Failed to load resume");
                return;
            }
        };

        match purpose {
            LoadPurpose::View => {
                self.detail_view.show(id, &record);
                self.state = AppState::ResumeDetail;
            }
            LoadPurpose::Edit => {
                self.edit_view.load(id, &record);
                self.state = AppState::ResumeEdit;
            }
        }
    }

    /// Open the export URL of a resume in the browser.
    pub fn export(&mut self, id: &ResumeId) {
        let Some(client) = &self.client else {
            warn!(resume_id = %id, "Export requested without a client");
            return;
        };
        let url = client.export_url(id);
        info!(%url, "Opening export");
        if let Err(e) = (self.open_url)(&url) {
            warn!(%url, error = %e, "Failed to open browser");
        }
    }

    /// Ask for confirmation before deleting.
    pub fn request_delete(&mut self, id: ResumeId) {
        let message = format!("Delete resume {}?", id);
        self.confirm_dialog.show("Delete Resume", message, id);
    }

    fn confirm_delete(&mut self, id: ResumeId) {
        info!(resume_id = %id, "Delete confirmed");
        self.queue(ApiRequest::DeleteResume { id }, "Deleting resume...");
    }

    /// Apply a delete result.
    ///
    /// Success reopens the list, which fetches it again. Failure shows the
    /// server's text and leaves the list as it was.
    pub fn on_resume_deleted(&mut self, id: ResumeId, result: Result<String, String>) {
        match result {
            Ok(_) => {
                info!(resume_id = %id, "Resume deleted");
                self.notifications.success("Resume deleted successfully");
                self.picker.hide();
                self.open_resume_list();
            }
            Err(text) => {
                warn!(resume_id = %id, error = %text, "Delete failed");
                self.error_dialog
                    .show("Delete Failed", format!("Error deleting resume: {}", text));
            }
        }
    }

    /// Submit the edit form as a new resume.
    ///
    /// Blank required controls are reported and nothing is sent.
    pub fn save_resume(&mut self) {
        let missing = self.edit_view.form().missing_required();
        if !missing.is_empty() {
            self.notifications
                .error(format!("Required: {}", missing.join(", ")));
            return;
        }
        let fields = self.edit_view.form().to_form_fields();
        info!(fields = fields.len(), "Saving resume");
        self.queue(ApiRequest::SaveResume { fields }, "Saving resume...");
    }

    /// Apply a save result. Failure shows the server's text.
    pub fn on_resume_saved(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                info!("Resume saved");
                self.notifications.success("Resume saved successfully");
            }
            Err(text) => {
                warn!(error = %text, "Save failed");
                self.error_dialog
                    .show("Save Failed", format!("Error saving resume: {}", text));
            }
        }
    }

    fn on_connected(&mut self, result: Result<ResumeClient, String>) {
        self.state = AppState::Home;
        match result {
            Ok(client) => {
                info!(base_url = client.base_url(), "Connected");
                self.client = Some(client);
                self.open_resume_list();
            }
            Err(e) => {
                error!(error = %e, "Connection failed");
                self.error_dialog.show("Connection Failed", e);
            }
        }
    }

    /// Apply the result of a background request.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        self.loading.finish();
        match message {
            ApiMessage::Connected(result) => self.on_connected(result),
            ApiMessage::ResumeIdsFetched(result) => self.on_resume_ids(result),
            ApiMessage::ResumeLoaded {
                id,
                purpose,
                result,
            } => self.on_resume_loaded(id, purpose, result),
            ApiMessage::ResumeDeleted { id, result } => self.on_resume_deleted(id, result),
            ApiMessage::ResumeSaved(result) => self.on_resume_saved(result),
        }
    }

    /// Update the application state based on a terminal event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key_event(key);
            }
            Event::Resize(width, height) => trace!(width, height, "Terminal resize"),
            Event::Tick => {
                self.loading.tick();
                self.notifications.tick();
            }
        }
    }

    fn quit(&mut self) {
        info!("Quit requested");
        self.should_quit = true;
        self.state = AppState::Exiting;
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            self.quit();
            return;
        }

        // Dialogs block all other input, topmost first.
        if self.error_dialog.is_visible() {
            self.error_dialog.handle_input(key);
            return;
        }
        if self.confirm_dialog.is_visible() {
            match self.confirm_dialog.handle_input(key) {
                Some(ConfirmAction::Confirm(id)) => self.confirm_delete(id),
                Some(ConfirmAction::Cancel) => debug!("Delete cancelled"),
                None => {}
            }
            return;
        }
        if self.picker.is_visible() {
            if let Some(action) = self.picker.handle_input(key) {
                self.handle_picker_action(action);
            }
            return;
        }

        match self.state {
            AppState::Connecting | AppState::Home => match key.code {
                KeyCode::Char('q') => self.quit(),
                KeyCode::Char('l') => self.open_resume_list(),
                KeyCode::Char('c') if self.client.is_none() => self.connect(),
                _ => {}
            },
            AppState::ResumeDetail => {
                if key.code == KeyCode::Char('l') {
                    self.open_resume_list();
                    return;
                }
                match self.detail_view.handle_input(key) {
                    Some(DetailAction::Back) => self.state = AppState::Home,
                    Some(DetailAction::Edit(id)) => self.edit_resume(id),
                    Some(DetailAction::Export(id)) => self.export(&id),
                    None => {}
                }
            }
            AppState::ResumeEdit => match self.edit_view.handle_input(key) {
                Some(EditAction::Back) => self.state = AppState::Home,
                Some(EditAction::Save) => self.save_resume(),
                None => {}
            },
            AppState::Exiting => {}
        }
    }

    fn handle_picker_action(&mut self, action: ResumePickerAction) {
        match action {
            ResumePickerAction::View(id) => self.view_resume(id),
            ResumePickerAction::Edit(id) => self.edit_resume(id),
            ResumePickerAction::Export(id) => self.export(&id),
            ResumePickerAction::Delete(id) => self.request_delete(id),
            ResumePickerAction::Refresh => self.open_resume_list(),
            ResumePickerAction::Close => debug!("Resume list closed"),
        }
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        match self.state {
            AppState::ResumeDetail => self.detail_view.render(frame, chunks[1]),
            AppState::ResumeEdit => self.edit_view.render(frame, chunks[1]),
            _ => self.render_home(frame, chunks[1]),
        }
        self.render_footer(frame, chunks[2]);

        self.notifications.render(frame, area);
        self.picker.render(frame, area);
        self.confirm_dialog.render(frame, area);
        self.error_dialog.render(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let line = Line::from(vec![
            Span::styled(" resumedeck ", t.title_style()),
            Span::styled(
                format!(" {}  {}", self.profile.name, self.profile.url),
                t.hint_style(),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(t.border_style(false)),
            ),
            area,
        );
    }

    fn render_home(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let text = match (self.state, &self.client) {
            (AppState::Connecting, _) => "Connecting...",
            (_, None) => "Not connected. Press c to retry.",
            _ => "Press l to open the resume list.",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, t.hint_style()))
                .alignment(ratatui::layout::Alignment::Center),
            Rect {
                y: area.y + area.height / 2,
                height: 1.min(area.height),
                ..area
            },
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints: &[(&str, &str)] = match self.state {
            AppState::ResumeDetail => &[
                ("j/k", "scroll"),
                ("e", "edit"),
                ("x", "export"),
                ("l", "list"),
                ("Esc", "back"),
            ],
            AppState::ResumeEdit => &[
                ("Tab/S-Tab", "next/prev field"),
                ("C-s", "save"),
                ("Esc", "back"),
            ],
            _ => &[("l", "list"), ("q", "quit")],
        };

        if self.loading.is_active() {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(24), Constraint::Min(1)])
                .split(area);
            self.loading.render(frame, chunks[0]);
            render_help_bar(frame, chunks[1], hints);
        } else {
            render_help_bar(frame, area, hints);
        }
    }
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    open::that(url)
}
