use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::api::{ApiClient, ApiError};
use crate::form::TimerForm;
use crate::locales::Locale;
use crate::models::{Activity, Project, Suggestion};
use crate::storage::{self, ThemePreference};
use crate::store::{Action, ActivityStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Loading,
    Timer,
    ProjectSelect,
    Login,
    Settings,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Theme,
    Locale,
}

pub const SETTINGS_ITEMS: [SettingsItem; 2] = [SettingsItem::Theme, SettingsItem::Locale];

pub struct App {
    pub should_quit: bool,
    pub needs_refresh: bool,
    pub mode: Mode,
    pub status: Option<String>,
    pub input: String,
    pub token: Option<String>,
    pub server_url: String,
    pub locale: Locale,
    pub theme: ThemePreference,
    pub form: TimerForm,
    pub store: Option<ActivityStore>,
    pub projects: Vec<Project>,
    pub project_state: ListState,
    pub settings_state: ListState,
    pub last_refresh: Option<DateTime<Local>>,
    pub show_help: bool,
    cached_activities: Vec<Activity>,
    toast: Option<Toast>,
}

impl App {
    pub fn new(
        server: Option<String>,
        locale: Option<Locale>,
        theme: Option<ThemePreference>,
        force_login: bool,
    ) -> Self {
        let token = if force_login {
            None
        } else {
            storage::read_token()
        };
        let server_url = server
            .or_else(storage::read_server_url)
            .unwrap_or_else(|| storage::DEFAULT_SERVER_URL.to_string());
        let locale = locale.or_else(storage::read_locale).unwrap_or_default();
        let theme = theme
            .or_else(storage::read_theme)
            .unwrap_or(ThemePreference::Terminal);
        let mode = if token.is_some() {
            Mode::Loading
        } else {
            Mode::Login
        };

        let mut projects = Vec::new();
        let mut cached_activities = Vec::new();
        if let (Some(token), Some(cache)) = (&token, storage::read_cache()) {
            if cache.token_hash == storage::hash_token(token) {
                if let Some(cached) = cache.projects {
                    projects = cached.data;
                }
                if let Some(cached) = cache.activities {
                    cached_activities = cached.data;
                }
            }
        }

        let mut project_state = ListState::default();
        project_state.select(Some(0));
        let mut settings_state = ListState::default();
        settings_state.select(Some(0));

        App {
            should_quit: false,
            needs_refresh: token.is_some(),
            mode,
            status: None,
            input: String::new(),
            token,
            server_url,
            locale,
            theme,
            form: TimerForm::new(),
            store: None,
            projects,
            project_state,
            settings_state,
            last_refresh: None,
            show_help: false,
            cached_activities,
            toast: None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Login => self.handle_login_input(key),
            Mode::ProjectSelect => self.handle_project_select_input(key),
            Mode::Settings => self.handle_settings_input(key),
            Mode::Timer | Mode::Loading | Mode::Error => self.handle_timer_input(key),
        }
    }

    pub fn refresh_data(&mut self) {
        self.needs_refresh = false;
        self.status = None;

        let token = match self.token.clone() {
            Some(token) => token,
            None => {
                self.mode = Mode::Login;
                return;
            }
        };

        let client = ApiClient::new(self.server_url.clone(), token.clone(), self.locale);

        let mut store = match self.store.take() {
            Some(mut store) => {
                store.set_client(client.clone());
                store
            }
            None => {
                let mut store = ActivityStore::new(client.clone());
                store.seed_recent(std::mem::take(&mut self.cached_activities));
                store
            }
        };

        if let Err(err) = store.dispatch(self.form.mounted()) {
            self.store = Some(store);
            self.handle_error(err);
            return;
        }

        if let Err(err) = store.fetch_recent(Local::now()) {
            self.store = Some(store);
            self.handle_error(err);
            return;
        }

        match client.projects() {
            Ok(projects) => {
                self.projects = projects;
                if let Some(selected) = self.project_state.selected() {
                    if selected >= self.projects.len() {
                        self.project_state.select(Some(0));
                    }
                }
            }
            Err(err) => {
                self.store = Some(store);
                self.handle_error(err);
                return;
            }
        }

        self.form.sync(store.working());
        self.write_cache(&token, &store);
        self.store = Some(store);
        self.last_refresh = Some(Local::now());
        self.mode = Mode::Timer;
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        match &self.store {
            Some(store) => store.search(self.form.description()),
            None => Vec::new(),
        }
    }

    pub fn working_elapsed(&self, now: DateTime<Local>) -> Option<i64> {
        self.form
            .started_at()
            .filter(|_| self.form.is_working())
            .map(|started_at| (now - started_at).num_seconds().max(0))
    }

    fn write_cache(&self, token: &str, store: &ActivityStore) {
        let mut cache = storage::new_cache(storage::hash_token(token));
        cache.projects = Some(storage::CachedData {
            data: self.projects.clone(),
            fetched_at: storage::now_rfc3339(),
        });
        cache.activities = Some(storage::CachedData {
            data: store.recent().to_vec(),
            fetched_at: storage::now_rfc3339(),
        });
        let _ = storage::write_cache(&cache);
    }

    fn dispatch(&mut self, action: Action) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        match store.dispatch(action) {
            Ok(()) => {
                self.form.sync(store.working());
            }
            Err(ApiError::Unauthorized) => self.handle_error(ApiError::Unauthorized),
            Err(err) => {
                let message = err.to_string();
                self.status = Some(message.clone());
                self.set_toast(message, true);
            }
        }
    }

    fn handle_error(&mut self, err: ApiError) {
        match err {
            ApiError::Unauthorized => {
                self.token = None;
                self.mode = Mode::Login;
                self.status = Some("Invalid token. Please login.".to_string());
            }
            other => {
                self.mode = Mode::Error;
                self.status = Some(other.to_string());
            }
        }
    }

    fn handle_timer_input(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Char('h') | KeyCode::Esc => {
                    self.show_help = false;
                }
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if self.form.focused() {
            self.handle_description_input(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.trigger_refresh(),
            KeyCode::Char('i') | KeyCode::Char('e') => self.form.focus(),
            KeyCode::Char('p') => self.show_project_list(),
            KeyCode::Char('s') => self.enter_settings(),
            KeyCode::Char('h') => self.show_help = true,
            KeyCode::Enter => {
                let action = self.form.submit(Local::now());
                self.dispatch(action);
            }
            _ => {}
        }
    }

    fn handle_description_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if let Some(action) = self.form.blur() {
                    self.dispatch(action);
                }
            }
            KeyCode::Enter => {
                let suggestions = self.suggestions();
                let selected = self
                    .form
                    .suggestion_index()
                    .and_then(|index| suggestions.get(index));
                match selected {
                    Some(suggestion) => {
                        let action = self.form.click_suggestion(suggestion, Local::now());
                        self.dispatch(action);
                        if let Some(action) = self.form.blur() {
                            self.dispatch(action);
                        }
                    }
                    None => {
                        let action = self.form.press_enter(Local::now());
                        self.dispatch(action);
                    }
                }
            }
            KeyCode::Down => {
                let count = self.suggestions().len();
                self.form.move_suggestion(1, count);
            }
            KeyCode::Up => {
                let count = self.suggestions().len();
                self.form.move_suggestion(-1, count);
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.form.input_char(ch);
                }
            }
            _ => {}
        }
    }

    fn show_project_list(&mut self) {
        if self.project_state.selected().is_none() {
            self.project_state.select(Some(0));
        }
        self.mode = Mode::ProjectSelect;
    }

    fn handle_project_select_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.select_previous_project(),
            KeyCode::Down => self.select_next_project(),
            KeyCode::Enter => {
                let project = self
                    .project_state
                    .selected()
                    .and_then(|index| self.projects.get(index))
                    .cloned();
                self.mode = Mode::Timer;
                if let Some(action) = self.form.select_project(project) {
                    self.dispatch(action);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                self.mode = Mode::Timer;
                if let Some(action) = self.form.select_project(None) {
                    self.dispatch(action);
                }
            }
            KeyCode::Esc => {
                self.mode = Mode::Timer;
            }
            _ => {}
        }
    }

    fn handle_login_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter => {
                if !self.input.trim().is_empty() {
                    if let Err(err) = storage::write_token(self.input.trim()) {
                        self.status = Some(format!("Failed to save token: {err}"));
                        return;
                    }
                    self.token = Some(self.input.trim().to_string());
                    self.input.clear();
                    self.mode = Mode::Loading;
                    self.needs_refresh = true;
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.input.push(ch);
                }
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn enter_settings(&mut self) {
        if self.settings_state.selected().is_none() {
            self.settings_state.select(Some(0));
        }
        self.mode = Mode::Settings;
    }

    fn handle_settings_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.mode = Mode::Timer,
            KeyCode::Up => {
                let selected = self.settings_state.selected().unwrap_or(0);
                let next = if selected == 0 {
                    SETTINGS_ITEMS.len() - 1
                } else {
                    selected - 1
                };
                self.settings_state.select(Some(next));
            }
            KeyCode::Down => {
                let selected = self.settings_state.selected().unwrap_or(0);
                self.settings_state
                    .select(Some((selected + 1) % SETTINGS_ITEMS.len()));
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Left => {
                let item = self
                    .settings_state
                    .selected()
                    .and_then(|index| SETTINGS_ITEMS.get(index))
                    .copied();
                match item {
                    Some(SettingsItem::Theme) => self.cycle_theme(),
                    Some(SettingsItem::Locale) => self.cycle_locale(),
                    None => {}
                }
            }
            _ => {}
        }
    }

    fn cycle_theme(&mut self) {
        self.theme = match self.theme {
            ThemePreference::Terminal => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Terminal,
        };
        if let Err(err) = storage::write_theme(self.theme) {
            self.set_toast(format!("Failed to save theme: {err}"), true);
            return;
        }
        self.set_toast("Theme saved.", false);
    }

    fn cycle_locale(&mut self) {
        self.locale = match self.locale {
            Locale::En => Locale::Ja,
            Locale::Ja => Locale::En,
        };
        if let Err(err) = storage::write_locale(self.locale) {
            self.set_toast(format!("Failed to save locale: {err}"), true);
            return;
        }
        self.needs_refresh = true;
        self.set_toast("Locale saved.", false);
    }

    fn trigger_refresh(&mut self) {
        self.mode = Mode::Loading;
        self.needs_refresh = true;
    }

    fn select_previous_project(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        let selected = self.project_state.selected().unwrap_or(0);
        let new_index = if selected == 0 {
            self.projects.len() - 1
        } else {
            selected - 1
        };
        self.project_state.select(Some(new_index));
    }

    fn select_next_project(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        let selected = self.project_state.selected().unwrap_or(0);
        let new_index = if selected + 1 >= self.projects.len() {
            0
        } else {
            selected + 1
        };
        self.project_state.select(Some(new_index));
    }

    pub fn active_toast(&mut self) -> Option<ToastView> {
        let toast = self.toast.as_ref()?;
        if toast.created_at.elapsed() > Duration::from_secs(2) {
            self.toast = None;
            return None;
        }
        Some(ToastView {
            message: toast.message.clone(),
            is_error: toast.is_error,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            created_at: Instant::now(),
            is_error,
        });
    }
}

struct Toast {
    message: String,
    created_at: Instant,
    is_error: bool,
}

pub struct ToastView {
    pub message: String,
    pub is_error: bool,
}
