use chrono::{DateTime, Local};

use crate::models::{Activity, ActivityParams, Project, Suggestion};
use crate::store::Action;

/// Timer form state. Methods map UI events to the store action to
/// dispatch; network effects live in the store.
#[derive(Debug, Default)]
pub struct TimerForm {
    id: Option<u64>,
    project: Option<Project>,
    description: String,
    started_at: Option<DateTime<Local>>,
    focused: bool,
    suggestions_open: bool,
    suggestion_clicked: bool,
    suggestion_index: Option<usize>,
    synced_description: String,
    synced_project_id: Option<u64>,
}

impl TimerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounted(&self) -> Action {
        Action::FetchWorking
    }

    pub fn sync(&mut self, working: Option<&Activity>) {
        match working {
            Some(activity) => {
                self.id = Some(activity.id);
                self.description = activity.description.clone();
                self.started_at = Some(activity.started_at);
                self.project = activity.project.clone();
                self.mark_synced();
            }
            None => {
                self.id = None;
                self.started_at = None;
            }
        }
    }

    pub fn is_working(&self) -> bool {
        self.id.is_some()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn suggestions_open(&self) -> bool {
        self.suggestions_open
    }

    pub fn suggestion_index(&self) -> Option<usize> {
        self.suggestion_index
    }

    pub fn input_char(&mut self, ch: char) {
        self.description.push(ch);
        self.suggestion_index = None;
    }

    pub fn backspace(&mut self) {
        self.description.pop();
        self.suggestion_index = None;
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.suggestions_open = true;
        self.suggestion_clicked = false;
        self.suggestion_index = None;
    }

    // A blur that lands right after a suggestion click must not push an
    // update on top of the add the click already dispatched.
    pub fn blur(&mut self) -> Option<Action> {
        self.focused = false;
        self.suggestions_open = false;
        self.suggestion_index = None;
        if self.suggestion_clicked {
            self.suggestion_clicked = false;
            return None;
        }
        let id = self.id?;
        if !self.changed_since_sync() {
            return None;
        }
        self.mark_synced();
        Some(Action::Update(self.description_params(id)))
    }

    pub fn press_enter(&mut self, now: DateTime<Local>) -> Action {
        match self.id {
            Some(id) => {
                self.mark_synced();
                Action::Update(self.description_params(id))
            }
            None => self.start(now),
        }
    }

    /// The start/stop toggle.
    pub fn submit(&mut self, now: DateTime<Local>) -> Action {
        match self.id.take() {
            Some(id) => {
                self.started_at = None;
                self.description.clear();
                self.mark_synced();
                Action::Update(ActivityParams {
                    id: Some(id),
                    stopped_at: Some(now),
                    ..Default::default()
                })
            }
            None => self.start(now),
        }
    }

    /// Picker-close event: pushed immediately while a timer runs, held
    /// pending while idle.
    pub fn select_project(&mut self, project: Option<Project>) -> Option<Action> {
        self.project = project;
        let id = self.id?;
        self.mark_synced();
        Some(Action::Update(self.description_params(id)))
    }

    pub fn click_suggestion(&mut self, suggestion: &Suggestion, now: DateTime<Local>) -> Action {
        self.description = suggestion.description.clone();
        self.project = suggestion.project.clone();
        self.suggestion_clicked = true;
        self.suggestions_open = false;
        self.suggestion_index = None;
        self.mark_synced();
        self.start(now)
    }

    pub fn move_suggestion(&mut self, delta: i64, count: usize) {
        if count == 0 {
            self.suggestion_index = None;
            return;
        }
        let next = match self.suggestion_index {
            None => {
                if delta >= 0 {
                    0
                } else {
                    count - 1
                }
            }
            Some(index) => {
                let count = count as i64;
                ((index as i64 + delta).rem_euclid(count)) as usize
            }
        };
        self.suggestion_index = Some(next);
    }

    fn start(&mut self, now: DateTime<Local>) -> Action {
        self.started_at = Some(now);
        self.suggestions_open = false;
        self.mark_synced();
        Action::Add(ActivityParams {
            project_id: Some(self.project.as_ref().map(|project| project.id)),
            description: Some(self.description.clone()),
            started_at: Some(now),
            ..Default::default()
        })
    }

    fn description_params(&self, id: u64) -> ActivityParams {
        ActivityParams {
            id: Some(id),
            project_id: Some(self.project.as_ref().map(|project| project.id)),
            description: Some(self.description.clone()),
            ..Default::default()
        }
    }

    fn changed_since_sync(&self) -> bool {
        self.description != self.synced_description
            || self.project.as_ref().map(|project| project.id) != self.synced_project_id
    }

    fn mark_synced(&mut self) {
        self.synced_description = self.description.clone();
        self.synced_project_id = self.project.as_ref().map(|project| project.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, 3, 10, 30, 0).unwrap()
    }

    fn review_project() -> Project {
        Project {
            id: 2,
            name: "Review".to_string(),
            color: "#ff0".to_string(),
        }
    }

    fn working_activity() -> Activity {
        Activity {
            id: 1,
            project_id: None,
            description: "Review my tasks".to_string(),
            started_at: Local.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap(),
            stopped_at: None,
            project: None,
        }
    }

    fn type_text(form: &mut TimerForm, text: &str) {
        for ch in text.chars() {
            form.input_char(ch);
        }
    }

    #[test]
    fn mounted_requests_working_activities() {
        assert_eq!(TimerForm::new().mounted(), Action::FetchWorking);
    }

    #[test]
    fn submit_while_idle_dispatches_add_with_current_timestamp() {
        let mut form = TimerForm::new();
        form.select_project(Some(review_project()));
        type_text(&mut form, "Review my tasks");

        let action = form.submit(now());
        assert_eq!(
            action,
            Action::Add(ActivityParams {
                project_id: Some(Some(2)),
                description: Some("Review my tasks".to_string()),
                started_at: Some(now()),
                ..Default::default()
            })
        );
        assert_eq!(form.started_at(), Some(now()));
    }

    #[test]
    fn submit_while_working_dispatches_update_with_stop_timestamp() {
        let mut form = TimerForm::new();
        form.sync(Some(&working_activity()));

        let action = form.submit(now());
        assert_eq!(
            action,
            Action::Update(ActivityParams {
                id: Some(1),
                stopped_at: Some(now()),
                ..Default::default()
            })
        );
        assert!(!form.is_working());
    }

    #[test]
    fn enter_while_working_dispatches_description_update() {
        let mut form = TimerForm::new();
        form.sync(Some(&working_activity()));
        form.select_project(Some(review_project()));
        form.focus();
        type_text(&mut form, " again");

        let action = form.press_enter(now());
        assert_eq!(
            action,
            Action::Update(ActivityParams {
                id: Some(1),
                project_id: Some(Some(2)),
                description: Some("Review my tasks again".to_string()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn enter_while_idle_dispatches_add() {
        let mut form = TimerForm::new();
        form.select_project(Some(review_project()));
        form.focus();
        type_text(&mut form, "Review my tasks");

        let action = form.press_enter(now());
        assert!(matches!(action, Action::Add(_)));
    }

    #[test]
    fn selecting_project_while_working_dispatches_update_immediately() {
        let mut form = TimerForm::new();
        form.sync(Some(&working_activity()));

        let action = form.select_project(Some(review_project()));
        assert_eq!(
            action,
            Some(Action::Update(ActivityParams {
                id: Some(1),
                project_id: Some(Some(2)),
                description: Some("Review my tasks".to_string()),
                ..Default::default()
            }))
        );
    }

    #[test]
    fn selecting_project_while_idle_holds_it_pending() {
        let mut form = TimerForm::new();
        assert_eq!(form.select_project(Some(review_project())), None);

        let action = form.submit(now());
        match action {
            Action::Add(params) => assert_eq!(params.project_id, Some(Some(2))),
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn focus_shows_and_blur_hides_suggestions_without_dispatch() {
        let mut form = TimerForm::new();
        form.focus();
        assert!(form.suggestions_open());

        let action = form.blur();
        assert_eq!(action, None);
        assert!(!form.suggestions_open());
    }

    #[test]
    fn blur_while_working_after_edit_dispatches_update() {
        let mut form = TimerForm::new();
        form.sync(Some(&working_activity()));
        form.focus();
        type_text(&mut form, "!");

        let action = form.blur();
        assert_eq!(
            action,
            Some(Action::Update(ActivityParams {
                id: Some(1),
                project_id: Some(None),
                description: Some("Review my tasks!".to_string()),
                ..Default::default()
            }))
        );
    }

    #[test]
    fn blur_while_working_without_change_dispatches_nothing() {
        let mut form = TimerForm::new();
        form.sync(Some(&working_activity()));
        form.focus();
        assert_eq!(form.blur(), None);
    }

    #[test]
    fn clicking_suggestion_dispatches_add_with_its_fields() {
        let mut form = TimerForm::new();
        form.focus();

        let suggestion = Suggestion {
            description: "Review my tasks".to_string(),
            project: Some(review_project()),
        };
        let action = form.click_suggestion(&suggestion, now());
        assert_eq!(
            action,
            Action::Add(ActivityParams {
                project_id: Some(Some(2)),
                description: Some("Review my tasks".to_string()),
                started_at: Some(now()),
                ..Default::default()
            })
        );
        assert!(!form.suggestions_open());
    }

    #[test]
    fn blur_right_after_suggestion_click_dispatches_nothing() {
        let mut form = TimerForm::new();
        form.focus();
        let suggestion = Suggestion {
            description: "Review my tasks".to_string(),
            project: Some(review_project()),
        };
        form.click_suggestion(&suggestion, now());

        assert_eq!(form.blur(), None);
    }

    #[test]
    fn suggestion_navigation_wraps() {
        let mut form = TimerForm::new();
        form.focus();
        form.move_suggestion(1, 3);
        assert_eq!(form.suggestion_index(), Some(0));
        form.move_suggestion(-1, 3);
        assert_eq!(form.suggestion_index(), Some(2));
        form.move_suggestion(1, 3);
        assert_eq!(form.suggestion_index(), Some(0));
        form.move_suggestion(1, 0);
        assert_eq!(form.suggestion_index(), None);
    }

    #[test]
    fn typing_resets_suggestion_selection() {
        let mut form = TimerForm::new();
        form.focus();
        form.move_suggestion(1, 3);
        form.input_char('x');
        assert_eq!(form.suggestion_index(), None);
    }

    #[test]
    fn stopping_resets_description_for_the_next_timer() {
        let mut form = TimerForm::new();
        form.sync(Some(&working_activity()));
        form.submit(now());
        assert_eq!(form.description(), "");
        assert_eq!(form.started_at(), None);
    }
}
