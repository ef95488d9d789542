use chrono::{DateTime, Duration, Local};

use crate::api::{ApiClient, ApiError};
use crate::models::{Activity, ActivityParams, Suggestion};

pub const SUGGESTION_LIMIT: usize = 7;
const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchWorking,
    Add(ActivityParams),
    Update(ActivityParams),
}

pub struct ActivityStore {
    client: ApiClient,
    working: Vec<Activity>,
    recent: Vec<Activity>,
}

impl ActivityStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            working: Vec::new(),
            recent: Vec::new(),
        }
    }

    pub fn set_client(&mut self, client: ApiClient) {
        self.client = client;
    }

    /// Warm start from the cache file; replaced by the next fetch.
    pub fn seed_recent(&mut self, activities: Vec<Activity>) {
        self.recent = activities;
        sort_recent(&mut self.recent);
    }

    pub fn working(&self) -> Option<&Activity> {
        self.working.first()
    }

    pub fn recent(&self) -> &[Activity] {
        &self.recent
    }

    pub fn search(&self, text: &str) -> Vec<Suggestion> {
        search_suggestions(&self.recent, text, SUGGESTION_LIMIT)
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), ApiError> {
        match action {
            Action::FetchWorking => self.fetch_working(),
            Action::Add(params) => self.add(params).map(drop),
            Action::Update(params) => self.update(params).map(drop),
        }
    }

    pub fn fetch_recent(&mut self, now: DateTime<Local>) -> Result<(), ApiError> {
        let start = now - Duration::days(RECENT_WINDOW_DAYS);
        self.recent = self.client.activities(start, now)?;
        sort_recent(&mut self.recent);
        Ok(())
    }

    fn fetch_working(&mut self) -> Result<(), ApiError> {
        self.working = self.client.working_activities()?;
        Ok(())
    }

    fn add(&mut self, params: ActivityParams) -> Result<Activity, ApiError> {
        let activity = self.client.add_activity(&params)?;
        if activity.is_working() {
            self.working.insert(0, activity.clone());
        }
        self.recent.insert(0, activity.clone());
        Ok(activity)
    }

    fn update(&mut self, params: ActivityParams) -> Result<Activity, ApiError> {
        let activity = self.client.update_activity(&params)?;
        self.working.retain(|existing| existing.id != activity.id);
        if activity.is_working() {
            self.working.insert(0, activity.clone());
        }
        if let Some(existing) = self
            .recent
            .iter_mut()
            .find(|existing| existing.id == activity.id)
        {
            *existing = activity.clone();
        } else {
            self.recent.insert(0, activity.clone());
        }
        Ok(activity)
    }
}

fn sort_recent(activities: &mut [Activity]) {
    activities.sort_by(|a, b| b.started_at.cmp(&a.started_at));
}

// Case-insensitive prefix filter, deduplicated by project and
// description. Expects `activities` newest first.
pub fn search_suggestions(activities: &[Activity], text: &str, limit: usize) -> Vec<Suggestion> {
    let query = text.trim().to_lowercase();
    let mut seen: Vec<(Option<u64>, &str)> = Vec::new();
    let mut suggestions = Vec::new();

    for activity in activities {
        if activity.description.is_empty() {
            continue;
        }
        if !query.is_empty() && !activity.description.to_lowercase().starts_with(&query) {
            continue;
        }
        let key = (activity.project_id, activity.description.as_str());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        suggestions.push(Suggestion {
            description: activity.description.clone(),
            project: activity.project.clone(),
        });
        if suggestions.len() == limit {
            break;
        }
    }

    suggestions
}
