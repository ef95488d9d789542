use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: u64,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub description: String,
    pub started_at: DateTime<Local>,
    #[serde(default)]
    pub stopped_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub project: Option<Project>,
}

impl Activity {
    pub fn is_working(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn duration_seconds(&self, now: DateTime<Local>) -> i64 {
        let end = self.stopped_at.unwrap_or(now);
        (end - self.started_at).num_seconds().max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub description: String,
    #[serde(default)]
    pub project: Option<Project>,
}

/// Partial activity payload. Only fields that changed are present; a
/// present `project_id` of `None` clears the project on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Local>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, 3, hour, minute, 0).unwrap()
    }

    #[test]
    fn activity_without_stop_is_working() {
        let activity = Activity {
            id: 1,
            project_id: None,
            description: "Review my tasks".to_string(),
            started_at: local(9, 0),
            stopped_at: None,
            project: None,
        };
        assert!(activity.is_working());
        assert_eq!(activity.duration_seconds(local(9, 30)), 1800);
    }

    #[test]
    fn stopped_activity_uses_stop_time() {
        let activity = Activity {
            id: 1,
            project_id: Some(2),
            description: "Review my tasks".to_string(),
            started_at: local(9, 0),
            stopped_at: Some(local(10, 0)),
            project: None,
        };
        assert!(!activity.is_working());
        assert_eq!(activity.duration_seconds(local(12, 0)), 3600);
    }

    #[test]
    fn params_skip_absent_fields() {
        let params = ActivityParams {
            id: Some(1),
            stopped_at: Some(local(10, 0)),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("id"));
        assert!(object.contains_key("stoppedAt"));
    }

    #[test]
    fn params_present_null_project_serializes_as_null() {
        let params = ActivityParams {
            id: Some(1),
            project_id: Some(None),
            description: Some("".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert!(value["projectId"].is_null());
        assert_eq!(value["description"], "");
    }

    #[test]
    fn activity_deserializes_from_camel_case() {
        let value = serde_json::json!({
            "id": 3,
            "projectId": 2,
            "description": "Review my tasks",
            "startedAt": "2026-02-03T09:00:00+00:00",
            "stoppedAt": null,
            "project": { "id": 2, "name": "Review", "color": "#ff0" }
        });
        let activity: Activity = serde_json::from_value(value).unwrap();
        assert_eq!(activity.project_id, Some(2));
        assert!(activity.is_working());
        assert_eq!(activity.project.unwrap().name, "Review");
    }
}
