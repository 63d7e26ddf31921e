use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Anything that can live in a paginated list. Identity is by id only; the
/// controllers use this key for de-duplication across pages.
pub trait Identified {
    fn item_id(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    /// `start` is only legal from `pending`.
    pub fn can_start(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }

    /// `finish` is only legal from `in-progress`.
    pub fn can_finish(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }

    /// Badge colours for this status, shared by every call site.
    pub fn style(&self) -> StatusStyle {
        match self {
            TaskStatus::Pending => StatusStyle {
                badge: "#EF4444",
                border: "#DC2626",
                text: "#FFFFFF",
            },
            TaskStatus::InProgress => StatusStyle {
                badge: "#F59E0B",
                border: "#D97706",
                text: "#FFFFFF",
            },
            TaskStatus::Done => StatusStyle {
                badge: "#10B981",
                border: "#059669",
                text: "#FFFFFF",
            },
        }
    }
}

/// Presentation colours derived from a task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub badge: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

impl Identified for Client {
    fn item_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

impl Identified for Product {
    fn item_id(&self) -> i64 {
        self.id
    }
}

/// The client record nested on a task detail. Every field the UI renders is
/// optional; a task without client data still renders, just without the
/// client section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city_name: Option<String>,
    pub image_name: Option<String>,
}

impl ClientSummary {
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => "Unknown".to_string(),
        }
    }

    pub fn initials(&self) -> String {
        let mut out: String = [self.first_name.as_deref(), self.last_name.as_deref()]
            .iter()
            .flatten()
            .filter_map(|name| name.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect();
        if out.is_empty() {
            out.push('?');
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "task_name")]
    pub name: String,
    pub task_type: Option<String>,
    pub description: Option<String>,
    pub observation: Option<String>,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "truthy")]
    pub urgent: bool,
    pub task_date: Option<NaiveDate>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub client: Option<ClientSummary>,
}

impl Identified for Task {
    fn item_id(&self) -> i64 {
        self.id
    }
}

/// The backend is not consistent about booleans: `urgent` arrives as
/// `true`, `1`, `"1"` or `"true"` depending on the endpoint.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64() == Some(1),
        serde_json::Value::String(s) => s == "1" || s == "true",
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_lifecycle() {
        assert!(TaskStatus::Pending.can_start());
        assert!(!TaskStatus::Pending.can_finish());
        assert!(!TaskStatus::InProgress.can_start());
        assert!(TaskStatus::InProgress.can_finish());
        assert!(!TaskStatus::Done.can_start());
        assert!(!TaskStatus::Done.can_finish());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, TaskStatus::Pending);
        assert_eq!(TaskStatus::Done.to_string(), "done");
    }

    #[test]
    fn every_status_has_a_style() {
        assert_eq!(TaskStatus::Pending.style().badge, "#EF4444");
        assert_eq!(TaskStatus::InProgress.style().badge, "#F59E0B");
        assert_eq!(TaskStatus::Done.style().badge, "#10B981");
    }

    #[test]
    fn urgent_accepts_backend_variants() {
        for raw in [json!(true), json!(1), json!("1"), json!("true")] {
            let task: Task = serde_json::from_value(json!({
                "id": 1,
                "task_name": "Repair compressor",
                "status": "pending",
                "urgent": raw,
            }))
            .unwrap();
            assert!(task.urgent, "expected urgent for {:?}", task);
        }

        let task: Task = serde_json::from_value(json!({
            "id": 2,
            "task_name": "Install chair",
            "status": "pending",
            "urgent": 0,
        }))
        .unwrap();
        assert!(!task.urgent);

        // Missing entirely defaults to false.
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "task_name": "Calibrate scanner",
            "status": "done",
        }))
        .unwrap();
        assert!(!task.urgent);
    }

    #[test]
    fn client_summary_name_helpers() {
        let full = ClientSummary {
            id: 1,
            first_name: Some("Marie".into()),
            last_name: Some("Dubois".into()),
            phone_number: None,
            address: None,
            city_name: None,
            image_name: None,
        };
        assert_eq!(full.full_name(), "Marie Dubois");
        assert_eq!(full.initials(), "MD");

        let empty = ClientSummary {
            id: 2,
            first_name: None,
            last_name: None,
            phone_number: None,
            address: None,
            city_name: None,
            image_name: None,
        };
        assert_eq!(empty.full_name(), "Unknown");
        assert_eq!(empty.initials(), "?");
    }
}
