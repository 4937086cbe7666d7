use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// External link to the material; files are never stored here.
    pub link: String,
    pub batch: String,
    pub kind: MaterialKind,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Notes,
    Assignment,
    Video,
    Book,
}

impl MaterialKind {
    pub fn parse(s: &str) -> Option<MaterialKind> {
        match s {
            "notes" => Some(MaterialKind::Notes),
            "assignment" => Some(MaterialKind::Assignment),
            "video" => Some(MaterialKind::Video),
            "book" => Some(MaterialKind::Book),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Notes => "notes",
            MaterialKind::Assignment => "assignment",
            MaterialKind::Video => "video",
            MaterialKind::Book => "book",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub link: String,
    #[serde(default = "default_batch")]
    pub batch: String,
    #[serde(default)]
    pub kind: Option<MaterialKind>,
}

fn default_batch() -> String {
    "all".to_string()
}
