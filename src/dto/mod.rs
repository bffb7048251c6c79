use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmitNoteRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Error,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Status {
    pub text: String,
    pub tone: Tone,
}

impl Status {
    pub fn success(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tone: Tone::Success,
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tone: Tone::Error,
        }
    }

    pub fn live(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tone: Tone::Live,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteCard {
    pub name: String,
    pub message: String,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoteList {
    Empty { invitation: String },
    Notes { items: Vec<NoteCard> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RenderedBoard {
    pub count: usize,
    pub list: NoteList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BoardSnapshot {
    pub holiday: String,
    pub countdown: String,
    pub status: Option<Status>,
    pub board: RenderedBoard,
}
