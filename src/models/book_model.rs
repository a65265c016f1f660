use serde::{Deserialize, Serialize};
use crate::models::patch::Patch;

/// Canonical server representation of a book. The client only ever holds
/// a transient cached copy; books are created and destroyed on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Cover image payload attached to a create request.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Create payload. Sent as multipart form data so the cover image can ride
/// along; optional fields are omitted from the form when None.
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub name: String,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub pages: Option<u32>,
    pub year: Option<i32>,
    pub image: Option<CoverImage>,
}

impl NewBook {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial-update payload. Absent fields leave the server value unchanged,
/// explicit nulls clear it (see `Patch`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub genre: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub author: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<String>,
}

impl BookUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.genre.is_absent()
            && self.author.is_absent()
            && self.status.is_absent()
    }
}

/// One member of the server-enumerated status set. The set of valid
/// statuses is data fetched from the server, not a compile-time constant,
/// so nothing here assumes a complete local mirror.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookStatus {
    pub label: String,
    pub value: String,
}
