use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

use super::auth::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author_id: Option<u64>,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn published_by_default() -> bool {
    true
}

/// Admin-only create/update body.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct AnnouncementForm {
    #[garde(length(chars, min = 1, max = 200))]
    pub title: String,

    #[garde(length(chars, min = 1))]
    pub content: String,

    #[garde(skip)]
    pub is_pinned: bool,

    #[garde(skip)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnnouncementList {
    #[serde(default)]
    pub announcements: Vec<Announcement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnnouncementEnvelope {
    pub announcement: Announcement,
}

/// Pinned announcements first, newest first within each group.
pub fn sort_for_display(announcements: &mut [Announcement]) {
    announcements.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
