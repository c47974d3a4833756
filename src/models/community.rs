use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::auth::User;

/// Images the backend accepts per post, existing and new combined.
pub const MAX_POST_IMAGES: usize = 5;

/// Page size used by the community feed.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostType {
    #[default]
    General,
    Question,
    Tip,
    Share,
    Trade,
}

impl PostType {
    pub fn label(self) -> &'static str {
        match self {
            PostType::General => "일반",
            PostType::Question => "질문",
            PostType::Tip => "꿀팁",
            PostType::Share => "자랑",
            PostType::Trade => "나눔",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub user: Option<User>,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub replies: Vec<Comment>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub user: Option<User>,
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "super::image_list")]
    pub images: Vec<String>,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default)]
    pub likes_count: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub is_liked_by_user: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of `GET /community/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub has_more: bool,
}

/// Feed query. A `None` post type means every category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    pub post_type: Option<PostType>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PostQuery {
    /// Query-string pairs, skipping unset and empty values.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(post_type) = self.post_type {
            params.push(("type", post_type.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Text portion of a new or edited post.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PostForm {
    #[garde(length(chars, min = 1, max = 200))]
    pub title: String,

    #[garde(length(chars, min = 1))]
    pub content: String,

    #[garde(skip)]
    pub post_type: PostType,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CommentForm {
    #[garde(length(chars, min = 1, max = 1000))]
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
    #[serde(default)]
    pub message: Option<String>,
}
