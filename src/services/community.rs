use garde::Validate;
use reqwest::multipart::Form;
use std::collections::HashSet;

use crate::models::community::{
    Comment, CommentForm, LikeResponse, Post, PostForm, PostPage, PostQuery, DEFAULT_PAGE_LIMIT,
    MAX_POST_IMAGES,
};
use crate::services::client::{Ack, ApiClient, ApiError};
use crate::services::validation::{
    check_image_count, encode_image_urls, ImageUpload, SubmitError,
};

/// Client for the community board.
#[derive(Debug, Clone)]
pub struct CommunityApi {
    client: ApiClient,
}

impl CommunityApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn posts(&self, query: &PostQuery) -> Result<PostPage, ApiError> {
        self.client
            .get_with_query("/community/posts", &query.to_params())
            .await
    }

    pub async fn post(&self, post_id: u64) -> Result<Post, ApiError> {
        self.client
            .get(&format!("/community/posts/{}", post_id))
            .await
    }

    pub async fn create_post(
        &self,
        form: &PostForm,
        images: &[ImageUpload],
    ) -> Result<Post, SubmitError> {
        form.validate()?;
        check_image_count(images.len(), MAX_POST_IMAGES)?;

        let multipart = post_fields(form, images)?;
        tracing::info!(title = %form.title, post_type = %form.post_type, images = images.len(), "Creating post");

        Ok(self.client.post_multipart("/community/posts", multipart).await?)
    }

    /// Replace a post. `existing_images` lists the URLs to keep.
    pub async fn update_post(
        &self,
        post_id: u64,
        form: &PostForm,
        new_images: &[ImageUpload],
        existing_images: &[String],
    ) -> Result<Post, SubmitError> {
        form.validate()?;
        check_image_count(new_images.len() + existing_images.len(), MAX_POST_IMAGES)?;

        let mut multipart = post_fields(form, new_images)?;
        if !existing_images.is_empty() {
            multipart = multipart.text("existing_images", encode_image_urls(existing_images)?);
        }
        tracing::info!(
            post_id,
            existing = existing_images.len(),
            new = new_images.len(),
            "Updating post"
        );

        Ok(self
            .client
            .put_multipart(&format!("/community/posts/{}", post_id), multipart)
            .await?)
    }

    pub async fn delete_post(&self, post_id: u64) -> Result<Ack, ApiError> {
        self.client
            .delete(&format!("/community/posts/{}", post_id))
            .await
    }

    /// Like, or unlike if already liked.
    pub async fn toggle_like(&self, post_id: u64) -> Result<LikeResponse, ApiError> {
        self.client
            .post_empty(&format!("/community/posts/{}/like", post_id))
            .await
    }

    /// Comment on a post, or reply when `parent_id` is set.
    pub async fn create_comment(
        &self,
        post_id: u64,
        comment: &CommentForm,
    ) -> Result<Comment, SubmitError> {
        comment.validate()?;
        Ok(self
            .client
            .post(&format!("/community/posts/{}/comments", post_id), comment)
            .await?)
    }

    pub async fn update_comment(
        &self,
        post_id: u64,
        comment_id: u64,
        content: &str,
    ) -> Result<Comment, SubmitError> {
        let body = CommentForm {
            content: content.to_string(),
            parent_id: None,
        };
        body.validate()?;
        Ok(self
            .client
            .put(
                &format!("/community/posts/{}/comments/{}", post_id, comment_id),
                &body,
            )
            .await?)
    }

    pub async fn delete_comment(&self, post_id: u64, comment_id: u64) -> Result<Ack, ApiError> {
        self.client
            .delete(&format!("/community/posts/{}/comments/{}", post_id, comment_id))
            .await
    }
}

fn post_fields(form: &PostForm, images: &[ImageUpload]) -> Result<Form, ApiError> {
    let mut multipart = Form::new()
        .text("title", form.title.clone())
        .text("content", form.content.clone())
        .text("post_type", form.post_type.to_string());
    for image in images {
        multipart = multipart.part("images", image.to_part()?);
    }
    Ok(multipart)
}

/// Infinite-scroll cursor over the community feed.
///
/// Each [`load_more`](PostPager::load_more) fetches the next page and appends
/// posts not already seen. A new search or category starts over with
/// [`reset`](PostPager::reset).
#[derive(Debug)]
pub struct PostPager {
    api: CommunityApi,
    query: PostQuery,
    next_page: u32,
    has_more: bool,
    posts: Vec<Post>,
    seen: HashSet<u64>,
}

impl PostPager {
    pub fn new(api: CommunityApi, query: PostQuery) -> Self {
        let mut pager = Self {
            api,
            query: PostQuery::default(),
            next_page: 1,
            has_more: true,
            posts: Vec::new(),
            seen: HashSet::new(),
        };
        pager.reset(query);
        pager
    }

    pub fn reset(&mut self, query: PostQuery) {
        self.next_page = query.page.unwrap_or(1).max(1);
        self.query = PostQuery {
            limit: Some(query.limit.unwrap_or(DEFAULT_PAGE_LIMIT)),
            ..query
        };
        self.has_more = true;
        self.posts.clear();
        self.seen.clear();
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn query(&self) -> &PostQuery {
        &self.query
    }

    /// Fetch the next page. Returns how many posts were appended; once the
    /// feed is exhausted this returns 0 without a request.
    pub async fn load_more(&mut self) -> Result<usize, ApiError> {
        if !self.has_more {
            return Ok(0);
        }

        let query = PostQuery {
            page: Some(self.next_page),
            ..self.query.clone()
        };
        let page = self.api.posts(&query).await?;

        let before = self.posts.len();
        let received = page.posts.len();
        for post in page.posts {
            if self.seen.insert(post.id) {
                self.posts.push(post);
            }
        }

        // An empty page ends the feed even if the server claims otherwise.
        self.has_more = page.has_more && received > 0;
        self.next_page += 1;

        let added = self.posts.len() - before;
        tracing::debug!(
            page = query.page,
            received,
            added,
            has_more = self.has_more,
            "Loaded community page"
        );
        Ok(added)
    }

    /// Keep loading until the feed is exhausted or `max_pages` were fetched.
    pub async fn load_pages(&mut self, max_pages: u32) -> Result<usize, ApiError> {
        let mut total = 0;
        for _ in 0..max_pages {
            if !self.has_more {
                break;
            }
            total += self.load_more().await?;
        }
        Ok(total)
    }
}
