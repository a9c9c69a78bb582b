//! Blog post entity and its validated fields.
//!
//! Posts reference their author by [`UserId`] only; related records are
//! loaded by id through the repository ports, never via object cycles.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::user::UserId;

/// Stable post identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Mint a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID read back from the database.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its path-segment string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for post form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// Title was empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded the stored column width.
    #[error("title must be at most 250 characters")]
    TitleTooLong,
    /// Subtitle was empty after trimming.
    #[error("subtitle must not be empty")]
    EmptySubtitle,
    /// Subtitle exceeded the stored column width.
    #[error("subtitle must be at most 250 characters")]
    SubtitleTooLong,
    /// Body was empty after trimming.
    #[error("body must not be empty")]
    EmptyBody,
    /// Image reference was empty after trimming.
    #[error("image URL must not be empty")]
    EmptyImageUrl,
    /// Image reference exceeded the stored column width.
    #[error("image URL must be at most 250 characters")]
    ImageUrlTooLong,
}

/// A validated post title, unique across posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

impl PostTitle {
    const MAX_LEN: usize = 250;

    /// Validate a raw title.
    pub fn new(raw: &str) -> Result<Self, PostValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(PostValidationError::TitleTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// The author-editable fields of a post, validated as a unit.
///
/// Shared by the new-post and edit-post flows so both validate identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// Unique headline.
    pub title: PostTitle,
    /// Secondary headline shown under the title.
    pub subtitle: String,
    /// Full post body (rendered as-is by the page renderer).
    pub body: String,
    /// Header image reference.
    pub image_url: String,
}

impl PostDraft {
    /// Validate the raw form fields into a draft.
    pub fn new(
        title: &str,
        subtitle: &str,
        body: &str,
        image_url: &str,
    ) -> Result<Self, PostValidationError> {
        let title = PostTitle::new(title)?;
        let subtitle = subtitle.trim();
        if subtitle.is_empty() {
            return Err(PostValidationError::EmptySubtitle);
        }
        if subtitle.len() > 250 {
            return Err(PostValidationError::SubtitleTooLong);
        }
        let body = body.trim();
        if body.is_empty() {
            return Err(PostValidationError::EmptyBody);
        }
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(PostValidationError::EmptyImageUrl);
        }
        if image_url.len() > 250 {
            return Err(PostValidationError::ImageUrlTooLong);
        }
        Ok(Self {
            title,
            subtitle: subtitle.to_owned(),
            body: body.to_owned(),
            image_url: image_url.to_owned(),
        })
    }
}

/// A published blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    title: PostTitle,
    subtitle: String,
    body: String,
    image_url: String,
    published_on: String,
    author_id: UserId,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Assemble a post record from its parts.
    #[expect(clippy::too_many_arguments, reason = "flat row constructor")]
    pub fn new(
        id: PostId,
        title: PostTitle,
        subtitle: String,
        body: String,
        image_url: String,
        published_on: String,
        author_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            subtitle,
            body,
            image_url,
            published_on,
            author_id,
            created_at,
        }
    }

    /// Publish a draft as a new post authored by `author_id`.
    ///
    /// `published_on` is the human-facing date string shown on the page
    /// (e.g. "August 7, 2026"); `now` drives both it and the record
    /// timestamp so the two can never disagree.
    pub fn publish(draft: PostDraft, author_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: PostId::new_random(),
            title: draft.title,
            subtitle: draft.subtitle,
            body: draft.body,
            image_url: draft.image_url,
            published_on: now.format("%B %-d, %Y").to_string(),
            author_id,
            created_at: now,
        }
    }

    /// Apply an edit: the draft replaces the editable fields and authorship
    /// is reassigned to the editor, keeping the original publication date.
    pub fn edited(self, draft: PostDraft, editor: UserId) -> Self {
        Self {
            title: draft.title,
            subtitle: draft.subtitle,
            body: draft.body,
            image_url: draft.image_url,
            author_id: editor,
            ..self
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Unique headline.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Secondary headline.
    pub fn subtitle(&self) -> &str {
        self.subtitle.as_str()
    }

    /// Full body text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Header image reference.
    pub fn image_url(&self) -> &str {
        self.image_url.as_str()
    }

    /// Human-facing publication date string.
    pub fn published_on(&self) -> &str {
        self.published_on.as_str()
    }

    /// Current author (reassigned on edit).
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn draft(title: &str) -> PostDraft {
        PostDraft::new(title, "sub", "body", "https://img.example/cover.png")
            .expect("valid draft fields")
    }

    #[rstest]
    #[case("", "s", "b", "i", PostValidationError::EmptyTitle)]
    #[case("t", " ", "b", "i", PostValidationError::EmptySubtitle)]
    #[case("t", "s", "", "i", PostValidationError::EmptyBody)]
    #[case("t", "s", "b", "", PostValidationError::EmptyImageUrl)]
    fn draft_rejects_blank_fields(
        #[case] title: &str,
        #[case] subtitle: &str,
        #[case] body: &str,
        #[case] image_url: &str,
        #[case] expected: PostValidationError,
    ) {
        assert_eq!(PostDraft::new(title, subtitle, body, image_url), Err(expected));
    }

    #[test]
    fn publish_formats_the_display_date() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).single().expect("valid time");
        let post = Post::publish(draft("Hello"), UserId::new_random(), now);
        assert_eq!(post.published_on(), "August 7, 2026");
        assert_eq!(post.created_at(), now);
    }

    #[test]
    fn edit_reassigns_authorship_and_keeps_the_date() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).single().expect("valid time");
        let original_author = UserId::new_random();
        let editor = UserId::new_random();
        let post = Post::publish(draft("Hello"), original_author, now);
        let id = post.id();
        let published_on = post.published_on().to_owned();

        let edited = post.edited(draft("Hello again"), editor);

        assert_eq!(edited.id(), id);
        assert_eq!(edited.author_id(), editor);
        assert_eq!(edited.title().as_ref(), "Hello again");
        assert_eq!(edited.published_on(), published_on);
    }
}
