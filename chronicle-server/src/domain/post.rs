use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    /// May lie in the future: a scheduled post stays invisible to the
    /// public until this instant passes.
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) image: Option<String>,
    pub(crate) author_id: i64,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Post {
    /// Canonical detail-page URL, also the target of the silent
    /// ownership redirects.
    pub(crate) fn detail_path(&self) -> String {
        format!("/posts/{}/", self.id)
    }
}

/// Author fields carried alongside a post in listings and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostAuthor {
    pub(crate) id: i64,
    pub(crate) username: String,
}

/// Category fields joined into a post row. `is_published` is kept because
/// the visibility predicate depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostCategory {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostLocation {
    pub(crate) id: i64,
    pub(crate) name: String,
}

/// A post joined with its author, category, location and comment count —
/// the shape every listing and the detail page consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostWithRelations {
    pub(crate) post: Post,
    pub(crate) author: PostAuthor,
    pub(crate) category: Option<PostCategory>,
    pub(crate) location: Option<PostLocation>,
    pub(crate) comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
    pub(crate) image: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            pub_date: self.pub_date,
            category_id: self.category_id,
            location_id: self.location_id,
            image: normalize_image(self.image),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
    pub(crate) image: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            pub_date: self.pub_date,
            category_id: self.category_id,
            location_id: self.location_id,
            image: normalize_image(self.image),
        })
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..256 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "must not be empty",
        });
    }
    Ok(text.to_string())
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CreatePostRequest, DomainError, UpdatePostRequest};

    fn request(title: &str, text: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            text: text.to_string(),
            pub_date: Utc::now(),
            category_id: None,
            location_id: None,
            image: None,
        }
    }

    #[test]
    fn create_post_request_rejects_blank_title() {
        let err = request("   ", "body").validate().expect_err("must fail");
        assert_validation_field(err, "title");
    }

    #[test]
    fn create_post_request_rejects_blank_text() {
        let err = request("Title", "  ").validate().expect_err("must fail");
        assert_validation_field(err, "text");
    }

    #[test]
    fn create_post_request_trims_fields_and_drops_empty_image() {
        let mut req = request("  Title  ", "  body  ");
        req.image = Some("   ".to_string());

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "Title");
        assert_eq!(validated.text, "body");
        assert_eq!(validated.image, None);
    }

    #[test]
    fn update_post_request_keeps_image_path() {
        let req = UpdatePostRequest {
            title: "Title".to_string(),
            text: "body".to_string(),
            pub_date: Utc::now(),
            category_id: Some(3),
            location_id: None,
            image: Some(" posts/cover.png ".to_string()),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.image.as_deref(), Some("posts/cover.png"));
        assert_eq!(validated.category_id, Some(3));
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
