use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

/// Comment joined with its author's username for rendering under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentWithAuthor {
    pub(crate) comment: Comment,
    pub(crate) author_username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentRequest {
    pub(crate) text: String,
}

impl CommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation {
                field: "text",
                message: "must not be empty",
            });
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentRequest, DomainError};

    #[test]
    fn comment_request_rejects_blank_text() {
        let req = CommentRequest {
            text: "   ".to_string(),
        };
        let err = req.validate().expect_err("must fail");
        assert!(matches!(err, DomainError::Validation { field: "text", .. }));
    }

    #[test]
    fn comment_request_trims_text() {
        let req = CommentRequest {
            text: "  nice post  ".to_string(),
        };
        let validated = req.validate().expect("must validate");
        assert_eq!(validated.text, "nice post");
    }
}
