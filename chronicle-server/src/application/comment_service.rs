use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentRequest, CommentWithAuthor};
use crate::domain::error::DomainError;

pub(crate) struct CommentService<M, P>
where
    M: CommentRepository,
    P: PostRepository,
{
    comments: M,
    posts: P,
}

impl<M, P> CommentService<M, P>
where
    M: CommentRepository,
    P: PostRepository,
{
    pub(crate) fn new(comments: M, posts: P) -> Self {
        Self { comments, posts }
    }

    pub(crate) async fn comments_for_post(
        &self,
        post_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, DomainError> {
        self.comments.list_for_post(post_id).await
    }

    pub(crate) async fn add_comment(
        &self,
        author_id: i64,
        post_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        let req = req.validate()?;

        let new_comment = NewComment {
            text: req.text,
            post_id,
            author_id,
        };
        self.comments.create_comment(new_comment).await
    }

    /// Edit access: a missing comment, a comment under another post and a
    /// comment someone else wrote are all reported as not-found.
    pub(crate) async fn comment_for_edit(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, DomainError> {
        let comment = self.comment_under_post(post_id, comment_id).await?;
        if comment.author_id != actor_user_id {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        Ok(comment)
    }

    pub(crate) async fn update_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        // Access is resolved before the form, so a foreign comment stays
        // a not-found whatever the payload looks like.
        self.comment_for_edit(actor_user_id, post_id, comment_id)
            .await?;
        let req = req.validate()?;

        self.comments
            .update_comment_owned(comment_id, actor_user_id, req.text)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))
    }

    /// Delete access differs from edit: a foreign comment answers
    /// `Forbidden` so the handler redirects instead of failing.
    pub(crate) async fn comment_for_delete(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, DomainError> {
        let comment = self.comment_under_post(post_id, comment_id).await?;
        if comment.author_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(comment)
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        self.comment_for_delete(actor_user_id, post_id, comment_id)
            .await?;

        let deleted = self.comments.delete_comment(comment_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        Ok(())
    }

    async fn comment_under_post(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, DomainError> {
        let comment = self
            .comments
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))?;

        if comment.post_id != post_id {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        Ok(comment)
    }
}
