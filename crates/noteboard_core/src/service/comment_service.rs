//! Comment use-case service.
//!
//! # Responsibility
//! - Create comments on existing news items after moderation.
//! - Author-only edit/delete with the same moderation on edits.
//!
//! # Invariants
//! - Rejected text is never persisted.
//! - `created_at` comes from the injected clock.
//! - Anonymous callers are redirected before any comment lookup.
//! - A comment of another author is reported exactly like a missing one.

use crate::access::Action;
use crate::clock::Clock;
use crate::config::CoreConfig;
use crate::model::comment::{Comment, CommentId};
use crate::model::news::NewsId;
use crate::model::user::Caller;
use crate::moderation::ContentModerator;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::news_repo::NewsRepository;
use crate::routes::RouteConfig;
use crate::service::{
    acting_user, guard, guard_page, log_failure, ResourceUnavailable, ServiceError,
};
use log::info;

pub struct CommentService<N: NewsRepository, C: CommentRepository, K: Clock> {
    news: N,
    comments: C,
    clock: K,
    moderator: ContentModerator,
    routes: RouteConfig,
}

impl<N: NewsRepository, C: CommentRepository, K: Clock> CommentService<N, C, K> {
    pub fn new(news: N, comments: C, clock: K, config: &CoreConfig) -> Self {
        Self {
            news,
            comments,
            clock,
            moderator: ContentModerator::new(&config.moderation),
            routes: config.routes.clone(),
        }
    }

    /// Redirect target after any successful comment write.
    pub fn thread_path(&self, comment: &Comment) -> String {
        self.routes.news_comments(comment.news_id)
    }

    /// Posts a comment from the news detail page.
    ///
    /// # Errors
    /// - `Unauthenticated` for anonymous callers (nothing is stored).
    /// - `Unavailable` when the news item does not exist.
    /// - `ModerationRejected` when the text contains a forbidden term.
    pub fn create_comment(
        &self,
        caller: &Caller,
        news_id: NewsId,
        text: &str,
    ) -> Result<Comment, ServiceError> {
        let path = self.routes.news_detail(news_id);
        guard(caller, None, Action::Create, &path, &self.routes, "comment_create")?;
        let author = acting_user(caller)?;

        if self.news.get_news(news_id)?.is_none() {
            info!("event=comment_create module=service status=denied reason=not_found");
            return Err(ServiceError::Unavailable(ResourceUnavailable::NotFound));
        }
        self.moderator
            .moderate(text)
            .map_err(|rejected| log_failure("comment_create", rejected.into()))?;

        let comment = Comment::new(news_id, author, text, self.clock.now_ms());
        self.comments
            .insert_comment(&comment)
            .map_err(|err| log_failure("comment_create", err.into()))?;

        info!(
            "event=comment_create module=service status=ok comment_id={} news_id={news_id}",
            comment.id
        );
        Ok(comment)
    }

    /// Author-only edit form.
    pub fn edit_form(&self, caller: &Caller, comment_id: CommentId) -> Result<Comment, ServiceError> {
        let path = self.routes.comment_edit(comment_id);
        self.load_owned(caller, comment_id, Action::Read, &path, "comment_edit_form")
    }

    /// Author-only delete confirmation.
    pub fn delete_form(
        &self,
        caller: &Caller,
        comment_id: CommentId,
    ) -> Result<Comment, ServiceError> {
        let path = self.routes.comment_delete(comment_id);
        self.load_owned(caller, comment_id, Action::Read, &path, "comment_delete_form")
    }

    /// Replaces the text of the caller's comment.
    pub fn edit_comment(
        &self,
        caller: &Caller,
        comment_id: CommentId,
        text: &str,
    ) -> Result<Comment, ServiceError> {
        let path = self.routes.comment_edit(comment_id);
        let current = self.load_owned(caller, comment_id, Action::Mutate, &path, "comment_edit")?;
        self.moderator
            .moderate(text)
            .map_err(|rejected| log_failure("comment_edit", rejected.into()))?;

        let updated = Comment {
            text: text.to_string(),
            ..current
        };
        self.comments
            .update_comment(&updated)
            .map_err(|err| log_failure("comment_edit", err.into()))?;

        info!(
            "event=comment_edit module=service status=ok comment_id={}",
            updated.id
        );
        Ok(updated)
    }

    /// Deletes the caller's comment and returns what was removed.
    pub fn delete_comment(
        &self,
        caller: &Caller,
        comment_id: CommentId,
    ) -> Result<Comment, ServiceError> {
        let path = self.routes.comment_delete(comment_id);
        let comment =
            self.load_owned(caller, comment_id, Action::Mutate, &path, "comment_delete")?;
        self.comments
            .delete_comment(comment.id)
            .map_err(|err| log_failure("comment_delete", err.into()))?;

        info!(
            "event=comment_delete module=service status=ok comment_id={}",
            comment.id
        );
        Ok(comment)
    }

    fn load_owned(
        &self,
        caller: &Caller,
        comment_id: CommentId,
        action: Action,
        path: &str,
        event: &'static str,
    ) -> Result<Comment, ServiceError> {
        guard_page(caller, path, &self.routes, event)?;
        match self.comments.get_comment(comment_id)? {
            Some(comment) => {
                guard(caller, Some(comment.author), action, path, &self.routes, event)?;
                Ok(comment)
            }
            None => {
                info!("event={event} module=service status=denied reason=not_found");
                Err(ServiceError::Unavailable(ResourceUnavailable::NotFound))
            }
        }
    }
}
