//! Public news pages: home listing and detail with comment thread.

use crate::access::Action;
use crate::config::CoreConfig;
use crate::model::comment::Comment;
use crate::model::news::{NewsId, NewsItem};
use crate::model::user::Caller;
use crate::ordering::OrderingPolicy;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::news_repo::NewsRepository;
use crate::routes::RouteConfig;
use crate::service::{guard, ResourceUnavailable, ServiceError};
use log::debug;

/// News detail page model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDetail {
    pub news: NewsItem,
    /// Thread in ascending `created_at` order.
    pub comments: Vec<Comment>,
    /// Only authenticated callers get a comment form.
    pub comment_form_available: bool,
}

pub struct NewsService<N: NewsRepository, C: CommentRepository> {
    news: N,
    comments: C,
    ordering: OrderingPolicy,
    routes: RouteConfig,
}

impl<N: NewsRepository, C: CommentRepository> NewsService<N, C> {
    pub fn new(news: N, comments: C, config: &CoreConfig) -> Self {
        Self {
            news,
            comments,
            ordering: OrderingPolicy::from_config(config),
            routes: config.routes.clone(),
        }
    }

    /// Home page: newest items first, one page.
    pub fn home(&self, caller: &Caller) -> Result<Vec<NewsItem>, ServiceError> {
        guard(
            caller,
            None,
            Action::Read,
            &self.routes.news_home,
            &self.routes,
            "news_home",
        )?;
        let items = self
            .news
            .list_recent_news(self.ordering.news_page_size())?;
        let page = self.ordering.news_page(items);
        debug!(
            "event=news_home module=service status=ok items={}",
            page.len()
        );
        Ok(page)
    }

    /// Detail page for one news item with its comments.
    pub fn detail(&self, caller: &Caller, news_id: NewsId) -> Result<NewsDetail, ServiceError> {
        let path = self.routes.news_detail(news_id);
        guard(caller, None, Action::Read, &path, &self.routes, "news_detail")?;

        let news = self
            .news
            .get_news(news_id)?
            .ok_or(ServiceError::Unavailable(ResourceUnavailable::NotFound))?;
        let comments = self
            .ordering
            .comment_thread(self.comments.list_comments_for_news(news_id)?);

        debug!(
            "event=news_detail module=service status=ok news_id={news_id} comments={}",
            comments.len()
        );
        Ok(NewsDetail {
            news,
            comments,
            comment_form_available: caller.is_authenticated(),
        })
    }
}
