//! List ordering for news pages and comment threads.
//!
//! # Invariants
//! - News: `published_at DESC`, ties broken by `id ASC`, cut to page size.
//! - Comments: `created_at ASC`, ties broken by `id ASC`.

use crate::config::CoreConfig;
use crate::model::comment::Comment;
use crate::model::news::NewsItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingPolicy {
    news_page_size: u32,
}

impl OrderingPolicy {
    pub fn new(news_page_size: u32) -> Self {
        Self { news_page_size }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.news_page_size)
    }

    pub fn news_page_size(&self) -> u32 {
        self.news_page_size
    }

    /// Most recent first, at most `news_page_size` items.
    pub fn news_page(&self, mut items: Vec<NewsItem>) -> Vec<NewsItem> {
        items.sort_by(|left, right| {
            right
                .published_at
                .cmp(&left.published_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        items.truncate(self.news_page_size as usize);
        items
    }

    /// Oldest first.
    pub fn comment_thread(&self, mut comments: Vec<Comment>) -> Vec<Comment> {
        comments.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        comments
    }
}

#[cfg(test)]
mod tests {
    use super::OrderingPolicy;
    use crate::model::comment::Comment;
    use crate::model::news::NewsItem;
    use uuid::Uuid;

    #[test]
    fn news_page_is_descending_and_truncated() {
        let policy = OrderingPolicy::new(3);
        let items = (0..5)
            .map(|day| NewsItem::new(format!("n{day}"), "text", day * 86_400_000))
            .collect();
        let page = policy.news_page(items);
        let dates: Vec<i64> = page.iter().map(|item| item.published_at).collect();
        assert_eq!(dates, vec![4 * 86_400_000, 3 * 86_400_000, 2 * 86_400_000]);
    }

    #[test]
    fn equal_dates_keep_stable_order() {
        let policy = OrderingPolicy::new(10);
        let items: Vec<NewsItem> = (0..4).map(|_| NewsItem::new("same", "t", 7)).collect();
        let first = policy.news_page(items.clone());
        let mut reversed = items;
        reversed.reverse();
        assert_eq!(first, policy.news_page(reversed));
    }

    #[test]
    fn comment_thread_is_ascending() {
        let policy = OrderingPolicy::new(10);
        let news_id = Uuid::new_v4();
        let author = Uuid::new_v4();
        let comments = vec![
            Comment::new(news_id, author, "c", 30),
            Comment::new(news_id, author, "a", 10),
            Comment::new(news_id, author, "b", 20),
        ];
        let texts: Vec<String> = policy
            .comment_thread(comments)
            .into_iter()
            .map(|comment| comment.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
