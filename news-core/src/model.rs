use chrono::{DateTime, Utc};
use engine::id::{NewsId, TopicId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A topic as it appears attached to a news entry.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    pub id: TopicId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct News {
    pub id: NewsId,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub topics: Vec<TopicSummary>,
}

impl News {
    pub fn topic_ids(&self) -> Vec<TopicId> {
        self.topics.iter().map(|t| t.id).collect()
    }

    /// Merges `patch` into this snapshot. Omitted fields, topics included, keep their
    /// current values and the slug always follows the resulting title.
    pub fn merge(&self, patch: NewsPatch) -> NewsUpdate {
        let title = patch.title.unwrap_or_else(|| self.title.clone());
        NewsUpdate {
            slug: engine::slugify(&title),
            title,
            status: patch.status.unwrap_or_else(|| self.status.clone()),
            content: patch.content.unwrap_or_else(|| self.content.clone()),
            topic_ids: patch.topic_ids.unwrap_or_else(|| self.topic_ids()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNews {
    pub title: String,
    pub slug: String,
    pub status: String,
    pub content: String,
    pub topic_ids: Vec<TopicId>,
}

/// Every mutable column plus the complete association set, persisted as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsUpdate {
    pub title: String,
    pub slug: String,
    pub status: String,
    pub content: String,
    pub topic_ids: Vec<TopicId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub status: Option<String>,
    pub content: Option<String>,
    pub topic_ids: Option<Vec<TopicId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> TopicSummary {
        let now = Utc::now();
        TopicSummary {
            id: TopicId::new(),
            name: name.into(),
            slug: engine::slugify(name),
            created_at: now,
            updated_at: now,
        }
    }

    fn news() -> News {
        let now = Utc::now();
        News {
            id: NewsId::new(),
            title: "Breaking News".into(),
            slug: "breaking-news".into(),
            status: "draft".into(),
            content: "content".into(),
            created_at: now,
            updated_at: now,
            topics: vec![summary("one"), summary("two")],
        }
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let news = news();
        let update = news.merge(NewsPatch::default());

        assert_eq!(news.title, update.title);
        assert_eq!(news.slug, update.slug);
        assert_eq!(news.status, update.status);
        assert_eq!(news.content, update.content);
        assert_eq!(news.topic_ids(), update.topic_ids);
    }

    #[test]
    fn patch_title_recomputes_slug() {
        let update = news().merge(NewsPatch {
            title: Some("Markets Rally Again".into()),
            ..Default::default()
        });

        assert_eq!("markets-rally-again", update.slug);
    }

    #[test]
    fn patch_with_empty_topics_clears_them() {
        let update = news().merge(NewsPatch {
            topic_ids: Some(vec![]),
            status: Some("published".into()),
            ..Default::default()
        });

        assert!(update.topic_ids.is_empty());
        assert_eq!("published", update.status);
    }
}
