use chrono::{DateTime, Utc};
use engine::id::TopicId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub name: String,
    pub slug: String,
}

impl NewTopic {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// The full set of mutable columns, persisted as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicUpdate {
    pub name: String,
    pub slug: String,
}

/// Caller supplied changes. Anything left as `None` keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPatch {
    pub name: Option<String>,
}

impl TopicPatch {
    pub fn new(name: Option<String>) -> Self {
        Self { name }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    pub fn new(
        id: TopicId,
        name: String,
        slug: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            created_at,
            updated_at,
        }
    }

    /// Merges `patch` into this snapshot, producing the columns to persist.
    /// The slug always follows the (possibly new) name.
    pub fn merge(&self, patch: TopicPatch) -> TopicUpdate {
        let name = patch.name.unwrap_or_else(|| self.name.clone());
        TopicUpdate {
            slug: engine::slugify(&name),
            name,
        }
    }
}
