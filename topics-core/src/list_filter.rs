use crate::model::Topic;
use engine::{contains_ignore_case, normalize_search};

/// Narrows a topic listing. Without a search every active topic is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicListCriteria {
    search: Option<String>,
}

impl TopicListCriteria {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search: normalize_search(search),
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Case-insensitive substring match on name or slug.
    pub fn matches(&self, topic: &Topic) -> bool {
        match &self.search {
            None => true,
            Some(s) => contains_ignore_case(&topic.name, s) || contains_ignore_case(&topic.slug, s),
        }
    }
}
