use crate::model::News;
use engine::{contains_ignore_case, normalize_search};

/// Narrows a news listing. Without a search every active entry is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsListCriteria {
    search: Option<String>,
}

impl NewsListCriteria {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search: normalize_search(search),
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Case-insensitive substring match on title or content.
    pub fn matches(&self, news: &News) -> bool {
        match &self.search {
            None => true,
            Some(s) => {
                contains_ignore_case(&news.title, s) || contains_ignore_case(&news.content, s)
            }
        }
    }
}
