//! Topic rotation for follow-up questions.

/// Catalog used when no other is configured.
pub const DEFAULT_TOPICS: [&str; 15] = [
    "daily life",
    "work",
    "travel",
    "family",
    "technology",
    "hobbies",
    "food",
    "health",
    "education",
    "environment",
    "social media",
    "culture",
    "sports",
    "entertainment",
    "future plans",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicChoice {
    Catalog(String),
    /// Every catalog entry is used; the caller has to come up with a new topic.
    GenerateNovel,
}

/// First catalog entry not yet used, in catalog order.
pub fn next_topic<S: AsRef<str>>(used: &[String], catalog: &[S]) -> TopicChoice {
    catalog
        .iter()
        .map(AsRef::as_ref)
        .find(|topic| !used.iter().any(|u| u == topic))
        .map(|topic| TopicChoice::Catalog(topic.to_string()))
        .unwrap_or(TopicChoice::GenerateNovel)
}

/// Unused catalog entries, in catalog order.
pub fn available_topics<'a, S: AsRef<str>>(used: &[String], catalog: &'a [S]) -> Vec<&'a str> {
    catalog
        .iter()
        .map(AsRef::as_ref)
        .filter(|topic| !used.iter().any(|u| u == topic))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_unused_in_catalog_order() {
        let used = vec!["daily life".to_string(), "travel".to_string()];
        assert_eq!(
            next_topic(&used, &DEFAULT_TOPICS),
            TopicChoice::Catalog("work".to_string())
        );
    }

    #[test]
    fn test_exhausted_catalog_asks_for_novel_topic() {
        let used: Vec<String> = DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect();
        assert_eq!(next_topic(&used, &DEFAULT_TOPICS), TopicChoice::GenerateNovel);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog: [&str; 0] = [];
        assert_eq!(next_topic(&[], &catalog), TopicChoice::GenerateNovel);
    }

    #[test]
    fn test_topics_outside_catalog_are_ignored() {
        let used = vec!["problem-solving".to_string()];
        let catalog = vec!["food".to_string()];
        assert_eq!(
            next_topic(&used, &catalog),
            TopicChoice::Catalog("food".to_string())
        );
    }

    #[test]
    fn test_available_topics() {
        let used = vec!["work".to_string()];
        let available = available_topics(&used, &DEFAULT_TOPICS);
        assert_eq!(available.len(), 14);
        assert_eq!(available[0], "daily life");
        assert!(!available.contains(&"work"));
    }
}
