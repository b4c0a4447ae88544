//! Author mentions, the atomic inputs to disambiguation

use serde::{Deserialize, Serialize};

use impute_names::{AuthorName, Named};

/// Identifier of a mention within a loaded corpus
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MentionId(pub u32);

/// One author occurrence on one paper.
///
/// `truth` carries the known author identity in evaluation corpora and is
/// never consulted while resolving. `original` preserves the raw string for
/// reporting, and `assigned_name` receives the final cluster name once
/// resolution finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub id: MentionId,
    pub name: AuthorName,
    pub paper: String,
    pub truth: Option<String>,
    pub original: String,
    pub assigned_name: Option<String>,
}

impl Mention {
    pub fn new(
        id: MentionId,
        name: AuthorName,
        paper: String,
        truth: Option<String>,
        original: String,
    ) -> Self {
        Self {
            id,
            name,
            paper,
            truth,
            original,
            assigned_name: None,
        }
    }
}

impl Named for Mention {
    fn first_name(&self) -> &str {
        self.name.first_name()
    }

    fn middle_names(&self) -> &[String] {
        self.name.middle_names()
    }

    fn last_name(&self) -> &str {
        self.name.last_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impute_names::parse;

    #[test]
    fn test_mention_delegates_name() {
        let mention = Mention::new(
            MentionId(0),
            parse("J.C. Smith").unwrap(),
            "p1".to_string(),
            None,
            "J.C. Smith".to_string(),
        );
        assert_eq!(mention.token(), "smith_j");
        assert_eq!(mention.full_name(), "j c smith");
        assert!(mention.assigned_name.is_none());
    }
}
