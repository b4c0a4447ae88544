//! Structured author names and the capability shared by name-bearing types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::compat::compatible;

/// Capability of anything carrying a structured author name.
///
/// Implemented by [`AuthorName`] itself and by the mention and cluster types
/// of the resolution engine, so compatibility checks and scoring operate on
/// either without knowing the concrete type.
pub trait Named {
    fn first_name(&self) -> &str;
    fn middle_names(&self) -> &[String];
    fn last_name(&self) -> &str;

    /// Blocking key: surname plus first initial, non-word characters stripped.
    fn token(&self) -> String {
        let mut raw = self.last_name().to_string();
        if let Some(initial) = self.first_name().chars().next() {
            raw.push('_');
            raw.push(initial);
        }
        raw.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase()
    }

    /// Space-joined first, middle, and last names.
    fn full_name(&self) -> String {
        let mut parts = vec![self.first_name().to_string()];
        parts.extend(self.middle_names().iter().cloned());
        parts.push(self.last_name().to_string());
        parts.join(" ")
    }

    /// Character length of the full name.
    fn name_length(&self) -> usize {
        self.full_name().chars().count()
    }

    /// Every surface form this name could plausibly have been written as:
    /// the full name, first + last, initial + last, and with middle names
    /// also first + middles + last and initial + middles + last.
    fn name_variants(&self) -> BTreeSet<String> {
        let mut variants = BTreeSet::new();
        variants.insert(self.full_name());

        let first = self.first_name();
        let last = self.last_name();
        variants.insert(format!("{} {}", first, last));
        if let Some(initial) = first.chars().next() {
            variants.insert(format!("{} {}", initial, last));
            if !self.middle_names().is_empty() {
                let middles = self.middle_names().join(" ");
                variants.insert(format!("{} {} {}", first, middles, last));
                variants.insert(format!("{} {} {}", initial, middles, last));
            }
        }
        variants
    }
}

/// A parsed author name. All fields are lowercase ASCII after cleaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    pub first: String,
    pub middles: Vec<String>,
    pub last: String,
    pub suffix: Option<String>,
}

impl AuthorName {
    /// The most specific form shared by two compatible names: the shorter
    /// first name, element-wise shorter middle names when both sides carry
    /// the same number of them (empty otherwise), and the common last name.
    ///
    /// Returns `None` when the names are not compatible.
    pub fn intersect(a: &impl Named, b: &impl Named) -> Option<AuthorName> {
        if !compatible(a, b) {
            return None;
        }

        let first = shorter(a.first_name(), b.first_name()).to_string();

        let (am, bm) = (a.middle_names(), b.middle_names());
        let middles = if am.len() == bm.len() {
            am.iter()
                .zip(bm)
                .map(|(x, y)| shorter(x, y).to_string())
                .collect()
        } else {
            Vec::new()
        };

        Some(AuthorName {
            first,
            middles,
            last: a.last_name().to_string(),
            suffix: None,
        })
    }
}

impl Named for AuthorName {
    fn first_name(&self) -> &str {
        &self.first
    }

    fn middle_names(&self) -> &[String] {
        &self.middles
    }

    fn last_name(&self) -> &str {
        &self.last
    }
}

fn shorter<'a>(a: &'a str, b: &'a str) -> &'a str {
    if b.len() < a.len() {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(first: &str, middles: &[&str], last: &str) -> AuthorName {
        AuthorName {
            first: first.to_string(),
            middles: middles.iter().map(|m| m.to_string()).collect(),
            last: last.to_string(),
            suffix: None,
        }
    }

    #[test]
    fn test_token() {
        assert_eq!(name("john", &[], "smith").token(), "smith_j");
        assert_eq!(name("ann", &[], "smith-jones").token(), "smithjones_a");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(name("john", &["c"], "smith").full_name(), "john c smith");
        assert_eq!(name("john", &[], "smith").full_name(), "john smith");
    }

    #[test]
    fn test_name_length() {
        assert_eq!(name("john", &[], "smith").name_length(), 10);
    }

    #[test]
    fn test_name_variants_without_middles() {
        let variants = name("john", &[], "smith").name_variants();
        let expected: Vec<&str> = vec!["j smith", "john smith"];
        assert_eq!(variants.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_name_variants_with_middles() {
        let variants = name("john", &["a"], "smith").name_variants();
        assert!(variants.contains("john a smith"));
        assert!(variants.contains("john smith"));
        assert!(variants.contains("j smith"));
        assert!(variants.contains("j a smith"));
        assert_eq!(variants.len(), 4);
    }

    #[test]
    fn test_intersect_widens_to_shorter_first() {
        let a = name("j", &[], "smith");
        let b = name("john", &[], "smith");
        let shared = AuthorName::intersect(&a, &b).unwrap();
        assert_eq!(shared.first, "j");
        assert_eq!(shared.last, "smith");
        assert!(shared.middles.is_empty());
    }

    #[test]
    fn test_intersect_middles_only_when_lengths_match() {
        let a = name("john", &["c"], "smith");
        let b = name("john", &["charles"], "smith");
        let shared = AuthorName::intersect(&a, &b).unwrap();
        assert_eq!(shared.middles, vec!["c".to_string()]);

        let c = name("john", &[], "smith");
        let shared = AuthorName::intersect(&a, &c).unwrap();
        assert!(shared.middles.is_empty());
    }

    #[test]
    fn test_intersect_incompatible() {
        let a = name("john", &[], "smith");
        let b = name("jane", &[], "smith");
        assert!(AuthorName::intersect(&a, &b).is_none());
    }
}
