//! Name compatibility predicates
//!
//! Structural admissibility checks evaluated before any probabilistic
//! scoring. A pair that fails [`compatible`] can never be merged.

use crate::name::Named;

/// True when one name part equals the other or is its single-letter initial.
pub fn compatible_part(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    (a.len() == 1 && b.starts_with(a)) || (b.len() == 1 && a.starts_with(b))
}

/// Structural compatibility: could these two names denote the same person.
///
/// Last names must match exactly, first names must agree under the
/// equal-or-initial rule, and middle-name sequences must agree position by
/// position. A missing middle-name sequence is compatible with anything;
/// sequences of different non-zero lengths are not.
pub fn compatible(a: &impl Named, b: &impl Named) -> bool {
    if a.last_name() != b.last_name() {
        return false;
    }
    if !compatible_part(a.first_name(), b.first_name()) {
        return false;
    }

    let (am, bm) = (a.middle_names(), b.middle_names());
    if am.is_empty() || bm.is_empty() {
        return true;
    }
    if am.len() != bm.len() {
        return false;
    }
    am.iter().zip(bm).all(|(x, y)| compatible_part(x, y))
}

/// True when two full-name strings agree on the initials of their first
/// and last words.
pub fn same_first_last_initials(a: &str, b: &str) -> bool {
    match (edge_initials(a), edge_initials(b)) {
        (Some(ia), Some(ib)) => ia == ib,
        _ => false,
    }
}

fn edge_initials(s: &str) -> Option<(char, char)> {
    let mut words = s.split_whitespace();
    let first = words.next()?.chars().next()?;
    let last = match words.last() {
        Some(w) => w.chars().next()?,
        None => first,
    };
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::AuthorName;

    fn name(first: &str, middles: &[&str], last: &str) -> AuthorName {
        AuthorName {
            first: first.to_string(),
            middles: middles.iter().map(|m| m.to_string()).collect(),
            last: last.to_string(),
            suffix: None,
        }
    }

    #[test]
    fn test_compatible_part() {
        assert!(compatible_part("john", "john"));
        assert!(compatible_part("j", "john"));
        assert!(compatible_part("john", "j"));
        assert!(!compatible_part("john", "jane"));
        assert!(!compatible_part("john", "jon"));
        assert!(!compatible_part("k", "john"));
    }

    #[test]
    fn test_compatible_requires_same_last_name() {
        assert!(!compatible(
            &name("john", &[], "smith"),
            &name("john", &[], "smythe")
        ));
    }

    #[test]
    fn test_compatible_first_name_initial() {
        assert!(compatible(
            &name("j", &[], "smith"),
            &name("john", &[], "smith")
        ));
    }

    #[test]
    fn test_compatible_middle_names_position_wise() {
        assert!(compatible(
            &name("john", &["c", "k"], "smith"),
            &name("john", &["charles", "kevin"], "smith")
        ));
        assert!(!compatible(
            &name("john", &["c", "k"], "smith"),
            &name("john", &["kevin", "charles"], "smith")
        ));
    }

    #[test]
    fn test_compatible_empty_middles_match_anything() {
        assert!(compatible(
            &name("john", &[], "smith"),
            &name("john", &["charles", "kevin"], "smith")
        ));
    }

    #[test]
    fn test_incompatible_middle_length_mismatch() {
        assert!(!compatible(
            &name("john", &["c"], "smith"),
            &name("john", &["charles", "kevin"], "smith")
        ));
    }

    #[test]
    fn test_same_first_last_initials() {
        assert!(same_first_last_initials("jon doe", "john doe"));
        assert!(same_first_last_initials("j doe", "john a doe"));
        assert!(!same_first_last_initials("jon doe", "john roe"));
        assert!(!same_first_last_initials("", "john doe"));
    }
}
