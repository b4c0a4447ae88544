//! Raw name cleaning and splitting into structured form

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{NameError, Result};
use crate::name::{AuthorName, Named};
use crate::nicknames::canonical_first_name;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DISALLOWED: Regex = Regex::new(r"[^a-zA-Z ,.-]").unwrap();
    static ref DANGLING_HYPHEN: Regex = Regex::new(r" -|- ").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"--+").unwrap();
    static ref COMMA_SPACING: Regex = Regex::new(r" *, *").unwrap();
    static ref EDGE_COMMAS: Regex = Regex::new(r"^[, ]+|[, ]+$").unwrap();
    static ref HONORIFIC: Regex = Regex::new(r"(?i)^(Dr|Mr|Mrs|Ms)\. ").unwrap();
    static ref GLUED_INITIALS: Regex = Regex::new(r"^([A-Z])([A-Z]) ").unwrap();
    static ref LEADING_WORD_PERIOD: Regex = Regex::new(r"^([A-Z][a-z]+)\. ").unwrap();
    static ref PERIODS: Regex = Regex::new(r"\. *").unwrap();
    static ref PARTICLES: Regex =
        Regex::new(r" ((van|de|del|da|do|el|la|di|von|der) )+").unwrap();
    static ref SUFFIX: Regex = Regex::new(r"^(.*),? (jr|iii|iv)$").unwrap();
    static ref SPLIT_COMMA: Regex = Regex::new(r"^(?P<last>.+), (?P<first>.+)$").unwrap();
    static ref SPLIT_LAST_INITIALS: Regex =
        Regex::new(r"^(?P<last>\S{2,}) (?P<first>(?:[a-z] )*[a-z])$").unwrap();
    static ref SPLIT_FIRST_LAST: Regex = Regex::new(r"^(?P<first>.+?) (?P<last>\S+)$").unwrap();
    static ref PART_SEPARATOR: Regex = Regex::new(r"[ -]+").unwrap();
}

/// Normalize a raw name string: fold diacritics to ASCII, strip stray
/// punctuation, expand glued leading initials, drop honorifics, periods,
/// and nobiliary particles, and lowercase.
pub fn clean(raw: &str) -> String {
    let folded: String = raw.nfkd().filter(|c| c.is_ascii()).collect();

    let mut s = WHITESPACE.replace_all(&folded, " ").into_owned();
    s = DISALLOWED.replace_all(&s, "").into_owned();
    s = DANGLING_HYPHEN.replace_all(&s, " ").into_owned();
    s = HYPHEN_RUN.replace_all(&s, "-").into_owned();
    s = COMMA_SPACING.replace_all(&s, ", ").into_owned();
    s = EDGE_COMMAS.replace_all(&s, "").into_owned();
    s = HONORIFIC.replace(&s, "").into_owned();
    s = GLUED_INITIALS.replace(&s, "${1}. ${2}. ").into_owned();
    s = LEADING_WORD_PERIOD.replace(&s, "${1} ").into_owned();
    s = PERIODS.replace_all(&s, " ").into_owned();
    s = PARTICLES.replace_all(&s, " ").into_owned();
    s = WHITESPACE.replace_all(&s, " ").into_owned();
    s.trim().to_lowercase()
}

/// Parse a raw name string into a structured [`AuthorName`].
///
/// Tries, in order: "last, first ...", "last i n i t s", "first ... last".
/// The first-name token is canonicalized through the nickname table.
/// Fails with [`NameError::Malformed`] when no rule matches and with
/// [`NameError::Token`] when the name cannot yield a usable blocking token.
pub fn parse(raw: &str) -> Result<AuthorName> {
    let cleaned = clean(raw);

    let (remainder, suffix) = peel_suffix(&cleaned);

    let (not_last, last) =
        split_parts(remainder).ok_or_else(|| NameError::Malformed(raw.to_string()))?;

    let mut parts: Vec<&str> = PART_SEPARATOR
        .split(not_last)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(NameError::Malformed(raw.to_string()));
    }

    let first = canonical_first_name(parts.remove(0)).to_string();
    let middles: Vec<String> = parts.into_iter().map(String::from).collect();

    let name = AuthorName {
        first,
        middles,
        last: last.to_string(),
        suffix,
    };
    if name.token().len() < 3 {
        return Err(NameError::Token(raw.to_string()));
    }
    Ok(name)
}

fn peel_suffix(cleaned: &str) -> (&str, Option<String>) {
    if let Some(caps) = SUFFIX.captures(cleaned) {
        let remainder = caps.get(1).map_or("", |m| m.as_str());
        let suffix = caps.get(2).map(|m| m.as_str().to_string());
        (remainder, suffix)
    } else {
        (cleaned, None)
    }
}

fn split_parts(cleaned: &str) -> Option<(&str, &str)> {
    for pattern in [&*SPLIT_COMMA, &*SPLIT_LAST_INITIALS, &*SPLIT_FIRST_LAST] {
        if let Some(caps) = pattern.captures(cleaned) {
            let first = caps.name("first")?.as_str();
            let last = caps.name("last")?.as_str();
            return Some((first, last));
        }
    }
    None
}
