//! Name frequency model backing generation and misspelling priors

use std::collections::HashMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::name::{AuthorName, Named};

/// Shape constant for the misspelling prior: longer names decay more slowly
/// per unit of edit distance.
const MISSPELLING_SHAPE: f64 = 8.0;

/// Component frequency counts accumulated over a corpus of parsed names.
///
/// Given names of a single letter only feed the initial counts; longer given
/// names feed both, so initials stay comparable across abbreviated and
/// spelled-out mentions. The totals are derived and recomputed on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameFrequencyModel {
    first_names: HashMap<String, u64>,
    first_initials: HashMap<String, u64>,
    last_names: HashMap<String, u64>,
    names_seen: u64,
    #[serde(skip)]
    first_total: u64,
    #[serde(skip)]
    initial_total: u64,
    #[serde(skip)]
    last_total: u64,
}

impl NameFrequencyModel {
    /// Build a model from an iterator of parsed names.
    pub fn train<'a, I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a N>,
        N: Named + 'a,
    {
        let mut model = Self::default();
        for name in names {
            model.add_name(name);
        }
        model
    }

    /// Fold one name's components into the counts.
    pub fn add_name(&mut self, name: &impl Named) {
        let given = std::iter::once(name.first_name()).chain(
            name.middle_names()
                .iter()
                .map(String::as_str),
        );
        for component in given {
            if let Some(initial) = component.chars().next() {
                *self
                    .first_initials
                    .entry(initial.to_string())
                    .or_insert(0) += 1;
                self.initial_total += 1;
            }
            if component.chars().count() > 1 {
                *self.first_names.entry(component.to_string()).or_insert(0) += 1;
                self.first_total += 1;
            }
        }
        *self
            .last_names
            .entry(name.last_name().to_string())
            .or_insert(0) += 1;
        self.last_total += 1;
        self.names_seen += 1;
    }

    /// Number of names folded into the model.
    pub fn names_seen(&self) -> u64 {
        self.names_seen
    }

    /// Probability of generating exactly this name pattern: the product of
    /// per-component frequencies, with initials looked up in the initial
    /// counts and unseen components floored at `1 / (total + 1)`.
    pub fn pattern_probability(&self, name: &impl Named) -> f64 {
        let mut p = 1.0;
        let given = std::iter::once(name.first_name()).chain(
            name.middle_names()
                .iter()
                .map(String::as_str),
        );
        for component in given {
            if component.chars().count() == 1 {
                p *= probability(&self.first_initials, self.initial_total, component);
            } else {
                p *= probability(&self.first_names, self.first_total, component);
            }
        }
        p * probability(&self.last_names, self.last_total, name.last_name())
    }

    /// Probability that a random author matches both names, defined as the
    /// pattern probability of their intersection. `None` when the names are
    /// incompatible.
    pub fn generation_probability(
        &self,
        a: &impl Named,
        b: &impl Named,
    ) -> Option<f64> {
        AuthorName::intersect(a, b).map(|shared| self.pattern_probability(&shared))
    }

    /// Prior that `wrong` is a misspelling of `right`, decaying with edit
    /// distance and rising with name length.
    pub fn misspelling_prior(&self, right: &impl Named, wrong: &impl Named) -> f64 {
        let l = right.name_length().min(wrong.name_length()) as f64;
        let d = strsim::levenshtein(&right.full_name(), &wrong.full_name());
        (l / (l + MISSPELLING_SHAPE)).powi(d as i32)
    }

    pub fn to_json_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let mut model: NameFrequencyModel = serde_json::from_reader(reader)?;
        model.recompute_totals();
        Ok(model)
    }

    fn recompute_totals(&mut self) {
        self.first_total = self.first_names.values().sum();
        self.initial_total = self.first_initials.values().sum();
        self.last_total = self.last_names.values().sum();
    }
}

fn probability(counts: &HashMap<String, u64>, total: u64, key: &str) -> f64 {
    if total == 0 {
        return 1.0;
    }
    match counts.get(key) {
        Some(count) => *count as f64 / total as f64,
        None => 1.0 / (total + 1) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn make_model(raws: &[&str]) -> NameFrequencyModel {
        let names: Vec<AuthorName> = raws.iter().map(|r| parse(r).unwrap()).collect();
        NameFrequencyModel::train(&names)
    }

    #[test]
    fn test_empty_model_is_uninformative() {
        let model = NameFrequencyModel::default();
        let name = parse("John Smith").unwrap();
        assert_eq!(model.pattern_probability(&name), 1.0);
    }

    #[test]
    fn test_initials_aggregate_spelled_out_firsts() {
        let model = make_model(&["John Smith", "James Brown", "Karen White"]);
        let initial = parse("J. Jones").unwrap();
        // Two of three given names start with "j".
        let p = model.pattern_probability(&initial);
        let expected = (2.0 / 3.0) * (1.0 / 4.0);
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_component_floor() {
        let model = make_model(&["John Smith", "John Brown"]);
        let unseen = parse("Zara Smith").unwrap();
        let p = model.pattern_probability(&unseen);
        let expected = (1.0 / 3.0) * (1.0 / 2.0);
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_generation_probability_requires_compatibility() {
        let model = make_model(&["John Smith"]);
        let a = parse("John Smith").unwrap();
        let b = parse("Karen Smith").unwrap();
        assert!(model.generation_probability(&a, &b).is_none());
        assert!(model.generation_probability(&a, &a).is_some());
    }

    #[test]
    fn test_misspelling_prior_identical_names() {
        let model = NameFrequencyModel::default();
        let name = parse("John Smith").unwrap();
        assert_eq!(model.misspelling_prior(&name, &name), 1.0);
    }

    #[test]
    fn test_misspelling_prior_decays_with_distance() {
        let model = NameFrequencyModel::default();
        let right = parse("John Doe").unwrap();
        let wrong = parse("Jon Doe").unwrap();
        // Shorter name has 7 characters, one edit apart.
        let p = model.misspelling_prior(&right, &wrong);
        assert!((p - 7.0 / 15.0).abs() < 1e-12);

        let far = parse("Jan Dow").unwrap();
        assert!(model.misspelling_prior(&right, &far) < p);
    }

    #[test]
    fn test_totals_recomputed_on_load() {
        let model = make_model(&["John Smith", "Jane Smith", "John Brown"]);
        let name = parse("John Smith").unwrap();
        let before = model.pattern_probability(&name);

        let mut buffer = Vec::new();
        model.to_json_writer(&mut buffer).unwrap();
        let reloaded = NameFrequencyModel::from_json_reader(buffer.as_slice()).unwrap();

        assert_eq!(reloaded.names_seen(), 3);
        assert_eq!(reloaded.pattern_probability(&name), before);
    }
}
