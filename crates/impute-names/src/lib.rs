//! Structured author names: parsing raw strings into first/middle/last
//! components, compatibility checks between abbreviated and spelled-out
//! forms, a component frequency model, and spelling candidates.

pub mod compat;
pub mod error;
pub mod model;
pub mod name;
pub mod nicknames;
pub mod parse;
pub mod speller;

pub use compat::{compatible, compatible_part, same_first_last_initials};
pub use error::{NameError, Result};
pub use model::NameFrequencyModel;
pub use name::{AuthorName, Named};
pub use nicknames::canonical_first_name;
pub use parse::{clean, parse};
pub use speller::Speller;
