//! Response matching
//!
//! Extracts the spoken text of a turn's result and evaluates equality,
//! containment, regex and fuzzy-similarity expectations against it.

mod assertions;
mod expectation;
pub mod extract;
pub mod fuzzy;

pub use assertions::*;
pub use expectation::*;
pub use extract::{OutputKind, SpokenText, fix_spaces, spoken_text, strip_tags};
pub use fuzzy::{FuzzyOutcome, FuzzySet, approximates};
