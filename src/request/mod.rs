//! Intent request synthesis
//!
//! Builds platform-shaped intent requests for each conversation turn and
//! threads session attributes from one turn's result into the next request.

mod builder;
pub mod context;
mod slots;
mod types;

pub use builder::*;
pub use slots::*;
pub use types::*;
