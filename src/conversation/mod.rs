//! Conversation driver
//!
//! A [`Conversation`] records an ordered list of user turns, each with its
//! own response assertions, and resolves them against the skill handler
//! strictly in order once the script is complete.

mod case;
mod driver;

pub use case::TestCase;
pub use driver::{Conversation, ConversationBuilder, Phase, Turn};
