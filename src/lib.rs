//! converse: scripted conversation tests for voice-skill handlers.
//!
//! ```rust,ignore
//! use converse::{Conversation, ConversationConfig, Slots};
//!
//! let mut conversation = Conversation::builder("weather")
//!     .config(ConversationConfig::new("amzn1.ask.skill.demo").with_fix_spaces(true))
//!     .handler(my_skill)
//!     .build()?;
//!
//! conversation
//!     .user_says("Greet", Slots::new())
//!     .plain_response()
//!     .should_equal("Hello there", "What would you like?")
//!     .user_says("Continue", [("topic", "weather")])
//!     .plain_response()
//!     .should_approximate("Weather looks sunny today", None, None);
//!
//! conversation.end().await.assert_passed();
//! ```

pub mod config;
pub mod conversation;
pub mod error;
pub mod handler;
pub mod report;
pub mod request;
pub mod response;
pub mod test_utils;

pub use config::ConversationConfig;
pub use conversation::{Conversation, ConversationBuilder, Phase, TestCase, Turn};
pub use error::{AssertionFailure, ConverseError, HandlerError, Result};
pub use handler::{Completion, SkillApp, SkillHandler, invoke};
pub use report::{ColorSupport, SuiteReport, SuiteRunner, TestRegistry};
pub use request::{Request, RequestBuilder, SlotValue, Slots};
pub use response::{OutputKind, ResponseAssertions};
