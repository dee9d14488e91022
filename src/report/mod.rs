//! Test registration and reporting
//!
//! A finalized conversation hands its turns to a [`TestRegistry`] as a tree
//! of [`TestGroup`]s. [`SuiteRunner`] is the in-process registry: it runs
//! each check as it arrives and collects a [`SuiteReport`].

pub mod colors;
mod logging;
mod runner;
mod suite;

pub use colors::ColorSupport;
pub use logging::{LogFormat, default_filter, init_tracing};
pub use runner::{CheckReport, GroupReport, SuiteReport, SuiteRunner};
pub use suite::{Check, TestGroup, TestRegistry};
