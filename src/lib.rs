//! Summaries and sentiment for arbitrary text, delegated to a remote
//! chat-completion API.
//!
//! The [`gateway::Gateway`] is the whole engine. The CLI (`main.rs`) and the
//! HTTP [`server`] are thin adapters around it.

pub mod config;
pub mod consts;
pub mod error;
pub mod gateway;
pub mod input;
pub mod prompts;
pub mod report;
pub mod sentiment;
pub mod server;
