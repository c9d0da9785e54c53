//! Test utilities for storage tests.

pub mod scripted_server;

#[allow(unused_imports)]
pub use scripted_server::{RecordedRequest, ScriptedServer};
