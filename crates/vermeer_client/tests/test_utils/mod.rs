//! Test utilities for client tests.
//!
//! A scripted HTTP responder: each accepted connection receives the next
//! canned response and the request is recorded for inspection.

pub mod scripted_server;

#[allow(unused_imports)]
pub use scripted_server::{RecordedRequest, ScriptedServer};
