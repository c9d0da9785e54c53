//! Test utilities for generation tests.

pub mod mock_client;
pub mod stores;

#[allow(unused_imports)]
pub use mock_client::{MockGenerationClient, failed, pending, success};
#[allow(unused_imports)]
pub use stores::{FailingHistoryStore, RecordingArchiver};
