//! Test Utilities and Mocks
//!
//! Shared helpers for the shellwrap test targets. Each target pulls this in
//! with `#[path = "../test_utils/mod.rs"] mod test_utils;`.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_wrapper;
pub mod recording_listener;

pub use fixtures::{collect_lines, fast_config, temp_shell, wait_until};
pub use mock_wrapper::MockWrapper;
pub use recording_listener::RecordingListener;
