//! YSWS notifier server: configuration, HTTP adapters, the subscription
//! control API and the detection scheduler.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod push;
pub mod scheduler;

pub use main_lib::{build_state, build_state_with, init_tracing, AppState};
