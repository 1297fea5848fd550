//! Run state and the rules that move it.

pub mod engine;
pub mod progress;
pub mod rules;
pub mod timeline;
pub mod tracker;
