//! Dewey Core Library
//!
//! Validation, consistency checking, auto-fix and curation recommendations
//! for a knowledge base of structured markdown documents.

pub mod config;
pub mod cross;
pub mod document;
pub mod engine;
pub mod error;
pub mod fix;
pub mod history;
pub mod jsonl;
pub mod kb;
pub mod logging;
pub mod markdown;
pub mod recommend;
pub mod similarity;
pub mod triggers;
pub mod utilization;
pub mod validate;
