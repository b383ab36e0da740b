pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod dto;
pub mod error;
pub mod exit;
pub mod git;
pub mod history;
pub mod resolve;
pub mod snapshot;
pub mod source;
pub mod stats;
pub mod summary;
