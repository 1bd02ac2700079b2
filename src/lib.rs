#![forbid(unsafe_code)]

pub mod agents;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod engine;
pub mod error;
pub mod gcp;
pub mod logging;
pub mod packaging;
pub mod permissions;
pub mod project;
pub mod utils;
pub mod version;
