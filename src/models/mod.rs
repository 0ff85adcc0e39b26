// src/models/mod.rs

//! Domain models for the collector application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod announcement;
mod config;
mod question;

// Re-export all public types
pub use announcement::{url_hash, Announcement, Source};
pub use config::{
    Config, CrawlerConfig, DataSourcesConfig, FilterConfig, FixtureConfig, OutputConfig,
    PushConfig, SearchConfig, SitesConfig, ValidationConfig,
};
pub use question::QuestionRecord;
