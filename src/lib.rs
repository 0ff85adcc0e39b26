// src/lib.rs

//! Teacher-recruitment interview announcement collector library.

pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod push;
pub mod sources;
pub mod storage;
pub mod utils;
