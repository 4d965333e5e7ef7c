// src/lib.rs

//! eventcrawl library

pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
