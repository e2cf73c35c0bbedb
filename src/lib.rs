// src/lib.rs

//! uSched Schedule Pipeline Library

pub mod cache;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
