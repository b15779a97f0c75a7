#![doc = include_str!("../README.md")]

pub mod admin;
pub mod analyze;
pub mod content_type;
pub mod fields;
pub mod models;
