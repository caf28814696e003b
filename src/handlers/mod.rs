// src/handlers/mod.rs
pub mod error;
pub mod notify;
