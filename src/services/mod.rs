// src/services/mod.rs
pub mod alpha_vantage;
pub mod finnhub;
pub mod line;
pub mod notifier;
pub mod quote_provider;
