// src/lib.rs
pub mod banner;
pub mod cases;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod runner;
