//! Committed example: `app_config.rs` is the generated output for
//! `configs/app_config.yaml`, checked in so downstream usage compiles in CI.
//! The tests below regenerate it and assert the committed text is exactly
//! what the generator produces, then exercise the round-trip contract.

pub mod app_config;
