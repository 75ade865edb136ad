//! config-typegen: infer typed record definitions from configuration files
//! (YAML/JSON/TOML) and emit Rust source that round-trips the data exactly.
//!
//! Pipeline, in order: token resolution, ignore filtering, schema inference,
//! code emission. Generated records implement [`api::StructuredConfig`].

pub mod api;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod filter;
pub mod formats;
pub mod infer;
pub mod logging;
pub mod pipeline;
pub mod tokens;
pub mod value;
