//! Storage infrastructure: the TOML configuration file.
//!
//! The bridge only ever reads its configuration; the file is written by hand
//! (or by a packaging script).  See [`config`] for the schema.

pub mod config;
