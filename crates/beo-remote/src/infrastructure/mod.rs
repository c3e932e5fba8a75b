//! Infrastructure layer for the remote bridge.
//!
//! Contains OS-facing adapters: the IR serial reader, the Kodi JSON-RPC
//! client and file-system configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and `beo_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod ir_receiver;
pub mod kodi;
pub mod storage;
