//! Kodi JSON-RPC message types, request ids and the request/response codec.

pub mod codec;
pub mod messages;
pub mod request_id;

pub use codec::{decode_response, decode_result, encode_request, ProtocolError};
pub use messages::*;
pub use request_id::RequestIdCounter;
