//! Encoding JSON-RPC requests and decoding responses.
//!
//! The transport (HTTP in the daemon) is not this module's concern: it
//! turns a method call into bytes and a response body back into either a
//! typed result or a [`ProtocolError`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::messages::{RpcRequest, RpcResponse, JSONRPC_VERSION};

/// Errors that can occur while encoding a request or decoding a response.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The body is not a JSON-RPC response object.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The response carries neither `result` nor `error`.
    #[error("response has no result")]
    MissingResult,

    /// The response `id` does not match the request.
    #[error("response id mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: u64, actual: u64 },

    /// The server answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request could not be serialised.
    #[error("failed to encode request: {0}")]
    Encode(String),
}

/// Serialises a request for `method` with `params` and request `id`.
///
/// Pass `Value::Null` for methods without parameters.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialisation fails.
///
/// # Examples
///
/// ```rust
/// use beo_core::protocol::encode_request;
///
/// let body = encode_request("JSONRPC.Ping", serde_json::Value::Null, 1).unwrap();
/// assert_eq!(body, br#"{"jsonrpc":"2.0","method":"JSONRPC.Ping","id":1}"#);
/// ```
pub fn encode_request(method: &str, params: Value, id: u64) -> Result<Vec<u8>, ProtocolError> {
    let request = RpcRequest {
        jsonrpc: JSONRPC_VERSION,
        method,
        params,
        id,
    };
    serde_json::to_vec(&request).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decodes a response body and returns its untyped `result`.
///
/// `expected_id` is checked when the response carries an id.
///
/// # Errors
///
/// - [`ProtocolError::Rpc`] when the response carries an `error` object.
/// - [`ProtocolError::Malformed`] when the body is not a response envelope.
/// - [`ProtocolError::MissingResult`] when there is neither result nor error.
/// - [`ProtocolError::IdMismatch`] when the id does not match.
pub fn decode_response(body: &[u8], expected_id: u64) -> Result<Value, ProtocolError> {
    let response: RpcResponse =
        serde_json::from_slice(body).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    if let Some(err) = response.error {
        return Err(ProtocolError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    if let Some(actual) = response.id {
        if actual != expected_id {
            return Err(ProtocolError::IdMismatch {
                expected: expected_id,
                actual,
            });
        }
    }
    response.result.ok_or(ProtocolError::MissingResult)
}

/// Decodes a response body straight into a typed result.
///
/// # Errors
///
/// Same as [`decode_response`], plus [`ProtocolError::Malformed`] if the
/// `result` does not have the shape of `T`.
pub fn decode_result<T: DeserializeOwned>(body: &[u8], expected_id: u64) -> Result<T, ProtocolError> {
    let value = decode_response(body, expected_id)?;
    serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{GuiProperties, PONG};
    use serde_json::json;

    #[test]
    fn test_encode_request_with_params() {
        let body = encode_request("Player.PlayPause", json!({"playerid": 1}), 3).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "method": "Player.PlayPause", "params": {"playerid": 1}, "id": 3})
        );
    }

    #[test]
    fn test_decode_ping_result() {
        let body = br#"{"id":1,"jsonrpc":"2.0","result":"pong"}"#;
        let pong: String = decode_result(body, 1).unwrap();
        assert_eq!(pong, PONG);
    }

    #[test]
    fn test_decode_error_object() {
        let body = br#"{"error":{"code":-32100,"message":"Failed to execute method."},"id":4,"jsonrpc":"2.0"}"#;
        let err = decode_response(body, 4).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Rpc {
                code: -32100,
                message: "Failed to execute method.".to_string()
            }
        );
    }

    #[test]
    fn test_decode_missing_result() {
        let err = decode_response(br#"{"id":2,"jsonrpc":"2.0"}"#, 2).unwrap_err();
        assert_eq!(err, ProtocolError::MissingResult);
    }

    #[test]
    fn test_decode_id_mismatch() {
        let err = decode_response(br#"{"id":9,"jsonrpc":"2.0","result":"OK"}"#, 2).unwrap_err();
        assert_eq!(err, ProtocolError::IdMismatch { expected: 2, actual: 9 });
    }

    #[test]
    fn test_decode_non_json_is_malformed() {
        let err = decode_response(b"<html>401</html>", 1).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_decode_result_with_wrong_shape_is_malformed() {
        let body = br#"{"id":5,"jsonrpc":"2.0","result":{"currentwindow":{"id":1}}}"#;
        let err = decode_result::<GuiProperties>(body, 5).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }
}
