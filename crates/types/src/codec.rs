// crates/types/src/codec.rs

//! Defines the protobuf codec used for every message exchanged with the ledger.
//!
//! This module provides simple wrappers around `prost`. The ledger's modules
//! define their messages in protobuf, so byte-compatibility is a matter of
//! encoding the same field tags; the wrappers below centralize that logic so
//! that the submitter, the typed queries and the mock ledger all agree on
//! one representation.

use crate::app::Any;
use prost::Message;

/// Encodes a message into its protobuf byte representation.
pub fn to_bytes<T: Message>(v: &T) -> Vec<u8> {
    v.encode_to_vec()
}

/// Decodes a message from its protobuf byte representation.
///
/// Unknown fields are skipped, so responses from newer ledgers that carry
/// additional fields still decode.
pub fn from_bytes<T: Message + Default>(b: &[u8]) -> Result<T, String> {
    T::decode(b).map_err(|e| format!("protobuf decode failed: {}", e))
}

/// Packs a message into an `Any` under the given type URL.
pub fn to_any<T: Message>(type_url: &str, v: &T) -> Any {
    Any {
        type_url: type_url.to_string(),
        value: v.encode_to_vec(),
    }
}

/// Unpacks a message from an `Any`, failing if the type URL does not match.
pub fn from_any<T: Message + Default>(any: &Any, type_url: &str) -> Result<T, String> {
    if any.type_url != type_url {
        return Err(format!(
            "unexpected type url: expected {}, got {}",
            type_url, any.type_url
        ));
    }
    from_bytes(&any.value)
}
