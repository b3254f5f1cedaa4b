// Path: crates/types/src/app/mod.rs
//! Core application-level data structures exchanged with the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Messages and queries of the auth module.
pub mod auth;
/// Messages and queries of the gov v1 module.
pub mod gov;
/// Messages and queries of the 08-wasm light-client module.
pub mod wasm;

pub use auth::*;
pub use gov::*;
pub use wasm::*;

/// The protobuf `Any` envelope used to embed messages into transactions and proposals.
pub use prost_types::Any;

/// A bech32-encoded account address, e.g. `cosmos1...`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub String);

impl Address {
    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A token amount of a single denomination.
///
/// The amount travels as a decimal integer string on the wire, matching the
/// `cosmos.base.v1beta1.Coin` schema.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Coin {
    /// The denomination, e.g. `stake`.
    #[prost(string, tag = "1")]
    pub denom: String,
    /// The amount as a decimal integer string.
    #[prost(string, tag = "2")]
    pub amount: String,
}

impl Coin {
    /// Creates a coin from a denomination and an integer amount.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }

    /// Parses the amount, returning `None` if it is not a valid unsigned integer.
    pub fn amount_u128(&self) -> Option<u128> {
        self.amount.parse().ok()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// The account that signs and pays for a submitted transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    /// The name of the key in the signer's keyring.
    pub key_name: String,
    /// The bech32 address of the account.
    pub address: Address,
}

impl Wallet {
    /// Creates a new wallet handle.
    pub fn new(key_name: impl Into<String>, address: impl Into<Address>) -> Self {
        Self {
            key_name: key_name.into(),
            address: address.into(),
        }
    }
}

/// A single attribute of an ABCI event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventAttribute {
    /// The attribute key.
    pub key: String,
    /// The attribute value.
    pub value: String,
}

/// An ABCI event emitted while executing a transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    /// The event type, e.g. `submit_proposal`.
    pub kind: String,
    /// The event attributes in emission order.
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    /// Creates an event from a type and a list of key/value pairs.
    pub fn new<K, V>(kind: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: kind.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| EventAttribute {
                    key: k.into(),
                    value: v.into(),
                })
                .collect(),
        }
    }

    /// Returns the value of the first attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// The result of a transaction that has been included in a block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TxResult {
    /// The height of the block that included the transaction.
    pub height: u64,
    /// The hex-encoded transaction hash.
    pub tx_hash: String,
    /// The ABCI result code. Zero means success.
    pub code: u32,
    /// The module codespace of a non-zero `code`.
    pub codespace: String,
    /// The raw execution log.
    pub raw_log: String,
    /// Events emitted during execution.
    pub events: Vec<Event>,
}

impl TxResult {
    /// Returns true if the transaction executed successfully.
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    /// Extracts the ledger-assigned proposal id from the `submit_proposal` event.
    pub fn proposal_id(&self) -> Option<u64> {
        self.events
            .iter()
            .filter(|e| e.kind == crate::keys::SUBMIT_PROPOSAL_EVENT)
            .find_map(|e| e.attribute(crate::keys::PROPOSAL_ID_ATTRIBUTE))
            .and_then(|v| v.parse().ok())
    }
}

/// A gzip-compressed light-client contract, ready to be embedded in a `MsgStoreCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPayload {
    /// The gzip stream.
    pub bytes: Vec<u8>,
    /// SHA-256 of the uncompressed artifact; the identifier the code is stored under.
    pub checksum: [u8; 32],
    /// The length of the uncompressed artifact in bytes.
    pub original_len: usize,
}

impl CompressedPayload {
    /// The hex-encoded checksum, as accepted by the code query.
    pub fn checksum_hex(&self) -> String {
        hex::encode(self.checksum)
    }

    /// The length of the compressed stream in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the compressed stream is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
