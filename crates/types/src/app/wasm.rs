// Path: crates/types/src/app/wasm.rs
//! The subset of the `ibc.lightclients.wasm.v1` schema used to install client code.

/// `ibc.lightclients.wasm.v1.MsgStoreCode`: the upgrade message.
///
/// `wasm_byte_code` carries the gzip-compressed contract; the module
/// decompresses it and stores it under the SHA-256 of the uncompressed bytes.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgStoreCode {
    /// The authority allowed to store code, normally the gov module account.
    #[prost(string, tag = "1")]
    pub signer: String,
    /// The compressed contract bytes.
    #[prost(bytes = "vec", tag = "2")]
    pub wasm_byte_code: Vec<u8>,
}

/// `ibc.lightclients.wasm.v1.QueryCodeRequest`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryCodeRequest {
    /// The hex-encoded checksum of the stored code.
    #[prost(string, tag = "1")]
    pub checksum: String,
}

/// `ibc.lightclients.wasm.v1.QueryCodeResponse`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryCodeResponse {
    /// The uncompressed stored code.
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
}
