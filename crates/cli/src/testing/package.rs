// Path: crates/cli/src/testing/package.rs
//! Reads a light-client contract artifact and gzip-compresses it for `MsgStoreCode`.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::Path;
use wasmlc_types::app::CompressedPayload;
use wasmlc_types::error::PackageError;

/// Compresses `bytes` into a single gzip stream at the default level.
///
/// The gzip header and trailer are always written, so the output is non-empty
/// even for empty input.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, PackageError> {
    // The stream is usually a fraction of the input; start from a quarter.
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(bytes.len() / 4 + 32),
        Compression::default(),
    );
    encoder
        .write_all(bytes)
        .map_err(PackageError::Compression)?;
    encoder.finish().map_err(PackageError::Compression)
}

/// Inflates a gzip stream produced by [`compress`].
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, PackageError> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(PackageError::Compression)?;
    Ok(out)
}

/// Packages bytes that are already in memory.
pub fn package_bytes(artifact: &[u8]) -> Result<CompressedPayload, PackageError> {
    let checksum: [u8; 32] = Sha256::digest(artifact).into();
    let bytes = compress(artifact)?;
    Ok(CompressedPayload {
        bytes,
        checksum,
        original_len: artifact.len(),
    })
}

/// Reads the artifact at `path` and packages it.
///
/// The artifact is read in full before compression starts; a partial read is
/// an error, never a truncated payload.
pub fn package_artifact(path: impl AsRef<Path>) -> Result<CompressedPayload, PackageError> {
    let path = path.as_ref();
    let artifact = std::fs::read(path).map_err(|source| PackageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = package_bytes(&artifact)?;
    tracing::info!(
        target: "package",
        path = %path.display(),
        original_len = payload.original_len,
        compressed_len = payload.len(),
        checksum = %payload.checksum_hex(),
        "Packaged light-client artifact"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_including_empty() {
        for input in [
            Vec::new(),
            b"\0asm\x01\0\0\0".to_vec(),
            (0..=255u8).cycle().take(70_000).collect::<Vec<_>>(),
        ] {
            let compressed = compress(&input).unwrap();
            assert!(!compressed.is_empty());
            assert_eq!(decompress(&compressed).unwrap(), input);
        }
    }

    #[test]
    fn test_checksum_is_over_uncompressed_bytes() {
        let payload = package_bytes(b"hello").unwrap();
        assert_eq!(
            payload.checksum_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(payload.original_len, 5);
        // gzip magic
        assert_eq!(&payload.bytes[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        let err = decompress(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, PackageError::Compression(_)));
    }

    #[test]
    fn test_missing_artifact_reports_path() {
        let err = package_artifact("/no/such/artifact.wasm").unwrap_err();
        match err {
            PackageError::Io { path, .. } => {
                assert_eq!(path, std::path::PathBuf::from("/no/such/artifact.wasm"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_package_artifact_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.wasm");
        let artifact = vec![7u8; 4096];
        std::fs::write(&path, &artifact).unwrap();

        let payload = package_artifact(&path).unwrap();
        assert!(payload.len() < artifact.len());
        assert_eq!(decompress(&payload.bytes).unwrap(), artifact);
    }
}
