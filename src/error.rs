use std::{io, path::PathBuf};

use alloy::{primitives::B256, transports::TransportError};

/// Everything that can go wrong while building, configuring or deploying.
///
/// The binary maps every variant to the same exit code; the variants exist so
/// callers and logs can tell the failures apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network '{name}' is not configured (known networks: {known})")]
    UnknownNetwork { name: String, known: String },

    #[error("artifact for contract '{name}' not found in {}", .dir.display())]
    ArtifactNotFound { name: String, dir: PathBuf },

    #[error("contract name '{name}' is ambiguous, found in: {}", display_paths(.paths))]
    AmbiguousArtifact { name: String, paths: Vec<PathBuf> },

    #[error("invalid artifact {}: {reason}", .path.display())]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("contract '{0}' has no bytecode, is it abstract or an interface?")]
    MissingBytecode(String),

    #[error("network '{0}' has no accounts configured")]
    NoAccounts(String),

    #[error("invalid private key for network '{network}': {reason}")]
    InvalidCredential { network: String, reason: String },

    #[error("invalid RPC url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Rpc(#[from] TransportError),

    #[error("deployment transaction {0} reverted")]
    TransactionReverted(B256),

    #[error("failed to read contract address from tx receipt {0}")]
    MissingContractAddress(B256),

    #[error("solc not found in PATH")]
    CompilerNotFound,

    #[error("solc version mismatch: configured {expected}, found {found}")]
    CompilerVersionMismatch { expected: String, found: String },

    #[error("compilation failed:\n{0}")]
    CompilationFailed(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
