// src/errors.rs
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_request::RpcError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML case file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON-RPC error object. Displayed verbatim so the report shows the node's own message.
    #[error("{message}")]
    Rpc { code: i64, message: String },

    #[error("RPC client error: {0}")]
    Client(Box<ClientError>),

    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("Signature {0} has expired: block height exceeded")]
    BlockHeightExceeded(String),

    #[error("Failed to load keypair from {path}: {message}")]
    Keypair { path: String, message: String },

    #[error("Invalid program id '{0}'")]
    InvalidProgramId(String),

    #[error("Invalid test case '{label}': {reason}")]
    InvalidCase { label: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ClientError> for SubmitError {
    fn from(err: ClientError) -> Self {
        match &err.kind {
            ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => SubmitError::Rpc {
                code: *code,
                message: message.clone(),
            },
            _ => SubmitError::Client(Box::new(err)),
        }
    }
}

pub type Result<T> = std::result::Result<T, SubmitError>;
