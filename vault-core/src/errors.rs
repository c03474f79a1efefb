//! # Errors
//!
//! snap-vault carries a small set of structured errors through
//! `anyhow::Error`:
//! - each kind has a fixed status code and name
//! - the `message` is always safe to show to a client
//! - the optional `source` holds the internal cause and is only logged
//!
//! Transports recover the structured error by downcasting (see
//! [`VaultError::from_anyhow`]) and decide how to serialize it.

use std::fmt;

use anyhow::Error as AnyError;

/// A convenience result type for snap-vault APIs.
pub type VaultResult<T> = std::result::Result<T, AnyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,      // 400
    NotFound,        // 404
    PayloadTooLarge, // 413
    GeneralError,    // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PayloadTooLarge => "PayloadTooLarge",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    /// Client errors are reported as-is; everything else is an operator problem.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// A structured snap-vault error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct VaultError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: Option<AnyError>,
}

impl VaultError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Convert into `anyhow::Error` so it can be returned with `?`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Find a `VaultError` anywhere in an `anyhow` chain.
    pub fn from_anyhow(err: &AnyError) -> Option<&VaultError> {
        err.chain().find_map(|e| e.downcast_ref::<VaultError>())
    }

    /// Turn any error into a VaultError:
    /// - if it's already a VaultError, keep it
    /// - otherwise wrap as GeneralError with a generic message
    pub fn normalize(err: AnyError) -> VaultError {
        match err.downcast::<VaultError>() {
            Ok(vault) => vault,
            Err(other) => VaultError::general_error("Internal server error").with_source(other),
        }
    }

    /// Copy suitable for returning to clients: the `source` is dropped.
    pub fn sanitize_for_client(&self) -> VaultError {
        VaultError {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Extension for attaching a client-safe `VaultError` to a failing result.
pub trait ResultExt<T> {
    /// Wrap any failure as a `GeneralError` with `msg`, keeping the cause as source.
    fn or_general(self, msg: &str) -> VaultResult<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnyError>,
{
    fn or_general(self, msg: &str) -> VaultResult<T> {
        self.map_err(|e| {
            let e: AnyError = e.into();
            match VaultError::from_anyhow(&e) {
                // Client errors raised deeper down keep their kind.
                Some(v) if v.kind.is_client_error() => e,
                _ => VaultError::general_error(msg).with_source(e).into_anyhow(),
            }
        })
    }
}
