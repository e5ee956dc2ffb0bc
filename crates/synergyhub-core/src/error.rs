//! Core error types for synergyhub-core.
//!
//! The timeline and scoring engines are total and never return errors. Everything
//! in this module belongs to the stateful edges of the library: the synergy store,
//! the lifecycle state machine, the ledger seam and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::SynergyState;

/// Core error type for synergyhub-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Illegal synergy lifecycle transitions
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    /// Store lookups and workflow preconditions
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Ledger submission failures
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not resolve the configuration directory
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must not precede start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Evaluation points at offers the RFP never received
    #[error("Evaluation for RFP {rfp_id} references unknown offer '{offer_id}'")]
    UnknownOffer { rfp_id: String, offer_id: String },
}

/// Raised when a synergy is asked to move along an edge the lifecycle forbids.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid state transition: {from} → {to}")]
    Illegal { from: SynergyState, to: SynergyState },

    #[error("Cannot move to {to}: {reason}")]
    GuardFailed { to: SynergyState, reason: String },
}

/// Store lookup and workflow precondition errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Synergy not found: {0}")]
    SynergyNotFound(String),

    #[error("RFP not found: {0}")]
    RfpNotFound(String),

    #[error("Offer {offer_id} not found in RFP {rfp_id}")]
    OfferNotFound { rfp_id: String, offer_id: String },

    #[error("RFP {0} has no evaluation")]
    MissingEvaluation(String),

    #[error("RFP {0} has already been decided")]
    AlreadyDecided(String),

    #[error("Purchase order not found: {0}")]
    PurchaseOrderNotFound(String),

    #[error("Purchase order {0} is not awaiting retry")]
    PurchaseOrderNotFailed(String),
}

/// Ledger submission errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger rejected purchase order {po_number}: {message}")]
    Rejected { po_number: String, message: String },

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
