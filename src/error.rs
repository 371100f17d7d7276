//! Error types for the boardnet connectivity model.
//!
//! This module provides a unified error type [`BoardnetError`] that covers
//! all error conditions that can occur during netlist lexing/parsing, graph
//! construction, and net resolution.

use thiserror::Error;

/// Result type alias using [`BoardnetError`].
pub type Result<T> = std::result::Result<T, BoardnetError>;

/// Unified error type for all boardnet operations.
#[derive(Error, Debug)]
pub enum BoardnetError {
    // ============ Lexer / Parser Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Input declares a format version this reader does not support
    #[error("Unsupported format version '{version}' (expected '{expected}')")]
    UnsupportedVersion { version: String, expected: String },

    /// A fixed-column report file is structurally invalid
    #[error("Invalid report: {message}")]
    InvalidReport { message: String },

    // ============ Graph Construction Errors ============
    /// Lookup by name failed
    #[error("{scope} '{name}' not found")]
    NotFound { scope: &'static str, name: String },

    /// An entity with this name already exists in the scope
    #[error("Redefinition of {scope} '{name}'")]
    Redefinition { scope: &'static str, name: String },

    /// The entity already belongs to an owner
    #[error("{scope} '{name}' is already part of a {owner}")]
    AlreadyOwned {
        scope: &'static str,
        name: String,
        owner: &'static str,
    },

    /// A relationship was attempted across board boundaries
    #[error("{message}")]
    CrossBoard { message: String },

    /// Pin already carries a wire connection
    #[error("Pin '{pin}' is already connected to wire '{wire}'")]
    PinAlreadyConnected { pin: String, wire: String },

    /// Interface pairing was attempted on an already-paired side
    #[error("Interface '{name}' is already paired")]
    AlreadyPaired { name: String },

    /// Interface pairing with mismatched pin/signal counts
    #[error("Pairing arity mismatch: '{left}' has {left_count} pins, '{right}' has {right_count}")]
    ArityMismatch {
        left: String,
        left_count: usize,
        right: String,
        right_count: usize,
    },

    /// A handle or entity was used before it was fully constructed
    #[error("Malformed {what}")]
    Malformed { what: &'static str },

    /// A component model references a pin number the component does not have
    #[error("Component '{refdes}' model references unknown pin '{pin}'")]
    UnknownModelPin { refdes: String, pin: String },

    // ============ Net Resolution Errors ============
    /// The element was not part of the System the net map was built from
    #[error("Element '{element}' is not part of the net map")]
    NotInNetMap { element: String },

    // ============ I/O Errors ============
    /// JSON serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading an input file
    #[error("Failed to read '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing an output file
    #[error("Failed to write '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BoardnetError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(scope: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            scope,
            name: name.into(),
        }
    }

    /// Create a redefinition error
    pub fn redefinition(scope: &'static str, name: impl Into<String>) -> Self {
        Self::Redefinition {
            scope,
            name: name.into(),
        }
    }

    /// Create a cross-board relationship error
    pub fn cross_board(message: impl Into<String>) -> Self {
        Self::CrossBoard {
            message: message.into(),
        }
    }

    /// Create an invalid report error
    pub fn invalid_report(message: impl Into<String>) -> Self {
        Self::InvalidReport {
            message: message.into(),
        }
    }
}
