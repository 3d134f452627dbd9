// Sergen
// Copyright (C) 2025 Sergen Contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Error types for serializer code generation

use crate::container::ContainerAccess;
use thiserror::Error;

/// Errors that can occur while managing generated-code containers
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A required factory input is missing or empty. This is a programming
    /// error in the caller, not a recoverable runtime condition.
    #[error("Contract violation for argument '{argument}': {reason}")]
    ContractViolation { argument: &'static str, reason: String },

    #[error("Container '{container}' has access {actual:?}, operation requires {required:?}")]
    UnsupportedAccess {
        container: String,
        required: ContainerAccess,
        actual: ContainerAccess,
    },

    #[error("Container '{0}' has been unloaded")]
    ContainerUnloaded(String),

    #[error("Routine '{symbol}' is already defined in module '{module}'")]
    DuplicateRoutine { symbol: String, module: String },

    #[error("Persistence error: {0}")]
    PersistenceError(#[from] std::io::Error),

    #[error("Manifest serialization error: {0}")]
    ManifestError(#[from] serde_json::Error),
}

impl CodegenError {
    /// Shorthand for the contract-violation class of errors
    pub fn contract(argument: &'static str, reason: impl Into<String>) -> Self {
        CodegenError::ContractViolation {
            argument,
            reason: reason.into(),
        }
    }
}

/// Result type for code-generation container operations
pub type CodegenResult<T> = Result<T, CodegenError>;
