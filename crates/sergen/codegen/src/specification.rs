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

//! Type specifications consumed by serializer emitters

use crate::error::{CodegenError, CodegenResult};
use serde::{Deserialize, Serialize};

/// How a generated routine reaches a type's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessStrategy {
    /// Read/write fields directly
    Direct,
    /// Go through accessor methods
    Accessor,
    /// Fall back to reflective access for fields that allow nothing else
    Reflective,
}

/// A single field of a type to be serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpecification {
    /// Field name
    pub name: String,
    /// Position of the field in the wire schema
    pub schema_order: u32,
    /// Whether the field may be absent on the wire
    pub optional: bool,
}

impl FieldSpecification {
    pub fn new(name: impl Into<String>, schema_order: u32) -> Self {
        Self {
            name: name.into(),
            schema_order,
            optional: false,
        }
    }
}

/// Full description of a data type's shape, sufficient to generate a
/// serializer/deserializer for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpecification {
    /// Fully qualified name of the target type
    pub type_name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldSpecification>,
    /// Field access strategy
    pub access: AccessStrategy,
}

impl TypeSpecification {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            access: AccessStrategy::Direct,
        }
    }

    pub fn with_field(mut self, field: FieldSpecification) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_access(mut self, access: AccessStrategy) -> Self {
        self.access = access;
        self
    }

    /// Symbol stem generated routines for this type are named under
    pub fn symbol_stem(&self) -> String {
        self.type_name.replace("::", "_")
    }

    /// Reject incomplete specifications before any generation starts
    pub fn validate(&self) -> CodegenResult<()> {
        if self.type_name.is_empty() {
            return Err(CodegenError::contract("specification", "type name must not be empty"));
        }
        if let Some(field) = self.fields.iter().find(|f| f.name.is_empty()) {
            return Err(CodegenError::contract("specification", format!("field at schema order {} has an empty name", field.schema_order)));
        }
        Ok(())
    }
}

/// Kind of abstract contract a generated routine implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractKind {
    /// Full encode/decode serializer contract
    Serializer,
    /// Decode-only contract
    Deserializer,
}

/// The abstract contract a generated routine must implement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerContract {
    /// Name of the contract trait/interface
    pub contract_name: String,
    /// Contract kind
    pub kind: ContractKind,
}

impl SerializerContract {
    pub fn new(contract_name: impl Into<String>, kind: ContractKind) -> Self {
        Self {
            contract_name: contract_name.into(),
            kind,
        }
    }

    pub fn validate(&self) -> CodegenResult<()> {
        if self.contract_name.is_empty() {
            return Err(CodegenError::contract("base_contract", "contract name must not be empty"));
        }
        Ok(())
    }
}

/// Generation-strategy selector for emitters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitterFlavor {
    /// Routines take the target value and operate on fields directly
    FieldBased,
    /// Routines additionally thread a serialization context parameter
    ContextBased,
}

/// How enum values are represented on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnumNamingStrategy {
    /// Serialize enum members by name
    ByName,
    /// Serialize enum members by underlying value
    ByUnderlyingValue,
}

/// Shared context resolving enum-naming/value strategy for enum emitters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSerializationContext {
    pub naming: EnumNamingStrategy,
}

impl EnumSerializationContext {
    pub fn new(naming: EnumNamingStrategy) -> Self {
        Self { naming }
    }
}

impl Default for EnumSerializationContext {
    fn default() -> Self {
        Self::new(EnumNamingStrategy::ByName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_specification_passes() {
        let spec = TypeSpecification::new("geometry::Point")
            .with_field(FieldSpecification::new("x", 0))
            .with_field(FieldSpecification::new("y", 1));
        assert!(spec.validate().is_ok());
        assert_eq!(spec.symbol_stem(), "geometry_Point");
    }

    #[test]
    fn test_empty_type_name_rejected() {
        let spec = TypeSpecification::new("");
        assert!(matches!(spec.validate(), Err(CodegenError::ContractViolation { argument: "specification", .. })));
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let spec = TypeSpecification::new("T").with_field(FieldSpecification::new("", 3));
        assert!(matches!(spec.validate(), Err(CodegenError::ContractViolation { .. })));
    }

    #[test]
    fn test_empty_contract_name_rejected() {
        let contract = SerializerContract::new("", ContractKind::Serializer);
        assert!(matches!(contract.validate(), Err(CodegenError::ContractViolation { argument: "base_contract", .. })));
    }
}
