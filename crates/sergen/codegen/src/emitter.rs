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

//! Emitters that write generated routines into a container's module
//!
//! An emitter is short-lived: the manager constructs one per request, bound
//! to the manager's module and debuggability flag. Driving the emitter (the
//! actual body generation) happens elsewhere; committing deposits the
//! finished routine into the bound module.

use crate::container::{CodeModule, GeneratedRoutine, RoutineKind};
use crate::error::CodegenResult;
use crate::specification::{EmitterFlavor, EnumSerializationContext, SerializerContract, TypeSpecification};
use std::sync::Arc;

/// Emitter for a field-by-field object serializer routine
#[derive(Debug)]
pub struct SerializerEmitter {
    module: Arc<CodeModule>,
    debuggable: bool,
    flavor: EmitterFlavor,
    symbol: String,
    contract_name: String,
}

impl SerializerEmitter {
    pub(crate) fn new(module: Arc<CodeModule>, debuggable: bool, specification: &TypeSpecification, contract: &SerializerContract, flavor: EmitterFlavor) -> CodegenResult<Self> {
        specification.validate()?;
        contract.validate()?;
        Ok(Self {
            module,
            debuggable,
            flavor,
            symbol: format!("{}_serializer", specification.symbol_stem()),
            contract_name: contract.contract_name.clone(),
        })
    }

    /// Name of the module this emitter writes into, if it has one
    pub fn module_name(&self) -> Option<&str> {
        self.module.name()
    }

    /// Whether generated code should carry debugging metadata
    pub fn is_debuggable(&self) -> bool {
        self.debuggable
    }

    pub fn flavor(&self) -> EmitterFlavor {
        self.flavor
    }

    /// Symbol the generated routine will be resolvable under
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Name of the contract the generated routine implements
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// Deposit the finished routine body into the bound module.
    ///
    /// Consumes the emitter: each emitter serves exactly one generation
    /// request. Returns the symbol the routine was defined under.
    pub fn commit(self, body: Vec<u8>) -> CodegenResult<String> {
        self.module.define_routine(GeneratedRoutine {
            symbol: self.symbol.clone(),
            kind: RoutineKind::Object,
            body,
        })?;
        Ok(self.symbol)
    }
}

/// Emitter specialized for enumerated-type serializer routines
#[derive(Debug)]
pub struct EnumSerializerEmitter {
    module: Arc<CodeModule>,
    debuggable: bool,
    flavor: EmitterFlavor,
    context: EnumSerializationContext,
    symbol: String,
}

impl EnumSerializerEmitter {
    pub(crate) fn new(module: Arc<CodeModule>, debuggable: bool, context: EnumSerializationContext, specification: &TypeSpecification, flavor: EmitterFlavor) -> CodegenResult<Self> {
        specification.validate()?;
        Ok(Self {
            module,
            debuggable,
            flavor,
            context,
            symbol: format!("{}_enum_serializer", specification.symbol_stem()),
        })
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module.name()
    }

    pub fn is_debuggable(&self) -> bool {
        self.debuggable
    }

    pub fn flavor(&self) -> EmitterFlavor {
        self.flavor
    }

    /// The enum-naming strategy resolved from the shared serialization context
    pub fn context(&self) -> EnumSerializationContext {
        self.context
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Deposit the finished routine body into the bound module
    pub fn commit(self, body: Vec<u8>) -> CodegenResult<String> {
        self.module.define_routine(GeneratedRoutine {
            symbol: self.symbol.clone(),
            kind: RoutineKind::Enum,
            body,
        })?;
        Ok(self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{ContractKind, EnumNamingStrategy, FieldSpecification};

    fn module() -> Arc<CodeModule> {
        Arc::new(CodeModule::new(None))
    }

    fn spec() -> TypeSpecification {
        TypeSpecification::new("geometry::Point").with_field(FieldSpecification::new("x", 0))
    }

    fn contract() -> SerializerContract {
        SerializerContract::new("MessageSerializer", ContractKind::Serializer)
    }

    #[test]
    fn test_commit_defines_routine_in_bound_module() {
        let module = module();
        let emitter = SerializerEmitter::new(module.clone(), false, &spec(), &contract(), EmitterFlavor::FieldBased).unwrap();

        let symbol = emitter.commit(vec![0xAA]).unwrap();
        assert_eq!(symbol, "geometry_Point_serializer");
        assert_eq!(module.resolve(&symbol).unwrap().kind, RoutineKind::Object);
    }

    #[test]
    fn test_invalid_specification_rejected_at_construction() {
        let result = SerializerEmitter::new(module(), false, &TypeSpecification::new(""), &contract(), EmitterFlavor::FieldBased);
        assert!(result.is_err());
    }

    #[test]
    fn test_enum_emitter_records_naming_strategy() {
        let module = module();
        let context = EnumSerializationContext::new(EnumNamingStrategy::ByUnderlyingValue);
        let emitter = EnumSerializerEmitter::new(module.clone(), true, context, &spec(), EmitterFlavor::ContextBased).unwrap();

        assert!(emitter.is_debuggable());
        assert_eq!(emitter.context().naming, EnumNamingStrategy::ByUnderlyingValue);

        let symbol = emitter.commit(vec![]).unwrap();
        assert_eq!(module.resolve(&symbol).unwrap().kind, RoutineKind::Enum);
    }
}
