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

//! Mode-scoped generator managers
//!
//! A manager owns one container/module pair and acts as the factory for
//! emitters bound to that module. Managers are immutable once constructed;
//! their debuggability and collectability are fixed by the mode (or by the
//! caller-supplied-container path) for the manager's whole lifetime.

use crate::capabilities::HostCapabilities;
use crate::container::{CodeContainer, CodeModule, ContainerAccess, ContainerAttributes};
use crate::emitter::{EnumSerializerEmitter, SerializerEmitter};
use crate::error::{CodegenError, CodegenResult};
use crate::mode::GenerationMode;
use crate::specification::{EmitterFlavor, EnumSerializationContext, SerializerContract, TypeSpecification};
use std::sync::Arc;
use tracing::{debug, warn};

/// Factory for emitters bound to one generated-code container
#[derive(Debug)]
pub struct GeneratorManager {
    debuggable: bool,
    collectable: bool,
    container: Arc<CodeContainer>,
    module: Arc<CodeModule>,
}

impl GeneratorManager {
    /// Construct a manager and its backing container for the given mode.
    ///
    /// Modes needing a capability the host lacks degrade to the nearest
    /// supported access policy instead of failing; the mode's flags are
    /// kept as-is so callers still observe the requested variant.
    pub(crate) fn build(mode: GenerationMode, capabilities: &HostCapabilities, name: String) -> Self {
        let debuggable = mode.is_debuggable();
        let collectable = mode.is_collectable();

        let access = if debuggable && capabilities.supports_persistable {
            ContainerAccess::RunAndPersist
        } else if collectable && capabilities.supports_collectible {
            ContainerAccess::RunAndCollect
        } else {
            if debuggable || collectable {
                warn!("Host lacks support for {:?} containers, degrading '{}' to run-only access", mode, name);
            }
            ContainerAccess::Run
        };

        // Persistable stamping is skipped on hosts that cannot persist
        let stamp_debuggable = debuggable && capabilities.supports_persistable;
        let container = Arc::new(CodeContainer::new(name, access, ContainerAttributes::stamp(stamp_debuggable)));
        let module = container.module().clone();
        debug!("Constructed generator manager: mode={:?}, container='{}'", mode, container.name());

        Self {
            debuggable,
            collectable,
            container,
            module,
        }
    }

    /// Wrap a caller-owned, already-open container.
    ///
    /// Used when precompiling serializers ahead of time for shipping as a
    /// standalone artifact. The resulting manager is debuggable and
    /// non-collectible, is never memoized, and shares the container with
    /// the caller, who stays responsible for finalizing/persisting it.
    pub fn for_container(container: Arc<CodeContainer>) -> CodegenResult<Self> {
        if !container.is_open() {
            return Err(CodegenError::contract("container", format!("container '{}' must be open for writing", container.name())));
        }
        let module = container.module().clone();
        Ok(Self {
            debuggable: true,
            collectable: false,
            container,
            module,
        })
    }

    /// Whether code generated through this manager carries debugging metadata
    pub fn is_debuggable(&self) -> bool {
        self.debuggable
    }

    /// Whether this manager's container may be unloaded as a unit
    pub fn is_collectable(&self) -> bool {
        self.collectable
    }

    /// The container this manager generates into
    pub fn container(&self) -> &Arc<CodeContainer> {
        &self.container
    }

    /// The container's single module
    pub fn module(&self) -> &Arc<CodeModule> {
        &self.module
    }

    /// Create an emitter for an object serializer routine.
    ///
    /// Every call yields an independent emitter bound to this manager's
    /// module; emitters are never shared between calls.
    pub fn create_emitter(&self, specification: &TypeSpecification, contract: &SerializerContract, flavor: EmitterFlavor) -> CodegenResult<SerializerEmitter> {
        SerializerEmitter::new(self.module.clone(), self.debuggable, specification, contract, flavor)
    }

    /// Create an emitter for an enumerated-type serializer routine
    pub fn create_enum_emitter(&self, context: EnumSerializationContext, specification: &TypeSpecification, flavor: EmitterFlavor) -> CodegenResult<EnumSerializerEmitter> {
        EnumSerializerEmitter::new(self.module.clone(), self.debuggable, context, specification, flavor)
    }
}
