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

//! Serializer code-generation container management
//!
//! This crate owns the lifecycle of the containers that generated
//! serialization routines are deposited into, with clear separation of
//! concerns:
//!
//! - `config`: Process-wide debug-dump configuration
//! - `error`: Error types and handling
//! - `mode`: Generation modes and their debuggability/collectability matrix
//! - `capabilities`: Host capability detection and degradation policy
//! - `container`: Code containers, modules, and attribute stamping
//! - `specification`: Type specifications consumed by emitters
//! - `emitter`: Per-request emitters bound to a container's module
//! - `manager`: Mode-scoped generator managers (emitter factories)
//! - `registry`: Process-wide registry of per-mode manager singletons

pub mod capabilities;
pub mod config;
pub mod container;
pub mod emitter;
pub mod error;
pub mod manager;
pub mod mode;
pub mod registry;
pub mod specification;

// Re-export main types
pub use capabilities::HostCapabilities;
pub use config::DumpConfig;
pub use container::{CodeContainer, CodeModule, ContainerAccess, ContainerAttributes, GeneratedRoutine, RoutineKind};
pub use emitter::{EnumSerializerEmitter, SerializerEmitter};
pub use error::{CodegenError, CodegenResult};
pub use manager::GeneratorManager;
pub use mode::GenerationMode;
pub use registry::{GeneratorRegistry, NAMESPACE_PREFIX};
pub use specification::{AccessStrategy, ContractKind, EmitterFlavor, EnumNamingStrategy, EnumSerializationContext, FieldSpecification, SerializerContract, TypeSpecification};
