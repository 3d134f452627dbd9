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

//! Generated-code containers and their modules
//!
//! A container is an isolated unit holding loadable generated routines;
//! each container opens exactly one module, the subdivision that individual
//! routines are written into by emitters.

use crate::error::{CodegenError, CodegenResult};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Access policy a container is constructed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerAccess {
    /// Generated code can only be executed
    Run,
    /// Generated code can be executed and materialized to disk for inspection
    RunAndPersist,
    /// Generated code can be executed and later unloaded as a unit
    RunAndCollect,
}

/// Descriptive metadata stamped onto a container at construction time.
///
/// Consumed by diagnostic tooling only; has no effect on the observable
/// behavior of generated routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerAttributes {
    /// Generated code maps cleanly to a debugger
    pub debugging_enabled: bool,
    /// Optimizations are disabled so stepping matches source order
    pub optimizations_disabled: bool,
    /// Sequence-point symbol mapping is skipped to minimize overhead
    pub skip_symbol_mapping: bool,
    /// Aggressive inlining-safe relaxations are permitted
    pub relaxed_checks: bool,
    /// Redundant verification is skipped when already fully trusted
    pub skip_verification: bool,
}

impl ContainerAttributes {
    /// Stamp attributes for a container with the given debuggability.
    ///
    /// Relaxed compilation checks are always granted; verification is
    /// skipped because this backend only ever runs fully trusted.
    pub fn stamp(debuggable: bool) -> Self {
        Self {
            debugging_enabled: debuggable,
            optimizations_disabled: debuggable,
            skip_symbol_mapping: !debuggable,
            relaxed_checks: true,
            skip_verification: true,
        }
    }
}

/// Kind of routine a generated artifact implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineKind {
    /// Field-by-field object serializer
    Object,
    /// Enumerated-type serializer
    Enum,
}

/// An opaque generated artifact deposited into a module by an emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRoutine {
    /// Symbol the routine is resolvable under
    pub symbol: String,
    /// Routine kind
    pub kind: RoutineKind,
    /// Generated body
    pub body: Vec<u8>,
}

/// A subdivision of a container that generated routines are written into
#[derive(Debug)]
pub struct CodeModule {
    /// Persistent symbol-mapped name; `None` for anonymous in-memory modules
    name: Option<String>,
    routines: DashMap<String, GeneratedRoutine>,
    sealed: AtomicBool,
}

impl CodeModule {
    pub(crate) fn new(name: Option<String>) -> Self {
        Self {
            name,
            routines: DashMap::new(),
            sealed: AtomicBool::new(false),
        }
    }

    /// The module's persistent name, if it has one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Write a generated routine into this module under its symbol.
    ///
    /// Refused once the owning container has been unloaded; emitters bound
    /// to an unloaded container cannot resurrect routines in it.
    pub fn define_routine(&self, routine: GeneratedRoutine) -> CodegenResult<()> {
        if self.sealed.load(Ordering::Acquire) {
            return Err(CodegenError::ContainerUnloaded(self.display_name().to_string()));
        }
        let symbol = routine.symbol.clone();
        match self.routines.entry(symbol) {
            dashmap::mapref::entry::Entry::Occupied(entry) => Err(CodegenError::DuplicateRoutine {
                symbol: entry.key().clone(),
                module: self.display_name().to_string(),
            }),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                debug!("Defined routine '{}' in module '{}'", entry.key(), self.display_name());
                entry.insert(routine);
                Ok(())
            }
        }
    }

    /// Resolve a previously generated routine by symbol
    pub fn resolve(&self, symbol: &str) -> Option<GeneratedRoutine> {
        self.routines.get(symbol).map(|entry| entry.value().clone())
    }

    /// Number of routines generated into this module so far
    pub fn routine_count(&self) -> usize {
        self.routines.len()
    }

    /// Symbols of all routines generated into this module
    pub fn symbols(&self) -> Vec<String> {
        self.routines.iter().map(|entry| entry.key().clone()).collect()
    }

    fn clear(&self) {
        self.routines.clear();
    }

    fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }
}

/// Persisted description of a container and its generated symbols
#[derive(Debug, Serialize, Deserialize)]
struct ContainerManifest {
    container: String,
    module: Option<String>,
    attributes: ContainerAttributes,
    routines: Vec<RoutineRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoutineRecord {
    symbol: String,
    kind: RoutineKind,
    size: usize,
}

/// An isolated unit holding loadable generated code
#[derive(Debug)]
pub struct CodeContainer {
    name: String,
    access: ContainerAccess,
    attributes: ContainerAttributes,
    module: Arc<CodeModule>,
    unloaded: AtomicBool,
}

impl CodeContainer {
    /// Create a container and open its single module.
    ///
    /// Debuggable containers get a named, symbol-mapped module so they can
    /// later be persisted; everything else gets an anonymous in-memory one.
    /// Construction never performs disk I/O.
    pub fn new(name: impl Into<String>, access: ContainerAccess, attributes: ContainerAttributes) -> Self {
        let name = name.into();
        let module_name = if attributes.debugging_enabled { Some(format!("{name}.gen")) } else { None };
        debug!("Created container '{}' with access {:?}", name, access);
        Self {
            name,
            access,
            attributes,
            module: Arc::new(CodeModule::new(module_name)),
            unloaded: AtomicBool::new(false),
        }
    }

    /// Globally unique container name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access policy this container was constructed with
    pub fn access(&self) -> ContainerAccess {
        self.access
    }

    /// Attributes stamped at construction time
    pub fn attributes(&self) -> ContainerAttributes {
        self.attributes
    }

    /// The container's single module
    pub fn module(&self) -> &Arc<CodeModule> {
        &self.module
    }

    /// Whether the container is still open for generation
    pub fn is_open(&self) -> bool {
        !self.unloaded.load(Ordering::Acquire)
    }

    /// Unload all generated code in this container as a unit.
    ///
    /// Only valid for `RunAndCollect` containers; after unloading, the
    /// container refuses further generation and persistence.
    pub fn unload(&self) -> CodegenResult<()> {
        if self.access != ContainerAccess::RunAndCollect {
            return Err(CodegenError::UnsupportedAccess {
                container: self.name.clone(),
                required: ContainerAccess::RunAndCollect,
                actual: self.access,
            });
        }
        // Seal before clearing so no in-flight emitter can write between
        // the bulk free and the flag flip.
        self.module.seal();
        let dropped = self.module.routine_count();
        self.module.clear();
        self.unloaded.store(true, Ordering::Release);
        info!("Unloaded container '{}', dropped {} routines", self.name, dropped);
        Ok(())
    }

    /// Materialize a manifest of this container's generated code to disk.
    ///
    /// Only valid for `RunAndPersist` containers. This is the caller-triggered
    /// half of the debuggable path; container construction itself never
    /// writes to disk. Returns the path of the written manifest.
    pub fn persist_to(&self, directory: &Path) -> CodegenResult<PathBuf> {
        if self.access != ContainerAccess::RunAndPersist {
            return Err(CodegenError::UnsupportedAccess {
                container: self.name.clone(),
                required: ContainerAccess::RunAndPersist,
                actual: self.access,
            });
        }
        if !self.is_open() {
            return Err(CodegenError::ContainerUnloaded(self.name.clone()));
        }

        let mut routines: Vec<RoutineRecord> = self
            .module
            .routines
            .iter()
            .map(|entry| RoutineRecord {
                symbol: entry.key().clone(),
                kind: entry.value().kind,
                size: entry.value().body.len(),
            })
            .collect();
        routines.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let manifest = ContainerManifest {
            container: self.name.clone(),
            module: self.module.name().map(str::to_string),
            attributes: self.attributes,
            routines,
        };

        let path = directory.join(format!("{}.manifest.json", self.name));
        let contents = serde_json::to_vec_pretty(&manifest)?;
        std::fs::write(&path, contents)?;
        info!("Persisted container '{}' manifest to {}", self.name, path.display());
        Ok(path)
    }
}
