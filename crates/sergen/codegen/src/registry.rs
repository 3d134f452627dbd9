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

//! Process-wide registry of per-mode generator managers
//!
//! The registry owns the three singleton slots and the atomic container
//! naming counter. It is constructed once at process start and passed by
//! reference to any code needing container access; there are no ambient
//! static accessors.

use crate::capabilities::HostCapabilities;
use crate::config::DumpConfig;
use crate::container::CodeContainer;
use crate::error::CodegenResult;
use crate::manager::GeneratorManager;
use crate::mode::GenerationMode;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Prefix of generated container names
pub const NAMESPACE_PREFIX: &str = "sergen";

/// Registry owning the per-mode manager singletons and the naming counter
#[derive(Debug)]
pub struct GeneratorRegistry {
    slots: [RwLock<Option<Arc<GeneratorManager>>>; 3],
    sequence: AtomicU64,
    capabilities: HostCapabilities,
    dump_config: Arc<DumpConfig>,
}

impl GeneratorRegistry {
    /// Create a registry with detected host capabilities and dumping disabled
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::detect())
    }

    /// Create a registry for explicit host capabilities
    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self::with_config(capabilities, Arc::new(DumpConfig::new()))
    }

    /// Create a registry wired to an externally owned dump configuration
    pub fn with_config(capabilities: HostCapabilities, dump_config: Arc<DumpConfig>) -> Self {
        Self {
            slots: [RwLock::new(None), RwLock::new(None), RwLock::new(None)],
            sequence: AtomicU64::new(0),
            capabilities,
            dump_config,
        }
    }

    /// The debugging configuration this registry consults for default lookups
    pub fn dump_config(&self) -> &Arc<DumpConfig> {
        &self.dump_config
    }

    /// Get the manager for the mode selected by the debugging configuration:
    /// `CanDump` when diagnostic dumping is enabled, `Fast` otherwise.
    pub fn get_manager(&self) -> Arc<GeneratorManager> {
        let mode = if self.dump_config.is_dump_enabled() { GenerationMode::CanDump } else { GenerationMode::Fast };
        self.get_manager_for(mode)
    }

    /// Get the singleton manager for a mode, constructing it on first access.
    ///
    /// Instances are published only after full construction; concurrent
    /// callers observe either no instance or a complete one, never a
    /// partially constructed manager.
    pub fn get_manager_for(&self, mode: GenerationMode) -> Arc<GeneratorManager> {
        let slot = &self.slots[mode.slot_index()];
        if let Some(manager) = slot.read().as_ref() {
            return manager.clone();
        }

        let mut guard = slot.write();
        // Double-check: another thread may have populated the slot while we
        // waited for the write lock.
        if let Some(manager) = guard.as_ref() {
            return manager.clone();
        }
        let manager = self.build_manager(mode);
        *guard = Some(manager.clone());
        manager
    }

    /// Wrap a caller-owned, already-open container in a fresh manager.
    ///
    /// Never memoized: every call yields a new instance, bypassing the
    /// singleton slots entirely.
    pub fn manager_for_container(&self, container: Arc<CodeContainer>) -> CodegenResult<GeneratorManager> {
        GeneratorManager::for_container(container)
    }

    /// Discard all previously generated code and start clean.
    ///
    /// Rebuilds the `Fast` singleton unconditionally; `CanDump` and
    /// `CanCollect` are rebuilt where the host supports them and otherwise
    /// left to lazy repopulation. Prior managers become orphaned but stay
    /// valid for code already generated through them. Not safe to run with
    /// emitter creation in flight on the old instances.
    pub fn refresh(&self) {
        info!("Refreshing generator registry, previously generated containers will be orphaned");
        self.replace_slot(GenerationMode::Fast);
        if self.capabilities.supports_persistable {
            self.replace_slot(GenerationMode::CanDump);
        } else {
            self.clear_slot(GenerationMode::CanDump);
        }
        if self.capabilities.supports_collectible {
            self.replace_slot(GenerationMode::CanCollect);
        } else {
            self.clear_slot(GenerationMode::CanCollect);
        }
    }

    fn replace_slot(&self, mode: GenerationMode) {
        let manager = self.build_manager(mode);
        *self.slots[mode.slot_index()].write() = Some(manager);
    }

    fn clear_slot(&self, mode: GenerationMode) {
        *self.slots[mode.slot_index()].write() = None;
    }

    /// Construct a manager with a freshly sequenced container name.
    ///
    /// The counter is a lock-free atomic increment so concurrent first-use
    /// across modes never produces colliding names.
    fn build_manager(&self, mode: GenerationMode) -> Arc<GeneratorManager> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let name = format!("{NAMESPACE_PREFIX}.generated_serializers{seq}");
        Arc::new(GeneratorManager::build(mode, &self.capabilities, name))
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_singleton_stability_per_mode() {
        let registry = GeneratorRegistry::new();
        for mode in GenerationMode::ALL {
            let first = registry.get_manager_for(mode);
            let second = registry.get_manager_for(mode);
            assert!(Arc::ptr_eq(&first, &second));
        }
    }

    #[test]
    fn test_generated_names_carry_namespace_prefix() {
        let registry = GeneratorRegistry::new();
        let manager = registry.get_manager_for(GenerationMode::Fast);
        assert!(manager.container().name().starts_with("sergen.generated_serializers"));
    }

    #[test]
    fn test_concurrent_construction_yields_unique_names() {
        let registry = Arc::new(GeneratorRegistry::new());
        let thread_count = 16;
        let builds_per_thread = 8;

        let mut handles = Vec::new();
        for _ in 0..thread_count {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                let mut names = Vec::new();
                for _ in 0..builds_per_thread {
                    names.push(registry.build_manager(GenerationMode::Fast).container().name().to_string());
                }
                names
            }));
        }

        let mut all_names = HashSet::new();
        for handle in handles {
            for name in handle.join().unwrap() {
                assert!(all_names.insert(name), "duplicate container name generated under concurrency");
            }
        }
        assert_eq!(all_names.len(), thread_count * builds_per_thread);
    }

    #[test]
    fn test_refresh_repopulates_unsupported_slots_lazily() {
        let caps = HostCapabilities::detect().without_collectible().without_persistable();
        let registry = GeneratorRegistry::with_capabilities(caps);

        let dump_before = registry.get_manager_for(GenerationMode::CanDump);
        let collect_before = registry.get_manager_for(GenerationMode::CanCollect);
        registry.refresh();

        // Unsupported modes are not eagerly rebuilt, but the next access
        // still yields a fresh instance.
        let dump_after = registry.get_manager_for(GenerationMode::CanDump);
        let collect_after = registry.get_manager_for(GenerationMode::CanCollect);
        assert!(!Arc::ptr_eq(&dump_before, &dump_after));
        assert!(!Arc::ptr_eq(&collect_before, &collect_after));
    }
}
