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

//! End-to-end lifecycle tests for the generator registry

use sergen_codegen::{
    CodeContainer, ContainerAccess, ContainerAttributes, ContractKind, DumpConfig, EmitterFlavor, FieldSpecification, GenerationMode, GeneratorRegistry, HostCapabilities, SerializerContract,
    TypeSpecification,
};
use std::sync::Arc;

fn point_spec() -> TypeSpecification {
    TypeSpecification::new("geometry::Point")
        .with_field(FieldSpecification::new("x", 0))
        .with_field(FieldSpecification::new("y", 1))
}

fn serializer_contract() -> SerializerContract {
    SerializerContract::new("MessageSerializer", ContractKind::Serializer)
}

#[test]
fn mode_isolation_flag_matrix() {
    let registry = GeneratorRegistry::new();

    let fast = registry.get_manager_for(GenerationMode::Fast);
    let dump = registry.get_manager_for(GenerationMode::CanDump);
    let collect = registry.get_manager_for(GenerationMode::CanCollect);

    assert!(!Arc::ptr_eq(&fast, &dump));
    assert!(!Arc::ptr_eq(&fast, &collect));
    assert!(!Arc::ptr_eq(&dump, &collect));

    assert!(!fast.is_debuggable() && !fast.is_collectable());
    assert!(dump.is_debuggable() && !dump.is_collectable());
    assert!(!collect.is_debuggable() && collect.is_collectable());
}

#[test]
fn refresh_invalidates_every_mode() {
    let registry = GeneratorRegistry::new();
    let before: Vec<_> = GenerationMode::ALL.iter().map(|&m| registry.get_manager_for(m)).collect();

    registry.refresh();

    for (mode, old) in GenerationMode::ALL.iter().zip(&before) {
        let new = registry.get_manager_for(*mode);
        assert!(!Arc::ptr_eq(old, &new), "refresh did not invalidate {mode:?}");
        assert_ne!(old.container().name(), new.container().name());
    }

    // Orphaned containers stay valid for code already generated through them
    assert!(before[0].container().is_open());
}

#[test]
fn default_lookup_follows_dump_configuration() {
    let config = Arc::new(DumpConfig::new());
    let registry = GeneratorRegistry::with_config(HostCapabilities::detect(), config.clone());

    let defaulted = registry.get_manager();
    assert!(Arc::ptr_eq(&defaulted, &registry.get_manager_for(GenerationMode::Fast)));

    config.set_dump_enabled(true);
    let defaulted = registry.get_manager();
    assert!(Arc::ptr_eq(&defaulted, &registry.get_manager_for(GenerationMode::CanDump)));
}

#[test]
fn caller_supplied_container_path_is_never_memoized() {
    let registry = GeneratorRegistry::new();
    let container = Arc::new(CodeContainer::new("shipping.artifact", ContainerAccess::RunAndPersist, ContainerAttributes::stamp(true)));

    let first = registry.manager_for_container(container.clone()).unwrap();
    let second = registry.manager_for_container(container.clone()).unwrap();

    // Two distinct instances over the same container, both debuggable and
    // non-collectible, both sharing the caller's container.
    assert!(!std::ptr::eq(&first, &second));
    for manager in [&first, &second] {
        assert!(manager.is_debuggable());
        assert!(!manager.is_collectable());
        assert!(Arc::ptr_eq(manager.container(), &container));
    }

    // The singleton slots are untouched by this path
    let fast = registry.get_manager_for(GenerationMode::Fast);
    assert!(!Arc::ptr_eq(fast.container(), &container));
}

#[test]
fn emitter_is_bound_to_its_managers_module_only() {
    let registry = GeneratorRegistry::new();
    let fast = registry.get_manager_for(GenerationMode::Fast);
    let collect = registry.get_manager_for(GenerationMode::CanCollect);

    let emitter = fast.create_emitter(&point_spec(), &serializer_contract(), EmitterFlavor::FieldBased).unwrap();
    let symbol = emitter.commit(vec![0xDE, 0xAD]).unwrap();

    assert!(fast.module().resolve(&symbol).is_some());
    assert!(collect.module().resolve(&symbol).is_none());
}

#[test]
fn enum_emitter_is_bound_to_its_managers_module_only() {
    let registry = GeneratorRegistry::new();
    let fast = registry.get_manager_for(GenerationMode::Fast);
    let dump = registry.get_manager_for(GenerationMode::CanDump);

    let emitter = dump.create_enum_emitter(Default::default(), &point_spec(), EmitterFlavor::ContextBased).unwrap();
    assert!(emitter.is_debuggable());
    let symbol = emitter.commit(vec![]).unwrap();

    assert!(dump.module().resolve(&symbol).is_some());
    assert!(fast.module().resolve(&symbol).is_none());
}

#[test]
fn degraded_host_still_serves_every_mode() {
    let caps = HostCapabilities::detect().without_collectible().without_persistable();
    let registry = GeneratorRegistry::with_capabilities(caps);

    let collect = registry.get_manager_for(GenerationMode::CanCollect);
    assert_eq!(collect.container().access(), ContainerAccess::Run);
    assert!(collect.container().unload().is_err());

    let dump = registry.get_manager_for(GenerationMode::CanDump);
    assert_eq!(dump.container().access(), ContainerAccess::Run);
    let dir = tempfile::tempdir().unwrap();
    assert!(dump.container().persist_to(dir.path()).is_err());
}

#[test]
fn dump_mode_container_persists_generated_symbols() {
    let registry = GeneratorRegistry::new();
    let dump = registry.get_manager_for(GenerationMode::CanDump);

    let emitter = dump.create_emitter(&point_spec(), &serializer_contract(), EmitterFlavor::FieldBased).unwrap();
    let symbol = emitter.commit(vec![0x42; 16]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dump.container().persist_to(dir.path()).unwrap();
    let manifest = std::fs::read_to_string(path).unwrap();
    assert!(manifest.contains(&symbol));
    assert!(manifest.contains(dump.container().name()));
}

#[test]
fn collectible_container_unloads_generated_code() {
    let registry = GeneratorRegistry::new();
    let collect = registry.get_manager_for(GenerationMode::CanCollect);

    let emitter = collect.create_emitter(&point_spec(), &serializer_contract(), EmitterFlavor::FieldBased).unwrap();
    let symbol = emitter.commit(vec![0x01]).unwrap();
    assert!(collect.module().resolve(&symbol).is_some());

    // An emitter handed out before the unload cannot write into the freed arena
    let stale = collect.create_emitter(&point_spec(), &serializer_contract(), EmitterFlavor::ContextBased).unwrap();

    collect.container().unload().unwrap();
    assert!(collect.module().resolve(&symbol).is_none());
    assert!(stale.commit(vec![0x02]).is_err());
    assert!(collect.module().symbols().is_empty());

    // A fresh manager for the slot is only a refresh away
    registry.refresh();
    let rebuilt = registry.get_manager_for(GenerationMode::CanCollect);
    assert!(rebuilt.container().is_open());
}
