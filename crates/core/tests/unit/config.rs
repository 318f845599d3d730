//! Configuration Parsing Unit Tests.
//!
//! Verifies JSON deserialization of hierarchy descriptions: type tags,
//! per-field defaults, and rejection of malformed documents.

use cachesim_core::config::{HierarchyConfig, ReplacementPolicyKind, StorageConfig};
use cachesim_core::SimError;

const TWO_NODE_DOC: &str = r#"{
    "data_storages": [
        {
            "type": "SetAssociativeCache",
            "name": "l1",
            "next_level_data_storage": "mem0",
            "write_allocate": true,
            "write_through": false,
            "miss_latency": 10,
            "hit_latency": 1,
            "cache_block_size": 64,
            "sets": 64,
            "ways": 8,
            "replacement_policy": "LRU",
            "multi_block_access": 4
        },
        {
            "type": "FakeMemory",
            "name": "mem0",
            "size": 1048576,
            "read_latency": 100,
            "write_latency": 120
        }
    ]
}"#;

#[test]
fn parses_full_document() {
    let config = HierarchyConfig::from_json(TWO_NODE_DOC).unwrap();
    assert_eq!(config.data_storages.len(), 2);
    assert_eq!(config.data_storages[0].name(), "l1");
    assert_eq!(config.data_storages[1].name(), "mem0");
}

#[test]
fn cache_fields_deserialize() {
    let config = HierarchyConfig::from_json(TWO_NODE_DOC).unwrap();
    let StorageConfig::SetAssociativeCache(cache) = &config.data_storages[0] else {
        panic!("expected a cache node");
    };

    assert_eq!(cache.next_level_data_storage, "mem0");
    assert!(cache.write_allocate);
    assert!(!cache.write_through);
    assert_eq!(cache.cache_block_size, 64);
    assert_eq!(cache.sets, 64);
    assert_eq!(cache.ways, 8);
    assert_eq!(cache.replacement_policy, ReplacementPolicyKind::Lru);
    assert_eq!(cache.multi_block_access, 4);
}

#[test]
fn memory_fields_deserialize() {
    let config = HierarchyConfig::from_json(TWO_NODE_DOC).unwrap();
    let StorageConfig::FakeMemory(memory) = &config.data_storages[1] else {
        panic!("expected a memory node");
    };

    assert_eq!(memory.size, 1_048_576);
    assert_eq!(memory.read_latency, 100);
    assert_eq!(memory.write_latency, 120);
}

#[test]
fn omitted_policy_and_parallelism_take_defaults() {
    let doc = r#"{
        "data_storages": [
            {
                "type": "SetAssociativeCache",
                "name": "l1",
                "next_level_data_storage": "mem0",
                "write_allocate": true,
                "write_through": true,
                "miss_latency": 5,
                "hit_latency": 1,
                "cache_block_size": 32,
                "sets": 16,
                "ways": 4
            },
            {
                "type": "FakeMemory",
                "name": "mem0",
                "size": 4096,
                "read_latency": 50,
                "write_latency": 60
            }
        ]
    }"#;

    let config = HierarchyConfig::from_json(doc).unwrap();
    let StorageConfig::SetAssociativeCache(cache) = &config.data_storages[0] else {
        panic!("expected a cache node");
    };

    assert_eq!(cache.replacement_policy, ReplacementPolicyKind::Lru);
    assert_eq!(cache.multi_block_access, 1);
}

#[test]
fn unknown_replacement_policy_is_rejected() {
    let doc = TWO_NODE_DOC.replace("\"LRU\"", "\"CLOCK\"");
    let err = HierarchyConfig::from_json(&doc).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[test]
fn unknown_node_type_is_rejected() {
    let doc = TWO_NODE_DOC.replace("FakeMemory", "MagicMemory");
    let err = HierarchyConfig::from_json(&doc).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[test]
fn missing_required_field_is_rejected() {
    let doc = TWO_NODE_DOC.replace("\"sets\": 64,", "");
    let err = HierarchyConfig::from_json(&doc).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[test]
fn malformed_json_is_rejected() {
    let err = HierarchyConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}
