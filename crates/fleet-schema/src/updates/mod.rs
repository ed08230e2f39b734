//! The cluster schema update catalog.
//!
//! One module per step. Steps never change once released: a new structure
//! or data fix is always a new step appended at the end.

mod helpers;
mod v001_initial;
mod v002_operations;
mod v003_storage_volumes;
mod v004_storage_pools_nodes;
mod v005_replicate_remote_volumes;
mod v006_member_specific_config;
mod v007_operation_type;
mod v008_projects;
mod v009_instances;
mod v010_instance_snapshots;
mod v011_node_architecture;
mod v012_volume_snapshots;
mod v013_realign_volume_sequence;
mod v014_collapse_remote_volumes;
mod v015_certificate_restrictions;
mod v016_identities;

use crate::bootstrap::LegacyMarker;
use crate::step::Step;

/// Every step, in version order.
pub static UPDATES: &[Step] = &[
    Step::new(1, "initial", v001_initial::apply),
    Step::new(2, "operations", v002_operations::apply),
    Step::new(3, "storage_volumes", v003_storage_volumes::apply),
    Step::new(4, "storage_pools_nodes", v004_storage_pools_nodes::apply),
    Step::new(5, "replicate_remote_volumes", v005_replicate_remote_volumes::apply),
    Step::new(6, "member_specific_config", v006_member_specific_config::apply),
    Step::new(7, "operation_type", v007_operation_type::apply),
    Step::new(8, "projects", v008_projects::apply),
    Step::new(9, "instances", v009_instances::apply),
    Step::new(10, "instance_snapshots", v010_instance_snapshots::apply),
    Step::new(11, "node_architecture", v011_node_architecture::apply),
    Step::new(12, "volume_snapshots", v012_volume_snapshots::apply),
    Step::new(13, "realign_volume_sequence", v013_realign_volume_sequence::apply),
    Step::new(14, "collapse_remote_volumes", v014_collapse_remote_volumes::apply),
    Step::new(15, "certificate_restrictions", v015_certificate_restrictions::apply),
    Step::new(16, "identities", v016_identities::apply),
];

/// Structure created by the versions that shipped before the ledger.
pub static LEGACY_MARKERS: &[LegacyMarker] = &[
    LegacyMarker {
        version: 1,
        tables: &[
            "nodes",
            "config",
            "certificates",
            "networks",
            "networks_config",
            "storage_pools",
            "storage_pools_config",
            "containers",
            "containers_config",
            "containers_devices",
            "containers_devices_config",
            "images",
            "images_aliases",
        ],
        columns: &[],
    },
    LegacyMarker {
        version: 2,
        tables: &["operations"],
        columns: &[],
    },
    LegacyMarker {
        version: 3,
        tables: &["storage_volumes", "storage_volumes_config"],
        columns: &[],
    },
    LegacyMarker {
        version: 4,
        tables: &["storage_pools_nodes"],
        columns: &[("storage_pools", "state")],
    },
];
