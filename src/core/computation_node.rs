// Copyright @yucwang 2021

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique default ID for a computation node.
pub fn generate_node_id(type_name: &str) -> String {
    let seq = NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", type_name, seq)
}

/// Named scene object: sensors, sky emitters and integrators. Ids come from
/// the `id` attribute of the scene file or `generate_node_id`.
pub trait ComputationNode {
    fn id(&self) -> &str;

    // One-line description used in logs.
    fn to_string(&self) -> String;
}
