// Topology edges between instances, annotated with the nodes hosting them.
// Links are identified by their full key; re-adding a link updates it in place.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{ApplicationId, Node, Status};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DependencyMapInstance {
    pub app: ApplicationId,
    pub name: String,
    pub obsolete: bool,
}

/// Point-in-time location of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DependencyMapNode {
    pub name: String,
    pub provider: String,
    pub region: String,
    pub az: String,
}

impl From<&Node> for DependencyMapNode {
    fn from(n: &Node) -> Self {
        Self {
            name: n.name.value().to_string(),
            provider: n.cloud_provider.value().to_string(),
            region: n.region.value().to_string(),
            az: n.availability_zone.value().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyMapLink {
    pub src_instance: DependencyMapInstance,
    pub src_node: DependencyMapNode,
    pub dst_instance: DependencyMapInstance,
    pub dst_node: DependencyMapNode,
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyMap {
    links: BTreeSet<DependencyMapLink>,
}

impl DependencyMap {
    /// Returns true when the link was not present yet.
    pub fn update_link(
        &mut self,
        src_instance: DependencyMapInstance,
        src_node: DependencyMapNode,
        dst_instance: DependencyMapInstance,
        dst_node: DependencyMapNode,
        status: Status,
    ) -> bool {
        self.links.insert(DependencyMapLink {
            src_instance,
            src_node,
            dst_instance,
            dst_node,
            status,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = &DependencyMapLink> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
