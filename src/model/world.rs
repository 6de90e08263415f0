// Entity store for one refresh cycle. Everything is get-or-create; cross-entity references
// (instance -> node, instance -> remote instance, node -> instances) are keys into these maps.

use std::collections::BTreeMap;

use super::application::Application;
use super::application_id::ApplicationId;
use super::instance::{Instance, InstanceKey};
use super::node::Node;

#[derive(Debug, Clone, Default)]
pub struct World {
    pub applications: BTreeMap<ApplicationId, Application>,
    pub nodes: BTreeMap<String, Node>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_application(&mut self, id: ApplicationId) -> &mut Application {
        self.applications
            .entry(id)
            .or_insert_with_key(|id| Application::new(id.clone()))
    }

    pub fn get_application(&self, id: &ApplicationId) -> Option<&Application> {
        self.applications.get(id)
    }

    pub fn get_or_create_instance(&mut self, id: ApplicationId, name: &str) -> &mut Instance {
        self.get_or_create_application(id).get_or_create_instance(name)
    }

    pub fn get_instance(&self, key: &InstanceKey) -> Option<&Instance> {
        self.applications.get(&key.app)?.instances.get(&key.name)
    }

    pub fn get_or_create_node(&mut self, key: &str) -> &mut Node {
        self.nodes
            .entry(key.to_string())
            .or_insert_with(|| Node::new(key))
    }

    pub fn get_node(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Node hosting `instance`, if it is known in this world.
    pub fn node_of(&self, instance: &Instance) -> Option<&Node> {
        self.nodes.get(instance.node.as_deref()?)
    }

    /// Get-or-create an instance together with the node hosting it. The instance is attached to
    /// `node_key` only if it has no node yet; the node records the instance as a back-reference.
    pub fn get_or_create_hosted_instance(
        &mut self,
        id: ApplicationId,
        name: &str,
        node_key: &str,
    ) -> (&mut Instance, &mut Node) {
        let World {
            applications,
            nodes,
        } = self;
        let instance = applications
            .entry(id)
            .or_insert_with_key(|id| Application::new(id.clone()))
            .get_or_create_instance(name);
        let node_key = instance.node.get_or_insert_with(|| node_key.to_string()).clone();
        let node = nodes
            .entry(node_key)
            .or_insert_with_key(|k| Node::new(k.clone()));
        node.instances.insert(instance.key());
        (instance, node)
    }

    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.applications
            .values()
            .flat_map(|app| app.instances.values())
    }

    pub fn instance_count(&self) -> usize {
        self.applications.values().map(|a| a.instances.len()).sum()
    }
}
