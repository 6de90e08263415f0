// Logical workload owning its instances by name.

use std::collections::BTreeMap;

use super::application_id::ApplicationId;
use super::instance::Instance;

#[derive(Debug, Clone)]
pub struct Application {
    pub id: ApplicationId,
    pub instances: BTreeMap<String, Instance>,
}

impl Application {
    pub fn new(id: ApplicationId) -> Self {
        Self {
            id,
            instances: BTreeMap::new(),
        }
    }

    pub fn get_or_create_instance(&mut self, name: &str) -> &mut Instance {
        let owner = &self.id;
        self.instances
            .entry(name.to_string())
            .or_insert_with(|| Instance::new(owner.clone(), name))
    }

    pub fn get_instance(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }
}
