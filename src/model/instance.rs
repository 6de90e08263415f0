// One running copy of an application.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::application_id::ApplicationId;
use super::numeric::Accumulator;
use super::rds::Rds;
use super::status::Status;
use super::volume::Volume;
use crate::timeseries::TimeSeries;

/// Identity of an instance within a world: owning application plus instance name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct InstanceKey {
    pub app: ApplicationId,
    pub name: String,
}

impl InstanceKey {
    pub fn new(app: ApplicationId, name: impl Into<String>) -> Self {
        Self {
            app,
            name: name.into(),
        }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Listen {
    pub ip: String,
    pub port: String,
}

/// Observed outbound dependency. `remote` may be unresolved under partial data.
#[derive(Debug, Clone, Default)]
pub struct Upstream {
    pub remote: Option<InstanceKey>,
    pub status: Status,
    pub rtt: Option<TimeSeries>,
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub owner_id: ApplicationId,
    /// Key into the world's nodes.
    pub node: Option<String>,
    pub volumes: Vec<Volume>,
    pub upstreams: Vec<Upstream>,
    pub tcp_listens: BTreeSet<Listen>,
    pub rds: Option<Rds>,
    /// Per-bucket message counts keyed by level.
    pub log_messages: BTreeMap<String, Accumulator>,
    obsolete: bool,
}

impl Instance {
    pub fn new(owner_id: ApplicationId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner_id,
            node: None,
            volumes: Vec::new(),
            upstreams: Vec::new(),
            tcp_listens: BTreeSet::new(),
            rds: None,
            log_messages: BTreeMap::new(),
            obsolete: false,
        }
    }

    pub fn key(&self) -> InstanceKey {
        InstanceKey::new(self.owner_id.clone(), self.name.clone())
    }

    /// No longer live but retained for historical linkage.
    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn set_obsolete(&mut self, obsolete: bool) {
        self.obsolete = obsolete;
    }

    pub fn add_upstream(&mut self, upstream: Upstream) -> &mut Upstream {
        self.upstreams.push(upstream);
        let last = self.upstreams.len() - 1;
        &mut self.upstreams[last]
    }
}
