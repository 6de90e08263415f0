// Topology model: identities, entities and the per-cycle world graph.

mod application;
mod application_id;
mod attribute;
mod instance;
mod node;
mod numeric;
mod rds;
mod status;
mod volume;
mod world;

use crate::timeseries::{Context, Timestamp};

pub use application::Application;
pub use application_id::{ApplicationId, ApplicationKind, IdError, normalize};
pub use attribute::Attribute;
pub use instance::{Instance, InstanceKey, Listen, Upstream};
pub use node::{DiskStats, InterfaceStats, Node};
pub use numeric::{Accumulator, Gauge};
pub use rds::Rds;
pub use status::Status;
pub use volume::{Ebs, Volume};
pub use world::World;

/// Immutable result of one refresh cycle, shared read-only with every consumer.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub world: World,
    /// Window the cycle queried; the default context for consumers that don't pass one.
    pub ctx: Context,
    pub built_at: Timestamp,
}
