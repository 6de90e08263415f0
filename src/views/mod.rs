// Read-only consumers of a published snapshot.

pub mod network;
pub mod node;
pub mod rds;

pub use network::{NetworkMap, UpstreamSummary, build_network_map, network};
pub use node::node;
pub use rds::rds;
