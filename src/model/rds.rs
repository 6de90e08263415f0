// Managed-database record attached to an instance.

use super::attribute::Attribute;
use super::numeric::Gauge;

#[derive(Debug, Clone, Default)]
pub struct Rds {
    pub engine: Attribute,
    pub engine_version: Attribute,
    pub status: Attribute,
    /// "true"/"false", kept as an attribute so the latest sample decides.
    pub multi_az: Attribute,
    pub life_span: Gauge,
}

impl Rds {
    pub fn is_multi_az(&self) -> bool {
        self.multi_az.value() == "true"
    }
}
