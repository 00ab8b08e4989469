//! Data-source bundle handed to the dispatcher.

use std::sync::Arc;

use crate::ports::{PermitPort, WastePort};

/// Ports backing the intent handlers.
pub struct Backends {
    /// Waste pickup schedule lookup.
    pub waste: Arc<dyn WastePort>,
    /// Building permit lookup.
    pub permits: Arc<dyn PermitPort>,
}

impl Backends {
    /// Bundle the given ports.
    #[must_use]
    pub fn new(waste: Arc<dyn WastePort>, permits: Arc<dyn PermitPort>) -> Self {
        Self { waste, permits }
    }

    /// Endpoints of all ports as `(name, url)` pairs, for startup logging.
    #[must_use]
    pub fn endpoints(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("waste", self.waste.endpoint()),
            ("permits", self.permits.endpoint()),
        ]
    }
}
