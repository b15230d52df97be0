use std::sync::Arc;

use blockwatch_domain::services::telemetry::TelemetryGuard;
use blockwatch_domain::Registry;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    telemetry: TelemetryGuard,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, telemetry: TelemetryGuard) -> Self {
        Self {
            registry,
            telemetry,
        }
    }

    pub fn registry(&self) -> &Registry {
        self.registry.as_ref()
    }

    pub fn telemetry(&self) -> &TelemetryGuard {
        &self.telemetry
    }
}
