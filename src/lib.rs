pub mod api;
pub mod core;
pub mod presentation;
pub mod utils;

use std::sync::Arc;
use tracing::info;

use crate::{
    api::{ApiTransport, DashboardClient, HttpVerificationApi, VerificationApi},
    core::services::verification::VerificationFlowController,
    presentation::Presenter,
    utils::{config::Config, error::Result, metrics::{Metrics, MetricsSnapshot}},
};

pub struct Application {
    config: Arc<Config>,
    verification_api: Arc<dyn VerificationApi>,
    dashboard: DashboardClient,
    metrics: Arc<Metrics>,
}

impl Application {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let metrics = Arc::new(Metrics::new());

        info!("Initializing API transport for {}", config.api.base_url);
        let transport = ApiTransport::new(&config, metrics.clone())?;

        let verification_api: Arc<dyn VerificationApi> = Arc::new(HttpVerificationApi::new(transport.clone()));
        let dashboard = DashboardClient::new(transport, config.dashboard.recent_limit);

        Ok(Self {
            config,
            verification_api,
            dashboard,
            metrics,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A fresh verification session rendered through `presenter`.
    pub fn verification_flow(&self, presenter: Arc<dyn Presenter>) -> VerificationFlowController {
        VerificationFlowController::new(
            self.verification_api.clone(),
            presenter,
            self.config.verification.max_image_bytes,
        )
    }

    pub fn dashboard(&self) -> &DashboardClient {
        &self.dashboard
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn shutdown(&self) {
        self.metrics.log_summary();
        info!("Client shutdown complete");
    }
}
