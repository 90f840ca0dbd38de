//! Fluent builder for constructing a [`MotionSimulator`].

use std::sync::Arc;

use bt_core::MotionConfig;
use bt_route::{RouteProvider, RouteTable};

use crate::{MotionSimulator, SimResult};

/// Fluent builder for [`MotionSimulator<P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method       | Default                  |
/// |--------------|--------------------------|
/// | `.config(c)` | `MotionConfig::default()` |
/// | `.table(t)`  | `RouteTable::empty()`     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimulatorBuilder::new(StraightLineProvider::default())
///     .config(MotionConfig { progress_step: 0.05, ..Default::default() })
///     .table(table)
///     .build()?;
/// let initial = sim.start(vehicles, center, NoopObserver).await?;
/// ```
pub struct SimulatorBuilder<P: RouteProvider> {
    provider: Arc<P>,
    config:   MotionConfig,
    table:    Option<Arc<RouteTable>>,
}

impl<P: RouteProvider> SimulatorBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self::with_shared_provider(Arc::new(provider))
    }

    /// Use a provider already shared with other simulators (one HTTP client
    /// for every session, for example).
    pub fn with_shared_provider(provider: Arc<P>) -> Self {
        Self {
            provider,
            config: MotionConfig::default(),
            table:  None,
        }
    }

    pub fn config(mut self, config: MotionConfig) -> Self {
        self.config = config;
        self
    }

    /// Supply predefined line endpoints.  Accepts an owned table or one
    /// already shared behind an `Arc`.
    pub fn table(mut self, table: impl Into<Arc<RouteTable>>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Validate the configuration and build the simulator.
    pub fn build(self) -> SimResult<MotionSimulator<P>> {
        self.config.validate()?;
        let table = self.table.unwrap_or_else(|| Arc::new(RouteTable::empty()));
        Ok(MotionSimulator::from_parts(self.config, self.provider, table))
    }
}
