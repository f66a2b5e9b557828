pub mod config;
pub mod virtual_zero;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::axis::{AxisStatus, MotionSettings};
use crate::client::{ApplyOutcome, DeviceClient};
use crate::error::ClientError;
pub use config::MonitorConfig;
pub use virtual_zero::VirtualZeroMap;

/// One axis's values from one tick. A field is `None` exactly when its
/// read failed; the matching error is in `MonitorTick::errors`.
#[derive(Debug, Clone)]
pub struct AxisReading {
    pub axis: usize,
    pub position: Option<f64>,
    pub virtual_position: Option<f64>,
    pub distance_to_target: Option<f64>,
    pub status: Option<AxisStatus>,
    pub temperature: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// An error the monitor suppressed to keep the rest of the tick going.
/// Recorded so front ends can flag the exact axis and field.
#[derive(Debug, Clone)]
pub struct TickError {
    pub axis: usize,
    pub field: &'static str,
    pub error: ClientError,
}

#[derive(Debug, Clone)]
pub struct MonitorTick {
    pub readings: Vec<AxisReading>,
    pub errors: Vec<TickError>,
}

/// Periodic refresh across all axes with per-axis and per-field fault
/// isolation: a failed read never suppresses the other reads of the same
/// axis, and a faulty axis never suppresses the remaining axes.
///
/// Both front ends consume this object: it owns the virtual-zero map and
/// exposes the move/stop/apply-settings passthroughs, so presentation
/// layers hold display state only.
pub struct AxisMonitor {
    client: Arc<DeviceClient>,
    offsets: VirtualZeroMap,
    targets: RwLock<HashMap<usize, f64>>,
    tick_tx: broadcast::Sender<MonitorTick>,
    config: MonitorConfig,
}

impl AxisMonitor {
    pub fn new(client: Arc<DeviceClient>, offsets: VirtualZeroMap, config: MonitorConfig) -> Self {
        let (tick_tx, _) = broadcast::channel(config.channel_capacity);
        Self {
            client,
            offsets,
            targets: RwLock::new(HashMap::new()),
            tick_tx,
            config,
        }
    }

    pub fn client(&self) -> &Arc<DeviceClient> {
        &self.client
    }

    pub fn offsets(&self) -> &VirtualZeroMap {
        &self.offsets
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MonitorTick> {
        self.tick_tx.subscribe()
    }

    /// Reads position, state and temperature for every axis, publishes
    /// the tick to subscribers and returns it.
    pub async fn tick(&self) -> MonitorTick {
        let mut readings = Vec::with_capacity(self.client.axis_count());
        let mut errors = Vec::new();

        for axis in 0..self.client.axis_count() {
            let mut reading = AxisReading {
                axis,
                position: None,
                virtual_position: None,
                distance_to_target: None,
                status: None,
                temperature: None,
                timestamp: Utc::now(),
            };

            match self.client.get_position(axis).await {
                Ok(position) => {
                    reading.position = Some(position);
                    reading.virtual_position = Some(self.offsets.to_virtual(axis, position).await);
                    if let Some(target) = self.targets.read().await.get(&axis) {
                        reading.distance_to_target = Some(target - position);
                    }
                }
                Err(error) => errors.push(TickError {
                    axis,
                    field: "position",
                    error,
                }),
            }

            match self.client.get_state(axis).await {
                Ok(status) => reading.status = Some(status),
                Err(error) => errors.push(TickError {
                    axis,
                    field: "state",
                    error,
                }),
            }

            match self.client.get_temperature(axis).await {
                Ok(temperature) => reading.temperature = Some(temperature),
                Err(error) => errors.push(TickError {
                    axis,
                    field: "temperature",
                    error,
                }),
            }

            readings.push(reading);
        }

        for e in &errors {
            debug!(axis = e.axis, field = e.field, error = %e.error, "tick read failed");
        }

        let tick = MonitorTick { readings, errors };
        // No subscribers is fine; the tick is also returned directly.
        let _ = self.tick_tx.send(tick.clone());
        tick
    }

    /// Runs the tick loop until `shutdown` fires.
    pub fn start(
        self: &Arc<Self>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(monitor.config.tick_interval);
            info!(interval = ?monitor.config.tick_interval, "axis monitor started");
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        monitor.tick().await;
                    }
                    _ = shutdown.recv() => {
                        info!("axis monitor shutting down");
                        break;
                    }
                }
            }
        })
    }

    /// Issues a move toward a target expressed in virtual coordinates and
    /// records it for distance-to-target reporting.
    pub async fn move_to(&self, axis: usize, virtual_target: f64) -> Result<(), ClientError> {
        let absolute = self.offsets.to_absolute(axis, virtual_target).await;
        self.client.move_axis(axis, absolute).await?;
        self.targets.write().await.insert(axis, absolute);
        Ok(())
    }

    pub async fn stop(&self, axis: usize) -> Result<(), ClientError> {
        self.client.stop(axis).await
    }

    pub async fn apply_settings(
        &self,
        axis: usize,
        settings: &MotionSettings,
    ) -> Result<ApplyOutcome, ClientError> {
        self.client.apply_settings(axis, settings).await
    }

    /// Declares the axis's current absolute position to be virtual zero
    /// and persists the offsets.
    pub async fn set_virtual_zero(&self, axis: usize) -> Result<(), ClientError> {
        let position = self.client.get_position(axis).await?;
        self.offsets.set_zero(axis, position).await;
        if let Err(e) = self.offsets.save().await {
            warn!(axis, error = %e, "failed to persist virtual-zero offsets");
        }
        Ok(())
    }

    pub async fn reset_virtual_zero(&self, axis: usize) {
        self.offsets.reset(axis).await;
        if let Err(e) = self.offsets.save().await {
            warn!(axis, error = %e, "failed to persist virtual-zero offsets");
        }
    }
}
