pub mod config;

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::axis::{AxisStatus, MotionSettings, MotionState};
use crate::error::ClientError;
use crate::protocol::response::ParseError;
use crate::protocol::{self, response, Command, Param, Property};
use crate::transport::{Channel, UnixChannel};
pub use config::ClientConfig;

/// Result of applying a whole settings block. The wire protocol has no
/// multi-field transaction, so some fields may land while others fail;
/// callers must treat each field as independently fallible.
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    pub applied: Vec<&'static str>,
    pub failed: Vec<(&'static str, ClientError)>,
}

impl ApplyOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Axis-indexed façade over the controller protocol. One instance owns
/// one channel; all exchanges are serialized through an internal mutex so
/// a monitor tick and a user command can never interleave on the wire.
pub struct DeviceClient {
    channel: Mutex<Box<dyn Channel>>,
    config: ClientConfig,
}

impl DeviceClient {
    pub fn new(config: ClientConfig) -> Self {
        let channel = UnixChannel::new(config.transport.clone());
        Self {
            channel: Mutex::new(Box::new(channel)),
            config,
        }
    }

    /// Builds a client over an arbitrary channel, used by tests to swap
    /// in doubles.
    pub fn with_channel(channel: Box<dyn Channel>, config: ClientConfig) -> Self {
        Self {
            channel: Mutex::new(channel),
            config,
        }
    }

    pub fn axis_count(&self) -> usize {
        self.config.axis_count
    }

    pub async fn disconnect(&self) {
        self.channel.lock().await.disconnect().await;
    }

    fn check_axis(&self, axis: usize) -> Result<(), ClientError> {
        if axis >= self.config.axis_count {
            return Err(ClientError::InvalidAxis {
                axis,
                axis_count: self.config.axis_count,
            });
        }
        Ok(())
    }

    /// The lock is held for exactly one exchange, then released so other
    /// callers (monitor ticks, waits on other tasks) can interleave.
    async fn exchange(&self, command: Command) -> Result<String, ClientError> {
        let wire = command.to_string();
        let mut channel = self.channel.lock().await;
        channel.exchange(&wire).await
    }

    async fn exchange_ack(&self, command: Command) -> Result<(), ClientError> {
        let wire = command.to_string();
        let reply = self.exchange(command).await?;
        if reply == protocol::ACK {
            Ok(())
        } else {
            Err(ClientError::CommandRejected {
                command: wire,
                reply,
            })
        }
    }

    async fn get(&self, axis: usize, property: Property) -> Result<String, ClientError> {
        self.check_axis(axis)?;
        self.exchange(Command::Get { axis, property }).await
    }

    async fn get_u32(&self, axis: usize, property: Property) -> Result<u32, ClientError> {
        let reply = self.get(axis, property).await?;
        let value = response::parse_integer(&reply)?;
        u32::try_from(value).map_err(|_| {
            ClientError::Parse(ParseError::OutOfRange {
                value: value.to_string(),
                reply,
            })
        })
    }

    /// Requests asynchronous motion toward `target`. Returns as soon as
    /// the controller acknowledges; it does not wait for completion.
    pub async fn move_axis(&self, axis: usize, target: f64) -> Result<(), ClientError> {
        self.check_axis(axis)?;
        info!(axis, target, "move requested");
        self.exchange_ack(Command::Move { axis, target }).await
    }

    /// Requests an immediate halt.
    pub async fn stop(&self, axis: usize) -> Result<(), ClientError> {
        self.check_axis(axis)?;
        info!(axis, "stop requested");
        self.exchange_ack(Command::Stop { axis }).await
    }

    pub async fn get_position(&self, axis: usize) -> Result<f64, ClientError> {
        let reply = self.get(axis, Property::Position).await?;
        Ok(response::parse_position(&reply)?)
    }

    pub async fn get_state(&self, axis: usize) -> Result<AxisStatus, ClientError> {
        let reply = self.get(axis, Property::State).await?;
        Ok(response::parse_state(&reply)?)
    }

    pub async fn get_temperature(&self, axis: usize) -> Result<i64, ClientError> {
        let reply = self.get(axis, Property::Temperature).await?;
        Ok(response::parse_integer(&reply)?)
    }

    pub async fn get_velocity(&self, axis: usize) -> Result<u32, ClientError> {
        self.get_u32(axis, Property::Velocity).await
    }

    pub async fn get_acceleration(&self, axis: usize) -> Result<u32, ClientError> {
        self.get_u32(axis, Property::Acceleration).await
    }

    pub async fn get_deceleration(&self, axis: usize) -> Result<u32, ClientError> {
        self.get_u32(axis, Property::Deceleration).await
    }

    pub async fn get_position_window(&self, axis: usize) -> Result<f64, ClientError> {
        let reply = self.get(axis, Property::PositionWindow).await?;
        Ok(response::parse_position(&reply)?)
    }

    pub async fn get_time_limit(&self, axis: usize) -> Result<Option<f64>, ClientError> {
        let reply = self.get(axis, Property::TimeLimit).await?;
        Ok(response::parse_optional_float(&reply)?)
    }

    pub async fn is_moving(&self, axis: usize) -> Result<bool, ClientError> {
        let reply = self.get(axis, Property::IsMoving).await?;
        Ok(response::parse_boolean(&reply)?)
    }

    pub async fn set_velocity(&self, axis: usize, velocity: u32) -> Result<(), ClientError> {
        self.set(axis, Param::Velocity(velocity)).await
    }

    pub async fn set_acceleration(
        &self,
        axis: usize,
        acceleration: u32,
    ) -> Result<(), ClientError> {
        self.set(axis, Param::Acceleration(acceleration)).await
    }

    pub async fn set_deceleration(
        &self,
        axis: usize,
        deceleration: u32,
    ) -> Result<(), ClientError> {
        self.set(axis, Param::Deceleration(deceleration)).await
    }

    pub async fn set_position_window(&self, axis: usize, window: f64) -> Result<(), ClientError> {
        self.set(axis, Param::PositionWindow(window)).await
    }

    pub async fn set_time_limit(&self, axis: usize, seconds: f64) -> Result<(), ClientError> {
        self.set(axis, Param::TimeLimit(seconds)).await
    }

    async fn set(&self, axis: usize, param: Param) -> Result<(), ClientError> {
        self.check_axis(axis)?;
        debug!(axis, param = param.wire_name(), "applying setting");
        self.exchange_ack(Command::Set { axis, param }).await
    }

    /// Reads the whole settings block, one query per field.
    pub async fn get_settings(&self, axis: usize) -> Result<MotionSettings, ClientError> {
        Ok(MotionSettings {
            velocity: self.get_velocity(axis).await?,
            acceleration: self.get_acceleration(axis).await?,
            deceleration: self.get_deceleration(axis).await?,
            position_window: self.get_position_window(axis).await?,
            time_limit: self.get_time_limit(axis).await?,
        })
    }

    /// Applies a settings block field by field. Every field is attempted
    /// even when an earlier one fails; the outcome lists both sides so
    /// partial application is visible to the caller.
    pub async fn apply_settings(
        &self,
        axis: usize,
        settings: &MotionSettings,
    ) -> Result<ApplyOutcome, ClientError> {
        self.check_axis(axis)?;

        let mut params = vec![
            Param::Velocity(settings.velocity),
            Param::Acceleration(settings.acceleration),
            Param::Deceleration(settings.deceleration),
            Param::PositionWindow(settings.position_window),
        ];
        if let Some(limit) = settings.time_limit {
            params.push(Param::TimeLimit(limit));
        }

        let mut outcome = ApplyOutcome::default();
        for param in params {
            let name = param.wire_name();
            match self.set(axis, param).await {
                Ok(()) => outcome.applied.push(name),
                Err(e) => {
                    warn!(axis, field = name, error = %e, "setting not applied");
                    outcome.failed.push((name, e));
                }
            }
        }
        Ok(outcome)
    }

    /// Polls the axis state at `poll_interval` cadence until it leaves
    /// `Moving` or `timeout` elapses. The channel lock is only held for
    /// the individual state queries, so monitor ticks keep flowing while
    /// a wait is in progress. A timeout only stops the waiting; the
    /// physical motion continues until `stop` is issued.
    pub async fn wait_for_motion_complete(
        &self,
        axis: usize,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<AxisStatus, ClientError> {
        self.check_axis(axis)?;
        let deadline = Instant::now() + timeout;

        loop {
            let status = self.get_state(axis).await?;
            if status.state != MotionState::Moving {
                debug!(axis, state = ?status.state, "motion complete");
                return Ok(status);
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(axis, ?timeout, "motion did not complete in time");
                return Err(ClientError::MotionTimeout { axis, timeout });
            }
            tokio::time::sleep(poll_interval.min(deadline - now)).await;
        }
    }

    /// `move_axis` then `wait_for_motion_complete`. The wait is never
    /// attempted when the move itself is refused.
    pub async fn move_and_wait(
        &self,
        axis: usize,
        target: f64,
        timeout: Duration,
    ) -> Result<AxisStatus, ClientError> {
        self.move_axis(axis, target).await?;
        self.wait_for_motion_complete(axis, timeout, self.config.poll_interval)
            .await
    }
}
