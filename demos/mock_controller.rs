//! Simulated four-axis slit controller plus a client driving it.
//!
//! Serves the text protocol on a local Unix socket, then runs a
//! `DeviceClient` and `AxisMonitor` against it: applies settings, moves an
//! axis and waits for completion, sets a virtual zero and prints a tick.
//!
//! Run with: cargo run --example mock_controller

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use slitrem::axis::MotionSettings;
use slitrem::client::{ClientConfig, DeviceClient};
use slitrem::monitor::{AxisMonitor, MonitorConfig, VirtualZeroMap};
use slitrem::transport::TransportConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

const SOCKET_PATH: &str = "/tmp/slitrem_demo.sock";
const AXIS_COUNT: usize = 4;

struct SimAxis {
    position: f64,
    origin: f64,
    target: f64,
    move_started: Instant,
    move_duration: Duration,
    velocity: u32,
    acceleration: u32,
    deceleration: u32,
    position_window: f64,
    time_limit: Option<f64>,
    temperature: i64,
}

impl SimAxis {
    fn new(temperature: i64) -> Self {
        Self {
            position: 0.0,
            origin: 0.0,
            target: 0.0,
            move_started: Instant::now(),
            move_duration: Duration::ZERO,
            velocity: 2000,
            acceleration: 500,
            deceleration: 500,
            position_window: 0.001,
            time_limit: None,
            temperature,
        }
    }

    fn start_move(&mut self, target: f64) {
        let distance = (target - self.position).abs();
        let seconds = (distance * 1000.0 / self.velocity as f64).clamp(0.05, 5.0);
        self.origin = self.position;
        self.target = target;
        self.move_started = Instant::now();
        self.move_duration = Duration::from_secs_f64(seconds);
    }

    fn advance(&mut self) {
        if self.move_duration.is_zero() {
            return;
        }
        let elapsed = self.move_started.elapsed();
        if elapsed >= self.move_duration {
            self.position = self.target;
            self.move_duration = Duration::ZERO;
        } else {
            let fraction = elapsed.as_secs_f64() / self.move_duration.as_secs_f64();
            self.position = self.origin + (self.target - self.origin) * fraction;
        }
    }

    fn is_moving(&self) -> bool {
        !self.move_duration.is_zero()
    }

    fn stop(&mut self) {
        self.advance();
        self.move_duration = Duration::ZERO;
    }
}

type SharedAxes = Arc<Mutex<Vec<SimAxis>>>;

fn handle_command(axes: &mut [SimAxis], line: &str) -> String {
    let parts: Vec<&str> = line.trim().split(':').collect();
    let axis_index = parts
        .get(1)
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&i| i < AXIS_COUNT);
    let Some(index) = axis_index else {
        return "Error: unknown axis".to_string();
    };

    let axis = &mut axes[index];
    axis.advance();

    match (parts[0], parts.len()) {
        ("move", 3) => match parts[2].parse::<f64>() {
            Ok(target) => {
                axis.start_move(target);
                "OK".to_string()
            }
            Err(_) => "Error: invalid target".to_string(),
        },
        ("stop", 2) => {
            axis.stop();
            "OK".to_string()
        }
        ("get", 3) => match parts[2] {
            "position" => format!("Position: {}", axis.position),
            "state" => {
                let state = if axis.is_moving() { "Moving" } else { "On" };
                format!("State: ({}, None)", state)
            }
            "temperature" => format!("Temperature: {}", axis.temperature),
            "velocity" => format!("Velocity: {}", axis.velocity),
            "acceleration" => format!("Acceleration: {}", axis.acceleration),
            "deceleration" => format!("Deceleration: {}", axis.deceleration),
            "position_window" => format!("Position Window: {}", axis.position_window),
            "time_limit" => match axis.time_limit {
                Some(limit) => format!("Time Limit: {}", limit),
                None => "Time Limit: none".to_string(),
            },
            "is_moving" => format!("Is Moving: {}", axis.is_moving()),
            other => format!("Error: unknown property {}", other),
        },
        ("set", 4) => {
            let value = parts[3];
            let ok = match parts[2] {
                "velocity" => value.parse().map(|v| axis.velocity = v).is_ok(),
                "acceleration" => value.parse().map(|v| axis.acceleration = v).is_ok(),
                "deceleration" => value.parse().map(|v| axis.deceleration = v).is_ok(),
                "position_window" => value.parse().map(|v| axis.position_window = v).is_ok(),
                "time_limit" => value.parse().map(|v| axis.time_limit = Some(v)).is_ok(),
                _ => false,
            };
            if ok {
                "OK".to_string()
            } else {
                "Error: invalid parameter".to_string()
            }
        }
        _ => "Error: invalid command format".to_string(),
    }
}

async fn run_controller(axes: SharedAxes) -> Result<()> {
    if Path::new(SOCKET_PATH).exists() {
        tokio::fs::remove_file(SOCKET_PATH).await?;
    }
    let listener = UnixListener::bind(SOCKET_PATH)?;
    info!("simulated controller listening on {}", SOCKET_PATH);

    loop {
        let (mut socket, _) = listener.accept().await?;
        let axes = axes.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 1024];
            loop {
                match socket.read(&mut buffer).await {
                    Ok(0) => break,
                    Ok(n) => {
                        let command = String::from_utf8_lossy(&buffer[..n]).to_string();
                        debug!(%command, "controller received");
                        let reply = {
                            let mut axes = axes.lock().await;
                            handle_command(&mut axes, &command)
                        };
                        if socket.write_all(reply.as_bytes()).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("controller read error: {}", e);
                        break;
                    }
                }
            }
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let axes: SharedAxes = Arc::new(Mutex::new(
        (0..AXIS_COUNT).map(|i| SimAxis::new(20 + i as i64)).collect(),
    ));
    tokio::spawn(run_controller(axes));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = Arc::new(DeviceClient::new(ClientConfig {
        transport: TransportConfig {
            socket_path: SOCKET_PATH.to_string(),
            ..TransportConfig::default()
        },
        axis_count: AXIS_COUNT,
        poll_interval: Duration::from_millis(50),
    }));

    let monitor = Arc::new(AxisMonitor::new(
        client.clone(),
        VirtualZeroMap::new(),
        MonitorConfig::default(),
    ));
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
    let monitor_task = monitor.start(shutdown_rx);

    let settings = MotionSettings::default().with_velocity(4000);
    let outcome = client.apply_settings(1, &settings).await?;
    info!(applied = ?outcome.applied, failed = outcome.failed.len(), "settings applied");

    info!("moving axis 1 to 12.5 and waiting");
    let status = client
        .move_and_wait(1, 12.5, Duration::from_secs(10))
        .await?;
    let position = client.get_position(1).await?;
    info!(?status, position, "move finished");

    monitor.set_virtual_zero(1).await?;
    monitor.move_to(1, -2.0).await?;
    client
        .wait_for_motion_complete(1, Duration::from_secs(10), Duration::from_millis(50))
        .await?;

    let tick = monitor.tick().await;
    for reading in &tick.readings {
        info!(
            axis = reading.axis,
            position = ?reading.position,
            virtual_position = ?reading.virtual_position,
            temperature = ?reading.temperature,
            "axis reading"
        );
    }

    let _ = shutdown_tx.send(());
    let _ = monitor_task.await;
    client.disconnect().await;
    tokio::fs::remove_file(SOCKET_PATH).await.ok();
    info!("demo complete");
    Ok(())
}
