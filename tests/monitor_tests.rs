mod common;

use std::sync::Arc;

use slitrem::monitor::{AxisMonitor, MonitorConfig, VirtualZeroMap};
use slitrem::ClientError;

use common::{client_for, spawn_controller, ScriptReply};

fn script_healthy_except_axis2_temperature(cmd: &str) -> ScriptReply {
    let parts: Vec<&str> = cmd.split(':').collect();
    match (parts.first().copied(), parts.get(2).copied()) {
        (Some("get"), Some("position")) => ScriptReply::Now(format!("Position: {}.5", parts[1])),
        (Some("get"), Some("state")) => ScriptReply::now("State: (On, None)"),
        (Some("get"), Some("temperature")) if parts[1] == "2" => {
            ScriptReply::now("Error: sensor offline")
        }
        (Some("get"), Some("temperature")) => ScriptReply::now("Temperature: 21"),
        (Some("move"), _) => ScriptReply::now("OK"),
        _ => ScriptReply::Now(format!("Error: unexpected command {}", cmd)),
    }
}

#[tokio::test]
async fn one_failing_field_does_not_suppress_the_rest() {
    let controller = spawn_controller(script_healthy_except_axis2_temperature).await;
    let client = Arc::new(client_for(&controller.socket_path));
    let monitor = AxisMonitor::new(client, VirtualZeroMap::new(), MonitorConfig::default());

    let tick = monitor.tick().await;

    assert_eq!(tick.readings.len(), 4);
    for reading in &tick.readings {
        assert!(reading.position.is_some(), "axis {}", reading.axis);
        assert!(reading.status.is_some(), "axis {}", reading.axis);
        if reading.axis == 2 {
            assert!(reading.temperature.is_none());
        } else {
            assert_eq!(reading.temperature, Some(21));
        }
    }

    assert_eq!(tick.errors.len(), 1);
    let error = &tick.errors[0];
    assert_eq!(error.axis, 2);
    assert_eq!(error.field, "temperature");
    assert!(matches!(error.error, ClientError::Protocol(_)));
}

#[tokio::test]
async fn tick_reports_virtual_position_and_distance() {
    let controller = spawn_controller(|cmd| match cmd {
        cmd if cmd.starts_with("get:1:position") => ScriptReply::now("Position: 10.0"),
        cmd if cmd.starts_with("get") && cmd.ends_with("position") => {
            ScriptReply::now("Position: 0.0")
        }
        cmd if cmd.ends_with("state") => ScriptReply::now("State: (On, None)"),
        cmd if cmd.ends_with("temperature") => ScriptReply::now("Temperature: 20"),
        cmd if cmd.starts_with("move:1:8") => ScriptReply::now("OK"),
        other => ScriptReply::Now(format!("Error: unexpected command {}", other)),
    })
    .await;
    let client = Arc::new(client_for(&controller.socket_path));
    let monitor = AxisMonitor::new(client, VirtualZeroMap::new(), MonitorConfig::default());

    // Absolute position is 10.0; after zeroing, the virtual frame starts
    // there, and a virtual target of -2.0 is absolute 8.0.
    monitor.set_virtual_zero(1).await.unwrap();
    monitor.move_to(1, -2.0).await.unwrap();

    let tick = monitor.tick().await;
    assert!(tick.errors.is_empty(), "errors: {:?}", tick.errors);

    let reading = &tick.readings[1];
    assert_eq!(reading.position, Some(10.0));
    assert_eq!(reading.virtual_position, Some(0.0));
    assert_eq!(reading.distance_to_target, Some(-2.0));
}

#[tokio::test]
async fn virtual_zero_survives_reload() {
    let controller = spawn_controller(|cmd| match cmd {
        "get:0:position" => ScriptReply::now("Position: 3.25"),
        other => ScriptReply::Now(format!("Error: unexpected command {}", other)),
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let offsets_path = dir.path().join("offsets.json");

    let client = Arc::new(client_for(&controller.socket_path));
    let monitor = AxisMonitor::new(
        client,
        VirtualZeroMap::load(&offsets_path).await.unwrap(),
        MonitorConfig::default(),
    );
    monitor.set_virtual_zero(0).await.unwrap();
    drop(monitor);

    let restored = VirtualZeroMap::load(&offsets_path).await.unwrap();
    assert_eq!(restored.offset(0).await, 3.25);
    assert_eq!(restored.offset(1).await, 0.0);
}

#[tokio::test]
async fn ticks_fan_out_to_subscribers() {
    let controller = spawn_controller(script_healthy_except_axis2_temperature).await;
    let client = Arc::new(client_for(&controller.socket_path));
    let monitor = AxisMonitor::new(client, VirtualZeroMap::new(), MonitorConfig::default());

    let mut ticks = monitor.subscribe();
    monitor.tick().await;

    let received = ticks.recv().await.unwrap();
    assert_eq!(received.readings.len(), 4);
    assert_eq!(received.errors.len(), 1);
}
