//! Scripted in-process controller for integration tests: a Unix socket
//! server that answers each received command through a test-supplied
//! closure, optionally after a delay.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use slitrem::client::{ClientConfig, DeviceClient};
use slitrem::transport::TransportConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tokio::sync::Mutex;

pub enum ScriptReply {
    Now(String),
    After(Duration, String),
}

impl ScriptReply {
    pub fn now(text: &str) -> Self {
        ScriptReply::Now(text.to_string())
    }
}

pub struct ScriptedController {
    pub socket_path: PathBuf,
    _dir: tempfile::TempDir,
}

/// Spawns the scripted controller. The returned handle keeps the socket's
/// temp directory alive; drop it to tear everything down.
pub async fn spawn_controller<F>(script: F) -> ScriptedController
where
    F: FnMut(&str) -> ScriptReply + Send + 'static,
{
    let dir = tempfile::tempdir().expect("tempdir");
    let socket_path = dir.path().join("controller.sock");
    let listener = UnixListener::bind(&socket_path).expect("bind test socket");
    let script = Arc::new(Mutex::new(script));

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let script = script.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                loop {
                    let n = match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => n,
                    };
                    let command = String::from_utf8_lossy(&buf[..n]).to_string();
                    let reply = {
                        let mut script = script.lock().await;
                        (*script)(&command)
                    };
                    let text = match reply {
                        ScriptReply::Now(text) => text,
                        ScriptReply::After(delay, text) => {
                            tokio::time::sleep(delay).await;
                            text
                        }
                    };
                    if socket.write_all(text.as_bytes()).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    ScriptedController {
        socket_path,
        _dir: dir,
    }
}

pub fn client_for(socket_path: &Path) -> DeviceClient {
    DeviceClient::new(ClientConfig {
        transport: TransportConfig {
            socket_path: socket_path.to_string_lossy().into_owned(),
            ..TransportConfig::default()
        },
        ..ClientConfig::default()
    })
}
