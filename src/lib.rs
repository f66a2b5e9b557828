pub mod adapter;
pub mod axis;
pub mod client;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod transport;

pub use client::DeviceClient;
pub use error::ClientError;
