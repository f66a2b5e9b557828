pub mod limit_switches;
pub mod settings;
pub mod state;
pub mod status;

pub use limit_switches::LimitSwitches;
pub use settings::MotionSettings;
pub use state::MotionState;
pub use status::AxisStatus;
