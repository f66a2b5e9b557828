use std::fmt;

/// Readable per-axis properties, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Position,
    State,
    Temperature,
    Velocity,
    Acceleration,
    Deceleration,
    PositionWindow,
    TimeLimit,
    IsMoving,
}

impl Property {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Property::Position => "position",
            Property::State => "state",
            Property::Temperature => "temperature",
            Property::Velocity => "velocity",
            Property::Acceleration => "acceleration",
            Property::Deceleration => "deceleration",
            Property::PositionWindow => "position_window",
            Property::TimeLimit => "time_limit",
            Property::IsMoving => "is_moving",
        }
    }
}

/// Writable per-axis parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param {
    Velocity(u32),
    Acceleration(u32),
    Deceleration(u32),
    PositionWindow(f64),
    TimeLimit(f64),
}

impl Param {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Param::Velocity(_) => "velocity",
            Param::Acceleration(_) => "acceleration",
            Param::Deceleration(_) => "deceleration",
            Param::PositionWindow(_) => "position_window",
            Param::TimeLimit(_) => "time_limit",
        }
    }

    fn wire_value(&self) -> String {
        match self {
            Param::Velocity(v) | Param::Acceleration(v) | Param::Deceleration(v) => v.to_string(),
            Param::PositionWindow(v) | Param::TimeLimit(v) => v.to_string(),
        }
    }
}

/// One outgoing command. `Display` renders the colon-separated wire form;
/// the protocol has no framing beyond that single line of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move { axis: usize, target: f64 },
    Stop { axis: usize },
    Get { axis: usize, property: Property },
    Set { axis: usize, param: Param },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { axis, target } => write!(f, "move:{}:{}", axis, target),
            Command::Stop { axis } => write!(f, "stop:{}", axis),
            Command::Get { axis, property } => write!(f, "get:{}:{}", axis, property.wire_name()),
            Command::Set { axis, param } => write!(
                f,
                "set:{}:{}:{}",
                axis,
                param.wire_name(),
                param.wire_value()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_wire_format() {
        let cmd = Command::Move {
            axis: 1,
            target: 12.5,
        };
        assert_eq!(cmd.to_string(), "move:1:12.5");
    }

    #[test]
    fn stop_wire_format() {
        assert_eq!(Command::Stop { axis: 3 }.to_string(), "stop:3");
    }

    #[test]
    fn get_wire_formats() {
        let cases = [
            (Property::Position, "get:0:position"),
            (Property::State, "get:0:state"),
            (Property::Temperature, "get:0:temperature"),
            (Property::PositionWindow, "get:0:position_window"),
            (Property::TimeLimit, "get:0:time_limit"),
            (Property::IsMoving, "get:0:is_moving"),
        ];
        for (property, expected) in cases {
            assert_eq!(Command::Get { axis: 0, property }.to_string(), expected);
        }
    }

    #[test]
    fn set_wire_formats() {
        let velocity = Command::Set {
            axis: 2,
            param: Param::Velocity(2000),
        };
        assert_eq!(velocity.to_string(), "set:2:velocity:2000");

        let window = Command::Set {
            axis: 2,
            param: Param::PositionWindow(0.001),
        };
        assert_eq!(window.to_string(), "set:2:position_window:0.001");
    }
}
