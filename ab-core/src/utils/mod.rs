//! Utility re-exports and helper macros for the AutoBlinds actuator.
//!
//! This module re-exports the motor-drive layer and provides a helper macro
//! for static initialization:
//!
//! - `mechanics`: brushed-DC motor drivers (TTL bridge and sigma-delta speed
//!   channel topologies), the pulse-density encoder, and the command-channel
//!   controller that sits between the outer task loop and the hardware
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod mechanics;

pub use mechanics::{BdcMotor, MechanicsController, MotorCommand, MotorError, MOTOR_CHANNEL};

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
