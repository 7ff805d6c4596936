//! Motor-drive layer for the AutoBlinds actuator.
//!
//! Two physical drive topologies are supported, selected once when the motor
//! is constructed and never per call:
//!
//! - [`ttl::TtlMotor`]: two-wire TTL bridge, full speed or coasting.
//! - [`sdm::SdmMotor`]: one direction pin plus a sigma-delta speed channel,
//!   with duty control via the [`density`] encoder.
//! - [`NullMotor`]: no hardware at all, for boards built without a motor.
//!
//! All variants expose the uniform [`BdcMotor`] contract. Commands are
//! received via `MOTOR_CHANNEL` and executed by [`MechanicsController`];
//! errors stop at that boundary and are logged, never propagated further.

pub mod density;
pub mod sdm;
pub mod ttl;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

/// Channel used to receive motor commands (`MotorCommand` messages).
pub static MOTOR_CHANNEL: embassy_sync::channel::Channel<CriticalSectionRawMutex, MotorCommand, 16> =
    embassy_sync::channel::Channel::new();

/// Errors surfaced by the motor drivers.
///
/// Creation-time failures (`InvalidArgument`, `ResourceExhausted`,
/// `PeripheralConfigFailed`) are not retryable and leave no bound hardware
/// behind. `IoFailure` is a runtime write rejection; this layer never retries
/// it, the caller decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// A configuration value was rejected (e.g. duty above 100).
    InvalidArgument,
    /// The underlying peripheral service has no free resources left.
    ResourceExhausted,
    /// Pin or channel setup was rejected by the hardware layer.
    PeripheralConfigFailed,
    /// A configured resource rejected a runtime level/density write.
    IoFailure,
}

/// Observable drive state of a motor.
///
/// The TTL topology always reports duty 100 while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    /// No drive output.
    Idle,
    /// Spinning clockwise at the given duty percentage.
    RunningCw { duty: u8 },
    /// Spinning counter-clockwise at the given duty percentage.
    RunningCcw { duty: u8 },
}

impl Default for MotorState {
    fn default() -> Self {
        MotorState::Idle
    }
}

/// Uniform run/stop/timed-run contract over every motor topology.
///
/// `duty` is a percentage in `0..=100`; `None` means "use the driver's
/// default" (the TTL topology ignores it entirely). Each motor has exactly
/// one logical owner; the `&mut` receivers enforce that, and no method here
/// performs internal locking.
pub trait BdcMotor {
    /// Spin the motor clockwise.
    fn run_cw(&mut self, duty: Option<u8>) -> Result<(), MotorError>;

    /// Spin the motor counter-clockwise.
    fn run_ccw(&mut self, duty: Option<u8>) -> Result<(), MotorError>;

    /// Cut the drive output.
    fn stop(&mut self) -> Result<(), MotorError>;

    /// Current drive state.
    fn state(&self) -> MotorState;

    /// Run clockwise for `duration_ms`, then stop.
    ///
    /// The delay always elapses in full and the stop is always attempted,
    /// even when the run transition itself failed. Blocks the calling
    /// context through `delay`.
    fn run_cw_timed(
        &mut self,
        duty: Option<u8>,
        duration_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<(), MotorError>
    where
        Self: Sized,
    {
        let ran = self.run_cw(duty);
        delay.delay_ms(duration_ms);
        let stopped = self.stop();
        ran.and(stopped)
    }

    /// Run counter-clockwise for `duration_ms`, then stop.
    ///
    /// Same unconditional-stop policy as [`BdcMotor::run_cw_timed`].
    fn run_ccw_timed(
        &mut self,
        duty: Option<u8>,
        duration_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<(), MotorError>
    where
        Self: Sized,
    {
        let ran = self.run_ccw(duty);
        delay.delay_ms(duration_ms);
        let stopped = self.stop();
        ran.and(stopped)
    }
}

/// Motor driver for boards built without a motor.
///
/// Accepts every command and tracks the state machine without touching any
/// hardware.
#[derive(Debug, Default)]
pub struct NullMotor {
    state: MotorState,
}

impl NullMotor {
    /// Create an idle null motor.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BdcMotor for NullMotor {
    fn run_cw(&mut self, duty: Option<u8>) -> Result<(), MotorError> {
        self.state = MotorState::RunningCw {
            duty: duty.unwrap_or(100).min(100),
        };
        Ok(())
    }

    fn run_ccw(&mut self, duty: Option<u8>) -> Result<(), MotorError> {
        self.state = MotorState::RunningCcw {
            duty: duty.unwrap_or(100).min(100),
        };
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.state = MotorState::Idle;
        Ok(())
    }

    fn state(&self) -> MotorState {
        self.state
    }
}

/// Motor command variants for the blind actuator.
///
/// Serialized as JSON with tag `"mc"`. `d` is an optional duty percentage
/// (defaulted by the driver when absent), `ms` a blocking run duration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "mc", rename_all = "snake_case")]
pub enum MotorCommand {
    /// Spin clockwise.
    Cw { d: Option<u8> },
    /// Spin counter-clockwise.
    Ccw { d: Option<u8> },
    /// Cut the drive output.
    Stop,
    /// Spin clockwise for `ms` milliseconds, then stop.
    CwTimed { d: Option<u8>, ms: u32 },
    /// Spin counter-clockwise for `ms` milliseconds, then stop.
    CcwTimed { d: Option<u8>, ms: u32 },
}

/// Command executor that owns one motor and the delay primitive for timed
/// runs.
///
/// The async receive loop is the only task allowed to touch the motor; the
/// outer loop just posts to `MOTOR_CHANNEL`.
pub struct MechanicsController<M, D> {
    motor: M,
    delay: D,
}

impl<M, D> MechanicsController<M, D>
where
    M: BdcMotor,
    D: DelayNs,
{
    /// Take ownership of a constructed motor and a delay provider.
    pub fn new(motor: M, delay: D) -> Self {
        Self { motor, delay }
    }

    /// Borrow the owned motor, e.g. for state reporting.
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Execute one command against the owned motor.
    ///
    /// Timed commands block the calling context for their full duration.
    pub fn execute_command(&mut self, command: MotorCommand) -> Result<(), MotorError> {
        match command {
            MotorCommand::Cw { d } => self.motor.run_cw(d),
            MotorCommand::Ccw { d } => self.motor.run_ccw(d),
            MotorCommand::Stop => self.motor.stop(),
            MotorCommand::CwTimed { d, ms } => self.motor.run_cw_timed(d, ms, &mut self.delay),
            MotorCommand::CcwTimed { d, ms } => self.motor.run_ccw_timed(d, ms, &mut self.delay),
        }
    }

    /// Receive and execute commands from `MOTOR_CHANNEL` forever.
    ///
    /// Motor errors are logged here and do not escape the loop.
    pub async fn motor_ch(&mut self) -> ! {
        loop {
            let command = MOTOR_CHANNEL.receiver().receive().await;
            tracing::info!("Received motor command: {:?}", command);
            match self.execute_command(command) {
                Ok(()) => tracing::info!("Motor state: {:?}", self.motor.state()),
                Err(err) => tracing::error!("Motor command failed: {:?}", err),
            }
        }
    }
}
