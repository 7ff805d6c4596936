//! Variable-speed brushed-DC motor driver over a sigma-delta speed channel.
//!
//! One GPIO selects the rotation direction and one sigma-delta-modulated
//! output approximates an analog drive level. The channel is abstracted
//! behind [`SdmChannel`] so the driver can run against real hardware or the
//! recording fakes used in `tests/`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use super::density::DensityMap;
use super::{BdcMotor, MotorError, MotorState};

/// Default sample rate the speed channel is bound at, in Hz.
///
/// 1 MHz matched the observed motor; it is a tunable default, not a
/// universal constant.
pub const SDM_SAMPLE_RATE_HZ: u32 = 1_000_000;

/// Pulse-density output service consumed by [`SdmMotor`].
///
/// Implementations wrap one hardware sigma-delta channel. `bind` claims the
/// peripheral and starts it at the given sample rate; `release` is its
/// inverse and must be safe to call after a failed `bind`.
pub trait SdmChannel {
    /// Claim the channel peripheral and start it at `sample_rate_hz`.
    fn bind(&mut self, sample_rate_hz: u32) -> Result<(), MotorError>;

    /// Stop the channel and release the peripheral.
    fn release(&mut self) -> Result<(), MotorError>;

    /// Update the signed pulse density of a bound channel.
    fn set_pulse_density(&mut self, density: i8) -> Result<(), MotorError>;
}

impl<T: SdmChannel + ?Sized> SdmChannel for &mut T {
    fn bind(&mut self, sample_rate_hz: u32) -> Result<(), MotorError> {
        T::bind(self, sample_rate_hz)
    }

    fn release(&mut self) -> Result<(), MotorError> {
        T::release(self)
    }

    fn set_pulse_density(&mut self, density: i8) -> Result<(), MotorError> {
        T::set_pulse_density(self, density)
    }
}

/// Immutable creation parameters for an [`SdmMotor`].
///
/// Validated once in [`SdmMotor::new`] and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdmMotorConfig {
    /// Direction-pin level that spins the motor clockwise.
    pub cw_lvl: bool,
    /// Duty percentage used when a command carries no explicit duty.
    pub default_duty: u8,
    /// Sample rate the speed channel is bound at.
    pub sample_rate_hz: u32,
    /// Duty-to-density calibration for this board revision.
    pub density: DensityMap,
}

impl Default for SdmMotorConfig {
    fn default() -> Self {
        Self {
            cw_lvl: true,
            default_duty: 50,
            sample_rate_hz: SDM_SAMPLE_RATE_HZ,
            density: DensityMap::GENERIC,
        }
    }
}

/// Variable-speed brushed-DC motor: one direction pin plus one bound
/// sigma-delta speed channel.
///
/// The direction pin is always written *before* the density so the channel
/// never drives current through a stale direction.
pub struct SdmMotor<P, C> {
    dir: P,
    channel: C,
    cw_lvl: bool,
    default_duty: u8,
    density: DensityMap,
    state: MotorState,
}

impl<P, C> SdmMotor<P, C>
where
    P: OutputPin,
    C: SdmChannel,
{
    /// Validate `config`, bind the speed channel, and return the motor in a
    /// safe idle state (direction pin low, off density on the channel).
    ///
    /// On any intermediate failure every resource acquired so far is
    /// released before the error is returned; a partially-initialized motor
    /// is never observable.
    pub fn new(config: SdmMotorConfig, mut dir: P, mut channel: C) -> Result<Self, MotorError> {
        if config.default_duty > 100 {
            tracing::error!("default duty {} out of range", config.default_duty);
            return Err(MotorError::InvalidArgument);
        }

        dir.set_low().map_err(|err| {
            tracing::error!("direction pin setup failed: {:?}", err);
            MotorError::PeripheralConfigFailed
        })?;

        channel.bind(config.sample_rate_hz)?;
        if let Err(err) = channel.set_pulse_density(config.density.off(false)) {
            let _ = channel.release();
            return Err(err);
        }

        Ok(Self {
            dir,
            channel,
            cw_lvl: config.cw_lvl,
            default_duty: config.default_duty,
            density: config.density,
            state: MotorState::Idle,
        })
    }

    /// Duty percentage substituted when a command carries none.
    pub fn default_duty(&self) -> u8 {
        self.default_duty
    }

    /// Spin clockwise at `duty` percent (clamped to 100).
    pub fn run_cw(&mut self, duty: u8) -> Result<(), MotorError> {
        let duty = duty.min(100);
        self.drive(self.cw_lvl, duty)?;
        self.state = MotorState::RunningCw { duty };
        Ok(())
    }

    /// Spin counter-clockwise at `duty` percent (clamped to 100).
    pub fn run_ccw(&mut self, duty: u8) -> Result<(), MotorError> {
        let duty = duty.min(100);
        self.drive(!self.cw_lvl, duty)?;
        self.state = MotorState::RunningCcw { duty };
        Ok(())
    }

    /// Drop the direction pin and feed the channel the off density.
    pub fn stop(&mut self) -> Result<(), MotorError> {
        self.dir.set_low().map_err(dir_write_failed)?;
        self.channel.set_pulse_density(self.density.off(false))?;
        self.state = MotorState::Idle;
        Ok(())
    }

    /// Run clockwise at the stored default duty for `duration_ms`, then stop.
    pub fn run_cw_default_timed(
        &mut self,
        duration_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<(), MotorError> {
        BdcMotor::run_cw_timed(self, None, duration_ms, delay)
    }

    /// Run counter-clockwise at the stored default duty for `duration_ms`,
    /// then stop.
    pub fn run_ccw_default_timed(
        &mut self,
        duration_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<(), MotorError> {
        BdcMotor::run_ccw_timed(self, None, duration_ms, delay)
    }

    /// Tear down the driver: best-effort stop, release the channel, and
    /// hand the hardware resources back to the caller.
    pub fn release(mut self) -> (P, C) {
        let _ = self.stop();
        let _ = self.channel.release();
        (self.dir, self.channel)
    }

    // Direction first; a failed direction write skips the density update.
    fn drive(&mut self, level: bool, duty: u8) -> Result<(), MotorError> {
        self.dir
            .set_state(PinState::from(level))
            .map_err(dir_write_failed)?;
        self.channel
            .set_pulse_density(self.density.density(level, duty))?;
        Ok(())
    }
}

fn dir_write_failed<E: core::fmt::Debug>(err: E) -> MotorError {
    tracing::warn!("direction pin write failed: {:?}", err);
    MotorError::IoFailure
}

impl<P, C> BdcMotor for SdmMotor<P, C>
where
    P: OutputPin,
    C: SdmChannel,
{
    fn run_cw(&mut self, duty: Option<u8>) -> Result<(), MotorError> {
        SdmMotor::run_cw(self, duty.unwrap_or(self.default_duty))
    }

    fn run_ccw(&mut self, duty: Option<u8>) -> Result<(), MotorError> {
        SdmMotor::run_ccw(self, duty.unwrap_or(self.default_duty))
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        SdmMotor::stop(self)
    }

    fn state(&self) -> MotorState {
        self.state
    }
}
