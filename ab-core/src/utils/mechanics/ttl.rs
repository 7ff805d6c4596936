//! Two-wire TTL bridge motor driver.
//!
//! This topology has no speed control: one pin exclusively high spins the
//! motor clockwise, the other exclusively high spins it counter-clockwise,
//! both low coasts it. Driving both pins high at once shorts the bridge, so
//! the pin sequencing here makes that state unreachable by construction.

use embedded_hal::digital::OutputPin;

use super::{BdcMotor, MotorError, MotorState};

/// Direction stage of the TTL topology: two output pins with a guaranteed
/// mutual-exclusion ordering.
///
/// Every transition drives the opposing pin low *before* raising its own, so
/// there is no instant at which both pins are high.
pub struct TtlBridge<P> {
    cw: P,
    ccw: P,
}

impl<P> TtlBridge<P>
where
    P: OutputPin,
{
    /// Take ownership of the two bridge pins and drive both low.
    ///
    /// A failure here is a wiring/configuration problem and is reported as
    /// [`MotorError::PeripheralConfigFailed`]; no bridge is returned.
    pub fn new(mut cw: P, mut ccw: P) -> Result<Self, MotorError> {
        cw.set_low().map_err(config_failed)?;
        ccw.set_low().map_err(config_failed)?;
        Ok(Self { cw, ccw })
    }

    /// Drive the clockwise pin exclusively high.
    pub fn assert_cw(&mut self) -> Result<(), MotorError> {
        self.ccw.set_low().map_err(write_failed)?;
        self.cw.set_high().map_err(write_failed)?;
        Ok(())
    }

    /// Drive the counter-clockwise pin exclusively high.
    pub fn assert_ccw(&mut self) -> Result<(), MotorError> {
        self.cw.set_low().map_err(write_failed)?;
        self.ccw.set_high().map_err(write_failed)?;
        Ok(())
    }

    /// Drive both pins low, coasting the motor.
    pub fn idle(&mut self) -> Result<(), MotorError> {
        self.cw.set_low().map_err(write_failed)?;
        self.ccw.set_low().map_err(write_failed)?;
        Ok(())
    }

    /// Release the pins back to the caller.
    pub fn release(self) -> (P, P) {
        (self.cw, self.ccw)
    }
}

fn config_failed<E: core::fmt::Debug>(err: E) -> MotorError {
    tracing::error!("bridge pin setup failed: {:?}", err);
    MotorError::PeripheralConfigFailed
}

fn write_failed<E: core::fmt::Debug>(err: E) -> MotorError {
    tracing::warn!("bridge pin write failed: {:?}", err);
    MotorError::IoFailure
}

/// Binary-speed brushed-DC motor over a [`TtlBridge`].
///
/// Runs at full speed or not at all; duty arguments on the
/// [`BdcMotor`] contract are ignored.
pub struct TtlMotor<P> {
    bridge: TtlBridge<P>,
    state: MotorState,
}

impl<P> TtlMotor<P>
where
    P: OutputPin,
{
    /// Bind the two bridge pins and leave the motor coasting.
    pub fn new(cw_pin: P, ccw_pin: P) -> Result<Self, MotorError> {
        let bridge = TtlBridge::new(cw_pin, ccw_pin)?;
        Ok(Self {
            bridge,
            state: MotorState::Idle,
        })
    }

    /// Spin clockwise at full speed.
    pub fn run_cw(&mut self) -> Result<(), MotorError> {
        self.bridge.assert_cw()?;
        self.state = MotorState::RunningCw { duty: 100 };
        Ok(())
    }

    /// Spin counter-clockwise at full speed.
    pub fn run_ccw(&mut self) -> Result<(), MotorError> {
        self.bridge.assert_ccw()?;
        self.state = MotorState::RunningCcw { duty: 100 };
        Ok(())
    }

    /// Coast the motor.
    pub fn stop(&mut self) -> Result<(), MotorError> {
        self.bridge.idle()?;
        self.state = MotorState::Idle;
        Ok(())
    }

    /// Tear down the driver, coasting the motor and returning the pins.
    pub fn release(mut self) -> (P, P) {
        let _ = self.stop();
        self.bridge.release()
    }
}

impl<P> BdcMotor for TtlMotor<P>
where
    P: OutputPin,
{
    fn run_cw(&mut self, _duty: Option<u8>) -> Result<(), MotorError> {
        TtlMotor::run_cw(self)
    }

    fn run_ccw(&mut self, _duty: Option<u8>) -> Result<(), MotorError> {
        TtlMotor::run_ccw(self)
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        TtlMotor::stop(self)
    }

    fn state(&self) -> MotorState {
        self.state
    }
}
