use ab_core::mk_static;
use ab_core::utils::mechanics::sdm::{SdmChannel, SdmMotor, SdmMotorConfig};
use ab_core::utils::mechanics::ttl::TtlMotor;
use ab_core::utils::mechanics::{
    MechanicsController, MotorCommand, MotorError, NullMotor, MOTOR_CHANNEL,
};
use clap::Parser;
use embassy_executor::{Executor, Spawner};
use embassy_time::{Delay, Timer};
use std::convert::Infallible;
use tracing::{error, info};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// Drive topology to emulate: "sdm", "ttl", or "none"
    #[clap(long, default_value = "sdm")]
    topology: String,
    /// Duty sweep step per blink cycle (SDM topology)
    #[clap(long, default_value_t = 5)]
    step: u8,
    /// Milliseconds per timed run and per pause
    #[clap(long, default_value_t = 2000)]
    period_ms: u32,
    /// One-shot JSON command posted before the sweep, e.g. '{"mc":"cw","d":60}'
    #[clap(long)]
    command: Option<String>,
}

/// Output pin that logs level changes to the console.
struct ConsolePin(&'static str);

impl embedded_hal::digital::ErrorType for ConsolePin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for ConsolePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        info!("PIN {}: LOW", self.0);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        info!("PIN {}: HIGH", self.0);
        Ok(())
    }
}

/// Sigma-delta channel that logs density updates to the console.
struct ConsoleSdm;

impl SdmChannel for ConsoleSdm {
    fn bind(&mut self, sample_rate_hz: u32) -> Result<(), MotorError> {
        info!("SDM: bound at {} Hz", sample_rate_hz);
        Ok(())
    }

    fn release(&mut self) -> Result<(), MotorError> {
        info!("SDM: released");
        Ok(())
    }

    fn set_pulse_density(&mut self, density: i8) -> Result<(), MotorError> {
        info!("SDM: density {}", density);
        Ok(())
    }
}

#[embassy_executor::task]
async fn sdm_motor_task(mut ctrl: MechanicsController<SdmMotor<ConsolePin, ConsoleSdm>, Delay>) -> ! {
    ctrl.motor_ch().await
}

#[embassy_executor::task]
async fn ttl_motor_task(mut ctrl: MechanicsController<TtlMotor<ConsolePin>, Delay>) -> ! {
    ctrl.motor_ch().await
}

#[embassy_executor::task]
async fn null_motor_task(mut ctrl: MechanicsController<NullMotor, Delay>) -> ! {
    ctrl.motor_ch().await
}

/// Blink-style demo loop: run the blind one way, pause, run it back, pause,
/// sweeping the duty up and down between runs.
#[embassy_executor::task]
async fn blink_task(step: u8, period_ms: u32) -> ! {
    let step = step.clamp(1, 100) as i8;
    let mut dir: i8 = step;
    let mut duty: u8 = step as u8;
    loop {
        info!("Run CW at {}", duty);
        MOTOR_CHANNEL
            .sender()
            .send(MotorCommand::CwTimed { d: Some(duty), ms: period_ms })
            .await;
        Timer::after_millis(u64::from(period_ms) * 2).await;

        info!("Run CCW at {}", duty);
        MOTOR_CHANNEL
            .sender()
            .send(MotorCommand::CcwTimed { d: Some(duty), ms: period_ms })
            .await;
        Timer::after_millis(u64::from(period_ms) * 2).await;

        if duty >= 100 || duty == 0 {
            dir = -dir;
        }
        duty = duty.saturating_add_signed(dir).min(100);
    }
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner) {
    let opts: Opts = Opts::parse();

    match opts.topology.as_str() {
        "sdm" => {
            let motor = SdmMotor::new(SdmMotorConfig::default(), ConsolePin("DIR"), ConsoleSdm)
                .expect("SDM motor creation failed");
            spawner
                .spawn(sdm_motor_task(MechanicsController::new(motor, Delay)))
                .unwrap();
        }
        "ttl" => {
            let motor = TtlMotor::new(ConsolePin("CLW"), ConsolePin("CCW"))
                .expect("TTL motor creation failed");
            spawner
                .spawn(ttl_motor_task(MechanicsController::new(motor, Delay)))
                .unwrap();
        }
        "none" => {
            spawner
                .spawn(null_motor_task(MechanicsController::new(NullMotor::new(), Delay)))
                .unwrap();
        }
        other => {
            error!("unknown topology {:?}, falling back to null motor", other);
            spawner
                .spawn(null_motor_task(MechanicsController::new(NullMotor::new(), Delay)))
                .unwrap();
        }
    }

    if let Some(raw) = opts.command.as_deref() {
        match serde_json::from_str::<MotorCommand>(raw) {
            Ok(cmd) => MOTOR_CHANNEL.sender().send(cmd).await,
            Err(err) => error!("bad --command payload: {}", err),
        }
    }

    spawner.spawn(blink_task(opts.step, opts.period_ms)).unwrap();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let executor = mk_static!(Executor, Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner)).unwrap();
    });
}
