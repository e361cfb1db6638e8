use log::{error, info, warn};
use multical401::{Config, ReadSession, RegisterId, SerialLink};
use std::fmt::Display;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

fn display_value<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "absent".to_string(),
    }
}

fn main() -> ExitCode {
    // Initialize logging
    let default_filter = std::env::var("MULTICAL_LOG_LEVEL").unwrap_or("info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let link = match SerialLink::open(&config.meter) {
        Ok(l) => l,
        Err(e) => {
            error!("Unable to open {}: {e}", config.meter.port);
            return ExitCode::FAILURE;
        }
    };

    let mut session = ReadSession::new(link);
    loop {
        match session.read_meter() {
            Ok(reading) => {
                if reading.is_empty() {
                    warn!("No readings from the meter, check IR connection");
                } else {
                    info!(
                        "{}: {} {}, {}: {} {}, {}: {} {}",
                        RegisterId::ThermalEnergy.name(),
                        display_value(&reading.heat_energy),
                        RegisterId::ThermalEnergy.unit(),
                        RegisterId::Volume.name(),
                        display_value(&reading.volume),
                        RegisterId::Volume.unit(),
                        RegisterId::HoursCounter.name(),
                        display_value(&reading.hours_counter),
                        RegisterId::HoursCounter.unit(),
                    );
                }
                match serde_json::to_string(&reading) {
                    Ok(json) => println!("{json}"),
                    Err(e) => error!("Serializing reading failed: {e}"),
                }
            }
            Err(e) => {
                error!("Meter read failed: {e}");
                if config.meter.poll_interval_secs.is_none() {
                    return ExitCode::FAILURE;
                }
            }
        }

        /* Retrying after a failed cycle is this loop's job, not the
         * session's */
        match config.meter.poll_interval_secs {
            Some(secs) => thread::sleep(Duration::from_secs(secs)),
            None => break,
        }
    }
    ExitCode::SUCCESS
}
