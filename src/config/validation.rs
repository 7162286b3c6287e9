//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Motor names are single characters and unique
/// - Pulse delays are not negative
/// - Distance per step is positive
/// - CONST/CONST bounds are ordered
/// - A fixed tick period, if set, is positive
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    if let Some(tick) = config.cycle.tick {
        if tick.0 == 0 {
            return Err(Error::Config(ConfigError::InvalidTickPeriod(tick.0)));
        }
    }

    let mut seen: heapless::Vec<char, { crate::motor::MAX_MOTORS }> = heapless::Vec::new();
    for (_, motor) in config.motors.iter() {
        let name = validate_motor(motor)?;
        if seen.contains(&name) {
            return Err(Error::Config(ConfigError::DuplicateMotorName(name)));
        }
        // capacity matches the motor map, push cannot fail
        let _ = seen.push(name);
    }

    Ok(())
}

fn validate_motor(config: &super::MotorConfig) -> Result<char> {
    let name = config.name_char()?;

    if config.pulse_delay < 0 {
        return Err(Error::Config(ConfigError::InvalidPulseDelay(config.pulse_delay)));
    }

    // Written so NaN is rejected as well
    if !(config.distance_per_step.0 > 0.0) {
        return Err(Error::Config(ConfigError::InvalidDistancePerStep(
            config.distance_per_step.0,
        )));
    }

    if let Some(ref bounds) = config.bounds {
        bounds.to_bounds()?;
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Micrometers;
    use crate::config::MotorConfig;
    use crate::cycle::LineId;

    fn make_config() -> MotorConfig {
        MotorConfig {
            name: heapless::String::try_from("Z").unwrap(),
            step_line: LineId(0),
            dir_line: LineId(1),
            enable_line: LineId(2),
            invert_direction: false,
            pulse_delay: 200,
            distance_per_step: Micrometers(2.5),
            bounds: None,
        }
    }

    #[test]
    fn test_negative_pulse_delay() {
        let mut config = make_config();
        config.pulse_delay = -1;

        let result = validate_motor(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidPulseDelay(-1)))
        ));
    }

    #[test]
    fn test_zero_distance_per_step() {
        let mut config = make_config();
        config.distance_per_step = Micrometers(0.0);

        let result = validate_motor(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidDistancePerStep(_)))
        ));
    }

    #[test]
    fn test_valid_motor() {
        assert_eq!(validate_motor(&make_config()), Ok('Z'));
    }
}
