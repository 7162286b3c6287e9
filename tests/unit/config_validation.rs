//! Unit tests for configuration validation.

use stepper_cycle::error::ConfigError;
use stepper_cycle::{parse_config, validate_config, Error, SystemConfig};

fn motor_table(key: &str, name: &str, extra: &str) -> String {
    format!(
        r#"
[motors.{key}]
name = "{name}"
step_line = 0
dir_line = 1
enable_line = 2
pulse_delay_us = 100
distance_per_step_um = 10.0
{extra}
"#
    )
}

/// Test that a valid configuration passes validation.
#[test]
fn test_valid_config() {
    let toml_str = motor_table("x", "X", "") + &motor_table("y", "Y", "");
    let config: SystemConfig = toml::from_str(&toml_str).unwrap();
    assert!(validate_config(&config).is_ok());
}

/// Test that two motors cannot share a name.
#[test]
fn test_duplicate_motor_name() {
    let toml_str = motor_table("x", "X", "") + &motor_table("x2", "X", "");
    let result = parse_config(&toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::DuplicateMotorName('X')))
    ));
}

/// Test that motor names must be a single character.
#[test]
fn test_multi_character_name() {
    let result = parse_config(&motor_table("x", "XA", ""));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidMotorName(_)))
    ));
}

/// Test that a negative pulse delay is rejected.
#[test]
fn test_negative_pulse_delay() {
    let toml_str = motor_table("x", "X", "").replace("pulse_delay_us = 100", "pulse_delay_us = -5");
    let result = parse_config(&toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidPulseDelay(-5)))
    ));
}

/// Test that distance per step must be positive.
#[test]
fn test_non_positive_distance_per_step() {
    let toml_str = motor_table("x", "X", "")
        .replace("distance_per_step_um = 10.0", "distance_per_step_um = -1.0");
    let result = parse_config(&toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidDistancePerStep(_)))
    ));
}

/// Test that CONST/CONST bounds must be ordered.
#[test]
fn test_unordered_const_bounds() {
    let bounds = r#"
[motors.x.bounds]
min_strategy = "const"
max_strategy = "const"
min_pos_um = 500.0
max_pos_um = 100.0
"#;
    let result = parse_config(&motor_table("x", "X", bounds));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidBounds { .. }))
    ));
}

/// Test that unordered positions are accepted when one end is not CONST.
#[test]
fn test_unordered_bounds_with_auto_end() {
    let bounds = r#"
[motors.x.bounds]
min_strategy = "const"
max_strategy = "auto"
min_pos_um = 500.0
max_pos_um = 100.0
"#;
    assert!(parse_config(&motor_table("x", "X", bounds)).is_ok());
}

/// Test that a zero tick period is rejected.
#[test]
fn test_zero_tick_period() {
    let toml_str = String::from("[cycle]\ntick_us = 0\n") + &motor_table("x", "X", "");
    let result = parse_config(&toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidTickPeriod(0)))
    ));
}
