//! Unit tests for TOML configuration parsing.

use stepper_cycle::config::{EndStrategy, SystemConfig};
use stepper_cycle::{Cycle, LineId, Micrometers, MotorRegistry, PolledTicks};

use crate::Recorder;

const MACHINE: &str = r#"
[cycle]
tick_us = 50

[motors.x]
name = "X"
step_line = 0
dir_line = 1
enable_line = 2
pulse_delay_us = 100
distance_per_step_um = 10.0

[motors.x.bounds]
min_sensor_line = 20
min_strategy = "const"
max_strategy = "const"
min_pos_um = 0.0
max_pos_um = 200000.0

[motors.y]
name = "Y"
step_line = 3
dir_line = 4
enable_line = 5
invert_direction = true
pulse_delay_us = 150
distance_per_step_um = 2.5
"#;

/// Test parsing a complete machine description.
#[test]
fn test_parse_machine() {
    let config: SystemConfig = toml::from_str(MACHINE).expect("Failed to parse TOML");

    assert_eq!(config.cycle.tick.map(|t| t.0), Some(50));
    let keys: Vec<&str> = config.motor_keys().collect();
    assert_eq!(keys, vec!["x", "y"]);

    let x = config.motor("x").expect("Motor not found");
    assert_eq!(x.name.as_str(), "X");
    assert_eq!(x.step_line, LineId(0));
    assert_eq!(x.pulse_delay, 100);
    assert_eq!(x.distance_per_step, Micrometers(10.0));
    assert_eq!(x.dir_inv(), 1);

    let bounds = x.bounds.as_ref().expect("Bounds not found");
    assert_eq!(bounds.min_sensor_line, Some(LineId(20)));
    assert_eq!(bounds.max_sensor_line, None);
    assert_eq!(bounds.min_strategy, EndStrategy::Const);
    assert_eq!(bounds.max_pos, Micrometers(200000.0));

    let y = config.motor("y").expect("Motor not found");
    assert_eq!(y.dir_inv(), -1);
    assert!(y.bounds.is_none());
}

/// Test that omitted bound strategies default to INF.
#[test]
fn test_bounds_default_to_inf() {
    let toml_str = r#"
[motors.z]
name = "Z"
step_line = 6
dir_line = 7
enable_line = 8
pulse_delay_us = 0
distance_per_step_um = 1.0

[motors.z.bounds]
max_sensor_line = 31
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let bounds = config.motor("z").unwrap().bounds.as_ref().unwrap();
    assert_eq!(bounds.min_strategy, EndStrategy::Inf);
    assert_eq!(bounds.max_strategy, EndStrategy::Inf);
    assert_eq!(bounds.max_sensor_line, Some(LineId(31)));
}

/// Test building a cycle straight from a parsed configuration.
#[test]
fn test_cycle_from_config() {
    let config = stepper_cycle::parse_config(MACHINE).expect("Invalid configuration");
    let cycle = Cycle::from_config(&config, Recorder::default(), PolledTicks::new())
        .expect("Failed to build cycle");

    let x = cycle.find('X').expect("X not registered");
    let y = cycle.find('Y').expect("Y not registered");
    assert!(cycle.find('Z').is_none());

    let x = cycle.motor(x).unwrap();
    assert_eq!(x.min_delay().0, 100);
    assert_eq!(x.bounds().min_sensor, Some(LineId(20)));
    assert_eq!(cycle.motor(y).unwrap().dir_inv(), -1);
}

/// Test that the registry keeps table order.
#[test]
fn test_registry_from_config_order() {
    let config = stepper_cycle::parse_config(MACHINE).unwrap();
    let registry = MotorRegistry::from_config(&config).unwrap();

    let names: Vec<char> = registry.iter().map(|(_, m)| m.name()).collect();
    assert_eq!(names, vec!['X', 'Y']);
}

/// Test that malformed TOML is reported as a parse error.
#[test]
fn test_parse_error_reported() {
    let result = stepper_cycle::parse_config("[motors.x\nname = ");
    assert!(matches!(
        result,
        Err(stepper_cycle::Error::Config(
            stepper_cycle::error::ConfigError::ParseError(_)
        ))
    ));
}
