//! Basic cycle example.
//!
//! Builds a two-axis machine from TOML, homes X against its limit sensor,
//! then runs a synchronized line and a quarter arc.
//!
//! The pins are host-side stand-ins; ticks are driven with `run_blocking`.

use std::cell::Cell;
use std::rc::Rc;

use stepper_cycle::{
    parse_config, CalibrateMode, Cycle, Direction, LineId, PinBank, PolledTicks, Rotation,
    UnitExt,
};

const MACHINE: &str = r#"
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
max_pos_um = 100000.0

[motors.y]
name = "Y"
step_line = 3
dir_line = 4
enable_line = 5
pulse_delay_us = 100
distance_per_step_um = 10.0
"#;

/// Mock delay provider for demonstration.
struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // A real board waits on a hardware timer here
    }
}

/// Output pin counting rising edges.
struct MockPin {
    state: bool,
    edges: Rc<Cell<u32>>,
}

impl MockPin {
    fn new(edges: Rc<Cell<u32>>) -> Self {
        Self {
            state: false,
            edges,
        }
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.state {
            self.edges.set(self.edges.get() + 1);
        }
        self.state = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }
}

/// Limit switch that closes after a number of samples.
struct MockSwitch {
    samples: u32,
    closes_after: u32,
}

impl embedded_hal::digital::ErrorType for MockSwitch {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for MockSwitch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.samples += 1;
        Ok(self.samples > self.closes_after)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

fn main() -> stepper_cycle::Result<()> {
    println!("=== Basic Cycle Example ===\n");

    let config = parse_config(MACHINE)?;

    let x_steps = Rc::new(Cell::new(0));
    let y_steps = Rc::new(Cell::new(0));
    let unused = Rc::new(Cell::new(0));
    let pins = PinBank::new(
        [
            (LineId(0), MockPin::new(x_steps.clone())),
            (LineId(1), MockPin::new(unused.clone())),
            (LineId(2), MockPin::new(unused.clone())),
            (LineId(3), MockPin::new(y_steps.clone())),
            (LineId(4), MockPin::new(unused.clone())),
            (LineId(5), MockPin::new(unused)),
        ],
        [(
            LineId(20),
            MockSwitch {
                samples: 0,
                closes_after: 150,
            },
        )],
    );

    let mut cycle = Cycle::from_config(&config, pins, PolledTicks::new())?;
    let mut delay = MockDelay;

    let (Some(x), Some(y)) = (cycle.find('X'), cycle.find('Y')) else {
        println!("machine is missing an axis");
        return Ok(());
    };

    // Homing: whirl toward the sensor, pinning the position at min_pos
    println!("Homing X...");
    cycle.prepare_whirl(x, Direction::Backward, 200, CalibrateMode::StartMinPos)?;
    let status = cycle.run_blocking(&mut delay)?;
    print!("{}", status);
    println!("X pulses while homing: {}\n", x_steps.get());

    // Synchronized line
    println!("Line to (20 mm, 5 mm) at 25 mm/s...");
    cycle.prepare_line_2d(x, y, 20.0.mm(), 5.0.mm(), 25.0.mm_per_sec())?;
    let status = cycle.run_blocking(&mut delay)?;
    print!("{}", status);

    // Quarter arc, one monotone segment at a time
    println!("\nQuarter arc around (10 mm, 0 mm)...");
    let mut path = cycle.prepare_arc(
        x,
        y,
        [10.0.mm(), 10.0.mm()],
        [10.0.mm(), 0.0.mm()],
        Rotation::Clockwise,
        20.0.mm_per_sec(),
    )?;
    println!(
        "{} segment(s), planned {:.0} ms",
        path.segments().len(),
        path.duration_us() / 1000.0
    );
    loop {
        cycle.run_blocking(&mut delay)?;
        if !path.prepare_next(&mut cycle)? {
            break;
        }
    }
    print!("{}", cycle.status());

    println!("\nTotal pulses: X {}, Y {}", x_steps.get(), y_steps.get());
    println!("Pin faults: {}", cycle.lines().faults());

    Ok(())
}
