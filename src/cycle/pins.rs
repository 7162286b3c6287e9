//! [`Lines`] over embedded-hal pins.

use embedded_hal::digital::{InputPin, OutputPin};

use super::io::{Level, LineId, Lines};

/// Maps line ids to embedded-hal output and input pins.
///
/// Pin errors cannot reach the tick handler; they are counted and can be
/// inspected with [`faults`](PinBank::faults). An input line that is not in
/// the bank reads `Low` (not tripped).
///
/// # Example
///
/// ```rust,ignore
/// let lines = PinBank::new(
///     [(LineId(2), x_step), (LineId(3), x_dir), (LineId(4), x_en)],
///     [(LineId(20), x_min)],
/// );
/// ```
pub struct PinBank<O, I, const NO: usize, const NI: usize>
where
    O: OutputPin,
    I: InputPin,
{
    outputs: [(LineId, O); NO],
    inputs: [(LineId, I); NI],
    faults: u32,
}

impl<O, I, const NO: usize, const NI: usize> PinBank<O, I, NO, NI>
where
    O: OutputPin,
    I: InputPin,
{
    /// Create a bank from output and input pin tables.
    pub fn new(outputs: [(LineId, O); NO], inputs: [(LineId, I); NI]) -> Self {
        Self {
            outputs,
            inputs,
            faults: 0,
        }
    }

    /// Number of pin errors and writes to unknown lines seen so far.
    #[inline]
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Give the pins back.
    pub fn release(self) -> ([(LineId, O); NO], [(LineId, I); NI]) {
        (self.outputs, self.inputs)
    }

    fn fault(&mut self) {
        self.faults = self.faults.saturating_add(1);
        warn!("pin fault on line access ({} total)", self.faults);
    }
}

impl<O, I, const NO: usize, const NI: usize> Lines for PinBank<O, I, NO, NI>
where
    O: OutputPin,
    I: InputPin,
{
    fn set_line(&mut self, line: LineId, level: Level) {
        let result = match self.outputs.iter_mut().find(|(id, _)| *id == line) {
            Some((_, pin)) => match level {
                Level::High => pin.set_high().is_ok(),
                Level::Low => pin.set_low().is_ok(),
            },
            None => false,
        };
        if !result {
            self.fault();
        }
    }

    fn read_line(&mut self, line: LineId) -> Level {
        let sample = match self.inputs.iter_mut().find(|(id, _)| *id == line) {
            Some((_, pin)) => pin.is_high(),
            None => return Level::Low,
        };
        match sample {
            Ok(high) => Level::from_high(high),
            Err(_) => {
                self.fault();
                Level::Low
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_outputs_follow_levels() {
        let step = PinMock::new(&[Transaction::set(State::High), Transaction::set(State::Low)]);
        let sensor = PinMock::new(&[Transaction::get(State::High)]);

        let mut bank = PinBank::new([(LineId(2), step)], [(LineId(20), sensor)]);
        bank.set_line(LineId(2), Level::High);
        bank.set_line(LineId(2), Level::Low);
        assert_eq!(bank.read_line(LineId(20)), Level::High);
        assert_eq!(bank.read_line(LineId(21)), Level::Low);
        assert_eq!(bank.faults(), 0);

        let (mut outputs, mut inputs) = bank.release();
        outputs[0].1.done();
        inputs[0].1.done();
    }

    #[test]
    fn test_unknown_output_counts_fault() {
        let step = PinMock::new(&[]);
        let sensor = PinMock::new(&[]);

        let mut bank = PinBank::new([(LineId(2), step)], [(LineId(20), sensor)]);
        bank.set_line(LineId(9), Level::High);
        assert_eq!(bank.faults(), 1);

        let (mut outputs, mut inputs) = bank.release();
        outputs[0].1.done();
        inputs[0].1.done();
    }
}
