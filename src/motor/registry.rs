//! Registry of the motors a cycle drives.

use heapless::Vec;

use crate::config::SystemConfig;
use crate::error::{MotorError, Result};

use super::builder::StepperBuilder;
use super::stepper::Stepper;

/// Maximum number of motors in a registry.
///
/// Must stay a power of two, it also sizes the configuration map.
pub const MAX_MOTORS: usize = 8;

/// Index of a motor in its registry, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorId(pub(crate) u8);

impl MotorId {
    /// Registration index.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// The set of configured motors, processed in registration order.
///
/// # Example
///
/// ```rust,ignore
/// let config = stepper_cycle::load_config("machine.toml")?;
/// let registry = MotorRegistry::from_config(&config)?;
/// let x = registry.find('X').unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MotorRegistry {
    motors: Vec<Stepper, MAX_MOTORS>,
}

impl MotorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { motors: Vec::new() }
    }

    /// Build every motor from configuration, in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if a motor configuration is invalid or two motors
    /// share a name.
    pub fn from_config(config: &SystemConfig) -> Result<Self> {
        let mut registry = Self::new();
        for (_, motor_config) in config.motors.iter() {
            let motor = StepperBuilder::new()
                .from_motor_config(motor_config)?
                .build()?;
            registry.add(motor)?;
        }
        Ok(registry)
    }

    /// Register a motor.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::DuplicateName` or `MotorError::RegistryFull`.
    pub fn add(&mut self, motor: Stepper) -> Result<MotorId> {
        let name = motor.name();
        if self.find(name).is_some() {
            return Err(MotorError::DuplicateName(name).into());
        }

        let id = MotorId(self.motors.len() as u8);
        self.motors
            .push(motor)
            .map_err(|_| MotorError::RegistryFull)?;

        info!("registered motor {} as #{}", name, id.0);
        Ok(id)
    }

    /// Get a motor by id.
    #[inline]
    pub fn get(&self, id: MotorId) -> Option<&Stepper> {
        self.motors.get(id.index())
    }

    /// Get a motor by id, mutably.
    #[inline]
    pub fn get_mut(&mut self, id: MotorId) -> Option<&mut Stepper> {
        self.motors.get_mut(id.index())
    }

    /// Get a motor by id or fail with `MotorError::NotFound`.
    pub fn require(&self, id: MotorId) -> Result<&Stepper> {
        self.get(id).ok_or_else(|| MotorError::NotFound(id.0).into())
    }

    /// Get a motor mutably by id or fail with `MotorError::NotFound`.
    pub fn require_mut(&mut self, id: MotorId) -> Result<&mut Stepper> {
        self.get_mut(id).ok_or_else(|| MotorError::NotFound(id.0).into())
    }

    /// Look up a motor by name.
    pub fn find(&self, name: char) -> Option<MotorId> {
        self.motors
            .iter()
            .position(|m| m.name() == name)
            .map(|i| MotorId(i as u8))
    }

    /// Iterate over motors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (MotorId, &Stepper)> {
        self.motors
            .iter()
            .enumerate()
            .map(|(i, m)| (MotorId(i as u8), m))
    }

    /// Iterate mutably over motors in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Stepper> {
        self.motors.iter_mut()
    }

    /// Number of registered motors.
    #[inline]
    pub fn len(&self) -> usize {
        self.motors.len()
    }

    /// Check if no motor is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.motors.is_empty()
    }
}
