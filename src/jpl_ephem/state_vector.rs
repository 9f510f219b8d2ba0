use std::ops::{Add, Sub};

use nalgebra::Vector3;

/// Cartesian state in the ICRF axes: position in km, velocity in km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector { position, velocity }
    }

    pub fn zeros() -> Self {
        StateVector::new(Vector3::zeros(), Vector3::zeros())
    }
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: StateVector) -> StateVector {
        StateVector::new(self.position + rhs.position, self.velocity + rhs.velocity)
    }
}

impl Sub for StateVector {
    type Output = StateVector;

    fn sub(self, rhs: StateVector) -> StateVector {
        StateVector::new(self.position - rhs.position, self.velocity - rhs.velocity)
    }
}
