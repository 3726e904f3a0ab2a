//! Sensor inputs: the two reservoir overflow sensors.

pub mod overflow;
