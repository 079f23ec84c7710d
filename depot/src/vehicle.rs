//! The payload carried through the depot.

use std::fmt;

/// Model name stamped on every car.
pub const CAR_MODEL: &str = "SAAB";
/// Model name stamped on every truck.
pub const TRUCK_MODEL: &str = "VolvoTruck";
/// Seats in a car.
pub const CAR_MAX_PASSENGERS: u8 = 4;
/// Payload rating of a truck, in kilograms.
pub const TRUCK_MAX_LOAD_KG: u32 = 4000;

/// A vehicle leaving the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vehicle {
    /// A passenger car.
    Car {
        /// Serial number.
        id: u32,
        /// Model name.
        model: String,
        /// Number of seats.
        max_passengers: u8,
    },
    /// A goods truck.
    Truck {
        /// Serial number.
        id: u32,
        /// Model name.
        model: String,
        /// Payload rating in kilograms.
        max_load_kg: u32,
    },
}

/// Which kind of [`Vehicle`] this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    /// [`Vehicle::Car`]
    Car,
    /// [`Vehicle::Truck`]
    Truck,
}

impl Vehicle {
    /// Builds a standard car.
    pub fn car(id: u32) -> Self {
        Vehicle::Car {
            id,
            model: CAR_MODEL.to_string(),
            max_passengers: CAR_MAX_PASSENGERS,
        }
    }

    /// Builds a standard truck.
    pub fn truck(id: u32) -> Self {
        Vehicle::Truck {
            id,
            model: TRUCK_MODEL.to_string(),
            max_load_kg: TRUCK_MAX_LOAD_KG,
        }
    }

    /// Returns the serial number.
    pub fn id(&self) -> u32 {
        match self {
            Vehicle::Car { id, .. } | Vehicle::Truck { id, .. } => *id,
        }
    }

    /// Returns the model name.
    pub fn model(&self) -> &str {
        match self {
            Vehicle::Car { model, .. } | Vehicle::Truck { model, .. } => model,
        }
    }

    /// Returns the vehicle kind.
    pub fn kind(&self) -> VehicleKind {
        match self {
            Vehicle::Car { .. } => VehicleKind::Car,
            Vehicle::Truck { .. } => VehicleKind::Truck,
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleKind::Car => write!(f, "Car"),
            VehicleKind::Truck => write!(f, "Truck"),
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id())?;
        writeln!(f, "Model: {}", self.model())?;
        writeln!(f, "Type: {}", self.kind())?;
        match self {
            Vehicle::Car { max_passengers, .. } => write!(f, "Max Passengers: {max_passengers}"),
            Vehicle::Truck { max_load_kg, .. } => write!(f, "Max Load: {max_load_kg} kg"),
        }
    }
}
