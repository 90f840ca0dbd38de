use bt_core::{CoreError, VehicleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("cannot start a simulation with no vehicles")]
    NoVehicles,

    #[error("vehicle id {0} appears more than once")]
    DuplicateVehicle(VehicleId),
}

pub type SimResult<T> = Result<T, SimError>;
