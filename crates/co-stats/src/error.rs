use co_core::VehicleId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("vehicle {0} has more than one trip record in this run")]
    DuplicateTrip(VehicleId),

    #[error("column {column} holds {value:?}, expected a finite number")]
    BadNumber {
        column: &'static str,
        value:  String,
    },
}

pub type StatsResult<T> = Result<T, StatsError>;
