#[macro_use]
extern crate log;

mod errors;
mod maskpack;

pub mod engine;
pub mod scheduler;

pub use crate::engine::accessor::{DenseMask, DenseValues, MaskAccessor, ValueAccessor};
pub use crate::engine::compactor::{compact_coords, compact_values, nonzero, CoordBuffer};
pub use crate::engine::domain::{Domain, Point, MAX_RANK};
pub use crate::engine::pitches::Pitches;
pub use crate::errors::CompactError;
pub use crate::maskpack::{MaskPack, Options};
pub use crate::scheduler::{ResultSender, Task};

pub type CompactResult<T> = Result<T, CompactError>;
