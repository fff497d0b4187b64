pub mod accessor;
pub mod compactor;
pub mod domain;
pub mod pitches;

pub use self::accessor::{DenseMask, DenseValues, MaskAccessor, ValueAccessor};
pub use self::compactor::{compact_coords, compact_values, nonzero, CoordBuffer};
pub use self::domain::{Domain, Point, MAX_RANK};
pub use self::pitches::Pitches;
