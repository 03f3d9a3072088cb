//! shm-core: shared foundation for the oscillator solver.
//!
//! Contains:
//! - quantity (the 17 named fields + oscillator family)
//! - state (one partially known measurement instant)
//! - numeric (Real + tolerances + guarded float helpers)
//! - units (uom unit symbols + standard gravity)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod quantity;
pub mod state;
pub mod units;

pub use error::{ShmError, ShmResult};
pub use numeric::*;
pub use quantity::{Family, Quantity};
pub use state::State;
