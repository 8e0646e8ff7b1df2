//! Domain models.
//!
//! Camera frames, recognition outcomes, enrollment progress and the
//! backend's read models. All wire types derive serde.

pub mod attendance;
pub mod enrollment;
pub mod event;
pub mod frame;
pub mod recognition;
