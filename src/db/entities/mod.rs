//! SeaORM entities mapping the service's tables.

pub mod flashcard;
pub mod profile;
pub mod sample_thought;
pub mod user;
