//! SeaORM entity definitions
//!
//! Database-specific entities, kept separate from domain models.

pub mod task;
pub mod user;
