//! Row structs (`FromRow`) and request DTOs, one module per table.

pub mod field;
pub mod profile;
pub mod response;
pub mod step;
pub mod submission;
pub mod wizard;
