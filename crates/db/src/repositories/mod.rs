//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod field_repo;
pub mod profile_repo;
pub mod response_repo;
pub mod step_repo;
pub mod submission_repo;
pub mod wizard_repo;

pub use field_repo::FieldRepo;
pub use profile_repo::ProfileRepo;
pub use response_repo::ResponseRepo;
pub use step_repo::StepRepo;
pub use submission_repo::SubmissionRepo;
pub use wizard_repo::WizardRepo;
