//! Domain types, validation rules, and pure state machines for formstep.
//!
//! Nothing in this crate performs I/O. The `db` crate persists what these
//! types describe and the `api` crate exposes them over HTTP.

pub mod editor;
pub mod error;
pub mod field_type;
pub mod ids;
pub mod navigation;
pub mod ordering;
pub mod pagination;
pub mod roles;
pub mod session;
pub mod tree;
pub mod types;
pub mod wizard;
