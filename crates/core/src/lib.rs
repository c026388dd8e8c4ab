//! # Clinic Core
//!
//! Storage-agnostic scheduling logic for the clinic: the data model, the
//! interval conflict checker, the slot generator and the booking service
//! that ties them to the `DoctorDirectory` / `AppointmentRepository` seams.

pub mod conflict;
pub mod errors;
pub mod locks;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;
pub mod slots;
pub mod time;
