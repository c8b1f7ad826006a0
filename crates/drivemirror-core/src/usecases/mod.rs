//! Use cases (interactors) for DriveMirror
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate business rules to domain methods and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`FileIntakeUseCase`] - Content intake: store, replace, flag for
//!   deletion, import from URL
//!
//! The reconciliation pass itself lives in the engine crate; it drives the
//! same ports but carries scheduling state that does not belong here.

pub mod intake;

pub use intake::{FileIntakeUseCase, IntakeError};
