//! Drive Mirror Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `FileRecord` and its `SyncStatus` state machine
//! - **Use cases** - `FileIntakeUseCase` for creating, replacing, and retiring records
//! - **Port definitions** - Traits for adapters: `IRemoteStore`, `IRecordRepository`, `IBlobStore`, `IContentFetcher`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.
//! The reconciliation engine itself lives in `drivemirror-engine` and drives
//! the same ports.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
