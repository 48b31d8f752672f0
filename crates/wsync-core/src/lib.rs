//! Core logic for the wsync workspace synchronization engine.
//!
//! This crate defines the canonical workspace specification, the package
//! manifest model, the file-store abstraction, the tree walker, and the
//! synchronizer that derives every on-disk artifact from the specification.

pub mod constants;
pub mod error;
pub mod manifest;
pub mod spec;
pub mod store;
pub mod sync;
pub mod task;
pub mod walk;

pub use error::{Result, SyncError};
pub use manifest::ManifestSpec;
pub use spec::{AppendSpec, DescriptorSpec, PackageSpec, StubConfig, WorkspaceSpec};
pub use store::{DiskStore, Entry, EntryKind, FileStore, MemoryStore};
pub use sync::Synchronizer;
pub use task::Task;
