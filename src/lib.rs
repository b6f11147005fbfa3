//! Tasklens - a Todoist-backed task dashboard engine
//!
//! This library implements the data layer of a task dashboard client: it
//! fetches the flat task list from a Todoist-backed service, derives the
//! ordered root/subtask forest from it, coordinates task mutations with
//! re-fetch-after-write consistency, and submits code snippets to the
//! backend's requirement analyzer. Rendering is left to embedders; this
//! crate only exposes data and state.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`api`] - Remote service traits, wire types, and the HTTP client
//! * [`config`] - Application configuration management
//! * [`credentials`] - Bearer credential storage
//! * [`hierarchy`] - Flat task list to ordered forest conversion
//! * [`session`] - Centralized session-expiry policy
//! * [`sync`] - Task synchronization service and state machine
//! * [`analysis`] - Code analysis front-end

/// Code analysis front-end
pub mod analysis;

/// Remote service abstraction and HTTP implementation
pub mod api;

/// Configuration module for managing application settings
pub mod config;

/// Bearer credential storage
pub mod credentials;

/// Flat-to-hierarchical task conversion
pub mod hierarchy;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Session-expiry policy shared across remote operations
pub mod session;

/// Synchronization service for the in-memory task forest
pub mod sync;

// Re-export the core types for convenient access
pub use hierarchy::{build_forest, TaskNode};
pub use sync::{SyncService, SyncState, SyncStatus};
