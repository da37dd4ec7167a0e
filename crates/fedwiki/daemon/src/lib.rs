//! Federated wiki daemon library
//!
//! This crate provides the server side of the wiki:
//! - REST API for pages, actions, remote proxying and bundle submission
//! - The action applier that mutates stored pages
//! - Storage backends (memory, filesystem, farm)
//! - Server lifecycle management

pub mod api;
pub mod applier;
pub mod auth;
pub mod config;
pub mod error;
pub mod remote;
pub mod server;
pub mod storage;

pub use api::rest::AppState;
pub use applier::ActionApplier;
pub use auth::{Authenticator, SiteAccess};
pub use config::WikiConfig;
pub use error::{ApiError, ApplyError, DaemonError, StorageError};
pub use remote::{HttpRemoteFetcher, RemoteError, RemoteFetcher};
pub use server::Server;
pub use storage::{FileStorage, InMemoryStorage, Storage};
