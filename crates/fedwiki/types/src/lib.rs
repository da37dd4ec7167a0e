//! Federated wiki core types
//!
//! Pages are not mutable documents but journals of edit actions. This crate
//! holds the shared vocabulary used by the replay engine, the server and the
//! client:
//! - [`Page`], [`Item`] and [`Citation`]
//! - [`Action`] and [`JournalEntry`]
//! - [`Slug`], [`ItemId`] and [`SiteRef`]
//! - [`Revision`] for addressing journal prefixes

pub mod action;
pub mod ids;
pub mod page;
pub mod revision;

pub use action::{now_millis, Action, ActionKind, JournalEntry, PageHeader, ACTION_TYPES};
pub use ids::{random_hex, validate_site, IdError, ItemId, SiteRef, Slug};
pub use page::{Citation, Item, Page, EMPTY_TITLE};
pub use revision::Revision;
