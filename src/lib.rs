//! Library crate for crude-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - User list controller: fetched users, visible slice, drafts (`controller`)
//! - Remote user service trait and its HTTP client (`remote`)
//! - Backend worker running remote calls off the UI thread (`worker`)
//! - Application state and update loop (`app`)
//! - Error types (`error`)
//! - Search box submission (`search`)
//! - UI rendering (`ui`)
//!
//! It is used by the `crude-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod controller;
pub mod error;
pub mod remote;
pub mod search;
pub mod ui;
pub mod worker;

// Re-export commonly used items at the crate root for convenience
pub use controller::{Draft, UserListController, VISIBLE_LIMIT};
pub use error::{ControllerError, RemoteCallFailure, Result};
pub use remote::{HttpUserService, NewUser, RemoteUserService, UserField, UserId, UserRecord};
