// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod contact;
pub mod note;
pub mod stats;
pub mod user;

pub use contact::{Contact, ContactDetail, ContactFilter, ContactLink, ContactPatch, NewContact};
pub use note::Note;
pub use stats::DashboardStats;
pub use user::{PublicUser, User};
