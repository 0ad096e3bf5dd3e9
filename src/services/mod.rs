// SPDX-License-Identifier: MIT

//! Services module - auth-adjacent logic that is not a route handler.

pub mod google;
pub mod password;

pub use google::{GoogleAuthError, GoogleProfile, GoogleTokenVerifier};
