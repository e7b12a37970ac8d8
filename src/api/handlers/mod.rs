//! API handlers for Tessera.
//!
//! `auth` holds login, logout and the access guard; `movies` is the sample
//! resource mounted under the protected prefix.

pub mod auth;
pub mod health;
pub mod movies;
pub mod root;
