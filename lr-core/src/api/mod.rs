//! Native HTTP access to the readings backend.
//!
//! Every request built by [`LimbRescueClient`] passes through the
//! [`AuthInterceptor`] before it is sent.

mod client;
mod config;
mod interceptor;

pub use client::LimbRescueClient;
pub use config::{ClientConfig, DEFAULT_ALLOW_ORIGIN, DEFAULT_BASE_URL};
pub use interceptor::{AuthInterceptor, Session};
