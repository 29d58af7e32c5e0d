//! In-call theme colors and call settings for a phone dialer.

pub mod app;
pub mod bottom_nav;
pub mod color;
pub mod config;
pub mod error;
pub mod palette;
pub mod settings;
pub mod theme;
