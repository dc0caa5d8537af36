//! # screenshare
//!
//! Binary support crate: configuration plus the concrete collaborators
//! (xcap capture, rdev global input, ratatui terminal surface) wired into
//! the `screenshare-core` loops.

pub mod capture;
pub mod config;
pub mod display;
pub mod input;
pub mod receiver;
pub mod sender;
