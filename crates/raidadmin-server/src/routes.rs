//! HTTP routes

pub mod admin;
