//! mldash: a terminal and browser dashboard for an ML inference API.
//!
//! The pipeline is registry → executor → projector, driven per screen by a
//! [`controller::PageController`]. The CLI and the embedded web dashboard
//! are thin renderers over the same controllers.

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod projector;
pub mod registry;
pub mod utils;
pub mod web;
