//! SEGUROPAR claims analytics: load the fraud analytics view, compute the
//! fraud-triage, executive and claims-manager reports, render them.

pub mod cache;
pub mod config;
pub mod demo_data;
pub mod error;
pub mod metrics;
pub mod model;
pub mod name_generator;
pub mod normalize;
pub mod params;
pub mod render;
pub mod rng;
pub mod screens;
pub mod session;
pub mod source;
