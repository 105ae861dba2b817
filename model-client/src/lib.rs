// Model Client Library
//
// This crate provides HTTP client functionality for communicating
// with the skin classification inference service.

mod client;
mod errors;

pub use client::{ClassScore, Classification, ModelClient, ModelInfo};
pub use errors::ClientError;
