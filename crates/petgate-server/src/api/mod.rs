// HTTP API routes
//
// Ungated pet handlers plus the page handlers mounted behind each guard.

pub mod areas;
pub mod common;
pub mod pets;

pub use common::ErrorResponse;
