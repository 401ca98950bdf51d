//! # Blogicum Shared
//!
//! Payloads exchanged with the browser: the HTML form bodies the server
//! accepts, and the problem-details body behind every error page.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
