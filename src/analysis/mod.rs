//! Comparison analysis: the typed payload rendered as cards, the request
//! bodies sent to the generative model and parsing of its replies.

mod client;
mod error;
mod request;
mod response;
mod types;

pub use client::GeminiClient;
pub use error::AnalysisError;
pub use request::{DEFAULT_QUERY, follow_up_query};
pub use types::{AnalysisResponse, ComparisonData, DEFAULT_TAB, GroundingSource};
