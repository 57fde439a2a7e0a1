// Job-description extraction: URL in, main-content text out.
// Direct fetch first; a headless browser only when that fails.

pub mod chrome;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod pipeline;
pub mod readability;
pub mod render;
pub mod validation;

pub use error::ExtractionError;
pub use pipeline::ExtractionPipeline;
