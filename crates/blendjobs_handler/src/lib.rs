//! # blendjobs_handler
//!
//! Invocation boundary around [`blendjobs_parser`]: takes a request naming a
//! .blend object and a batch size, fetches the object (and the texture stored
//! next to it), and answers with the render array job size.

pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod handler;

pub use config::HandlerConfig;
pub use error::{HandlerError, Result};
pub use event::{JobRequest, JobResponse, JobResponseBody};
pub use fetch::{Fetcher, HttpFetcher, ObjectUri};
pub use handler::{handle, handle_json};
