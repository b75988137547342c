//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use warden_core::prelude::*;
//! ```

pub use crate::{
    Envelope, EnvelopeHead, Error, HttpClient, Method, Request, RequestBuilder, Response, Result,
    from_json, to_json,
};
