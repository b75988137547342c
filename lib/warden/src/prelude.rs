//! Prelude module for convenient imports.
//!
//! ```ignore
//! use warden::prelude::*;
//! ```

pub use crate::{
    ApiClient, ClientConfig, ConfirmPrompt, Envelope, Error, HttpClient, HyperClient, Method,
    Notifier, Page, PipelineConfig, Request, RequestBuilder, RequestPipeline, Response, Result,
    SessionStore, StatusCode, Toast, TokenStore, header, token_fn,
};
pub use serde::{Deserialize, Serialize};
