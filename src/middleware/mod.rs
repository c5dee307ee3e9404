//! Request pipeline pieces.
//!
//! Outermost first: panic catching and the production error page
//! (`errors`), HTTPS enforcement (`https`), request id and tracing, path
//! normalisation (`path`), routing, then sessions (`session`) with
//! authentication and authorization resolved per handler (`auth`).

pub mod auth;
pub mod errors;
pub mod https;
pub mod path;
pub mod session;
