//! Turns a TikTok share link into a direct, downloadable media URL by asking a
//! third-party extraction API and normalizing whatever JSON it sends back.

pub mod config;
pub mod media;
pub mod utils;

pub use media::{
    admit, validate, Extraction, ResolveError, Resolver, ResolverConfig, Session, Submission,
    Verdict,
};
