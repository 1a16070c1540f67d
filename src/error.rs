//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Invalid size profile: {0}")]
    Profile(String),

    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    #[error("Marketplace store error: {0}")]
    Store(String),

    #[error("Price parsing error: {0}")]
    Price(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
