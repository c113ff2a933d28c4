//! Business logic services.

pub mod auth;
pub mod captcha;
pub mod email;
pub mod token;
