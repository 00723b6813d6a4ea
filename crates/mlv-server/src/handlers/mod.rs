//! HTTP request handlers.

pub(crate) mod modules;
pub(crate) mod navigation;
pub(crate) mod progress;
