#![allow(missing_docs)]

pub mod error;
pub mod hardware;
pub mod scene;
