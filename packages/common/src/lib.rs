//! # PageCraft Common
//!
//! Shared building blocks for the PageCraft editor crates:
//!
//! - UID generation for elements, areas and breakpoints
//! - The hook/filter bus used at the fixed extension points
//! - Collaborator interfaces (backend transport, cache regeneration)
//! - The Google Fonts store
//! - Common error/result types

pub mod error;
pub mod fonts;
pub mod hooks;
pub mod result;
pub mod transport;
pub mod uid;

pub use error::*;
pub use fonts::*;
pub use hooks::*;
pub use result::*;
pub use transport::*;
pub use uid::*;
