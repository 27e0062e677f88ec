//! # PageCraft Responsive
//!
//! Responsive breakpoint registry for the PageCraft editor.
//!
//! Viewport breakpoints scope per-breakpoint option overrides in the
//! options system. Widths are desktop-first maxima; the registry derives
//! the complementary mobile-first minimum thresholds. Structural edits
//! persist the full list through the transport collaborator and then
//! request stylesheet-cache regeneration, in that order.

mod devices;
mod errors;
mod registry;

pub use devices::{default_devices, ResponsiveDevice};
pub use errors::{ResponsiveError, ResponsiveResult};
pub use registry::BreakpointRegistry;

// Re-export the collaborator traits for convenience
pub use pagecraft_common::{CacheRegenerator, Transport};
