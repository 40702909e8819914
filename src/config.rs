//! Configuration for canopy.
//!
//! - [general]: roots, exclusion patterns, icons and panel ratios.
//! - [capabilities]: which mutating actions the context menu offers.
//! - [load]: reading `canopy.toml`, defaults and `--init`.

pub mod capabilities;
pub mod general;
pub mod load;

pub use capabilities::Capabilities;
pub use general::{Editor, General};
pub use load::{Config, RawConfig};
