//! TileMosaic - tile selection for continuous pan/zoom of raster pyramids
//!
//! This library decides what to draw for every tile a Web Mercator viewport
//! needs while pixel data is still loading:
//!
//! - [`coord`]: projection math, tile keys and wraparound
//! - [`siblings`]: repeated placements of a tile across a wide or wrapping viewport
//! - [`select`]: ancestor/descendant substitutes chosen from cache residency
//! - [`offset`]: where a placement lands in a substitute's texture space
//! - [`frame`]: the above combined into per-frame draw commands
//!
//! Supporting modules cover region expansion ([`region`]), pyramid
//! descriptors ([`pyramid`]), band naming ([`bands`]), configuration
//! ([`config`]) and logging setup ([`logging`]).

pub mod bands;
pub mod config;
pub mod coord;
pub mod frame;
pub mod logging;
pub mod offset;
pub mod pyramid;
pub mod region;
pub mod select;
pub mod siblings;
