//! Drawing: the redraw seam, SVG flattening, CPU rasterization and still-image export.

pub(crate) mod backend;
pub(crate) mod export;
pub(crate) mod raster;
pub(crate) mod svg;
