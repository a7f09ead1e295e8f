pub mod error;
pub mod raster;
pub mod render;

pub use error::RenderError;
pub use raster::{
    select_rasterizer, CanvasRasterizer, ChromiumRasterizer, RasterJob, Rasterizer, WithFallback,
};
pub use render::{build_context, resolve_asset_paths, template_name, TemplateSet};
