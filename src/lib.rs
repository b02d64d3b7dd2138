/*!
# CSV heatmaps

Renders a rectangular grid of numbers, read from a comma separated file, as a
color-mapped image with a colorbar.

```no_run
csv_heatmap::render("solution.csv", "solution.png")?;
# Ok::<(), csv_heatmap::HeatmapError>(())
```

The default color map is `hot` (black → red → yellow → white), scaled over the
grid minimum and maximum. See [HeatmapRenderer] for the rendering options.
*/

use std::{
    io,
    path::{Path, PathBuf},
};

use image::ImageError;

pub mod colorbar;
pub mod colormap;
pub mod grid;
pub mod renderer;

pub use colormap::{Colormap, Normalize};
pub use grid::{Grid, GridError, Summary};
pub use renderer::{Figure, HeatmapRenderer, Layout, Region};

#[derive(thiserror::Error, Debug)]
pub enum HeatmapError {
    #[error("input file {0:?} does not exist")]
    MissingInput(PathBuf),
    #[error("failed to read input file {1:?}")]
    ReadInput(#[source] io::Error, PathBuf),
    #[error("{1:?} is not a rectangular grid of numbers")]
    DataFormat(#[source] GridError, PathBuf),
    #[error("failed to write image {1:?}")]
    OutputWrite(#[source] ImageError, PathBuf),
    #[error("a {0}x{1} grid at {2} pixels per cell is too large to render")]
    Canvas(usize, usize, u32),
}
pub type Result<T> = std::result::Result<T, HeatmapError>;

/// Renders the CSV grid in `source` into the image file `destination` with the default options
pub fn render<P, Q>(source: P, destination: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    HeatmapRenderer::default().render(source, destination)
}
