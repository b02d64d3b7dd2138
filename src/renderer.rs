//! Heatmap rendering
//!
//! [HeatmapRenderer] turns a [Grid] into a [Figure]: one flat square block of
//! pixels per cell, colored by the cell value scaled over the grid range, next
//! to a colorbar legend. [Figure::save] encodes the figure in the format given
//! by the file extension.

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use image::{ImageError, ImageFormat, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut},
    rect::Rect,
};

use crate::{
    colorbar::{self, Colorbar, BAR_WIDTH},
    colormap::{Colormap, Normalize},
    grid::{Grid, GridError},
    HeatmapError, Result,
};

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const FOREGROUND: Rgb<u8> = Rgb([0, 0, 0]);
/// Blank border around the figure [px]
pub const MARGIN: u32 = 20;
/// Space between the heatmap and the colorbar [px]
const GAP: u32 = 16;
/// Heatmap longest side when the cell size is not set [px]
const AUTO_EXTENT: usize = 480;

/// Rectangular area of the figure, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
impl Region {
    /// Center pixel
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Figure geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cell_size: u32,
    pub heatmap: Region,
    pub colorbar: Option<Region>,
    pub width: u32,
    pub height: u32,
}
impl Layout {
    /// Pixels of the cell at (`row`,`col`)
    pub fn cell(&self, row: usize, col: usize) -> Region {
        Region {
            x: self.heatmap.x + col as u32 * self.cell_size,
            y: self.heatmap.y + row as u32 * self.cell_size,
            width: self.cell_size,
            height: self.cell_size,
        }
    }
}

/// Rendered heatmap and colorbar
#[derive(Debug, Clone)]
pub struct Figure {
    pub image: RgbImage,
    pub layout: Layout,
}
impl Figure {
    /// Writes the figure to `path`, the image format follows the file extension
    ///
    /// The image is encoded in memory first, nothing is written if encoding fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let output_error = |e: ImageError| HeatmapError::OutputWrite(e, path.to_path_buf());
        let format = ImageFormat::from_path(path).map_err(output_error)?;
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, format)
            .map_err(output_error)?;
        fs::write(path, buffer.into_inner())
            .map_err(|e| output_error(ImageError::IoError(e)))?;
        log::debug!("heatmap saved to {:?} ({:?})", path, format);
        Ok(())
    }
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Heatmap renderer
///
/// Options are set with builder methods:
/// ```no_run
/// use csv_heatmap::{Colormap, HeatmapRenderer};
///
/// HeatmapRenderer::default()
///     .colormap(Colormap::Viridis)
///     .cell_size(16)
///     .render("solution.csv", "solution.png")?;
/// # Ok::<(), csv_heatmap::HeatmapError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HeatmapRenderer {
    colormap: Colormap,
    cell_size: Option<u32>,
    n_tick: usize,
    colorbar: bool,
    font: Option<PathBuf>,
}
impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self {
            colormap: Colormap::Hot,
            cell_size: None,
            n_tick: 5,
            colorbar: true,
            font: None,
        }
    }
}
impl HeatmapRenderer {
    pub fn colormap(self, colormap: Colormap) -> Self {
        Self { colormap, ..self }
    }
    /// Sets the side of a cell [px], at least 1
    pub fn cell_size(self, cell_size: u32) -> Self {
        Self {
            cell_size: Some(cell_size.max(1)),
            ..self
        }
    }
    /// Sets the number of colorbar ticks, at least 2
    pub fn ticks(self, n_tick: usize) -> Self {
        Self {
            n_tick: n_tick.max(2),
            ..self
        }
    }
    pub fn colorbar(self, colorbar: bool) -> Self {
        Self { colorbar, ..self }
    }
    /// TrueType font for the colorbar labels
    pub fn font<P: Into<PathBuf>>(self, font: P) -> Self {
        Self {
            font: Some(font.into()),
            ..self
        }
    }
    /// Loads the CSV grid in `source`, checking first that the file exists
    pub fn load<P: AsRef<Path>>(&self, source: P) -> Result<Grid> {
        let source = source.as_ref();
        if !source.is_file() {
            return Err(HeatmapError::MissingInput(source.to_path_buf()));
        }
        Grid::from_path(source).map_err(|e| match e {
            GridError::Io(e) => HeatmapError::ReadInput(e, source.to_path_buf()),
            e => HeatmapError::DataFormat(e, source.to_path_buf()),
        })
    }
    /// Renders the CSV grid in `source` into the image file `destination`
    pub fn render<P, Q>(&self, source: P, destination: Q) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let grid = self.load(source)?;
        self.draw(&grid)?.save(destination)
    }
    fn cell_size_for(&self, grid: &Grid) -> u32 {
        self.cell_size.unwrap_or_else(|| {
            let (n_row, n_col) = grid.shape();
            (AUTO_EXTENT / n_row.max(n_col)).max(1) as u32
        })
    }
    fn colorbar_for(&self, norm: Normalize) -> Option<Colorbar> {
        if !self.colorbar {
            return None;
        }
        let font = match &self.font {
            Some(path) => colorbar::load_font(path),
            None => colorbar::system_font(),
        };
        if font.is_none() {
            log::warn!("no usable font found, colorbar labels are skipped");
        }
        Some(Colorbar::new(norm, self.colormap, self.n_tick, font))
    }
    /// Figure geometry for `grid`
    pub fn layout(&self, grid: &Grid) -> Result<Layout> {
        let colorbar = self.colorbar_for(Normalize::from(grid.minmax()));
        self.layout_with(grid, colorbar.as_ref())
    }
    fn layout_with(&self, grid: &Grid, colorbar: Option<&Colorbar>) -> Result<Layout> {
        let (n_row, n_col) = grid.shape();
        let cell_size = self.cell_size_for(grid);
        let too_large = || HeatmapError::Canvas(n_row, n_col, cell_size);
        let pixels = |n: usize| -> Option<u32> { u32::try_from(n).ok()?.checked_mul(cell_size) };

        let heatmap = Region {
            x: MARGIN,
            y: MARGIN,
            width: pixels(n_col).ok_or_else(too_large)?,
            height: pixels(n_row).ok_or_else(too_large)?,
        };
        let colorbar_region = colorbar.map(|_| Region {
            x: (heatmap.x + GAP).saturating_add(heatmap.width),
            y: heatmap.y,
            width: BAR_WIDTH,
            height: heatmap.height,
        });
        let right = colorbar
            .zip(colorbar_region)
            .map(|(cb, region)| region.x as u64 + cb.extent() as u64)
            .unwrap_or(heatmap.x as u64 + heatmap.width as u64);
        let width = u32::try_from(right + MARGIN as u64).map_err(|_| too_large())?;
        let height =
            u32::try_from(heatmap.height as u64 + 2 * MARGIN as u64).map_err(|_| too_large())?;
        Ok(Layout {
            cell_size,
            heatmap,
            colorbar: colorbar_region,
            width,
            height,
        })
    }
    /// Rasterizes `grid` into a [Figure]
    ///
    /// Non-finite values are left in the background color and do not take
    /// part in the color scale range.
    pub fn draw(&self, grid: &Grid) -> Result<Figure> {
        let norm = Normalize::from(grid.minmax());
        let colorbar = self.colorbar_for(norm);
        let layout = self.layout_with(grid, colorbar.as_ref())?;
        log::debug!(
            "rendering {:?} grid: {}x{} px, {} px/cell, range [{}, {}]",
            grid.shape(),
            layout.width,
            layout.height,
            layout.cell_size,
            norm.min,
            norm.max
        );

        let mut image = RgbImage::from_pixel(layout.width, layout.height, BACKGROUND);
        for (i, row) in grid.rows().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    continue;
                }
                let color = Rgb(self.colormap.eval(norm.normalize(value)));
                let cell = layout.cell(i, j);
                draw_filled_rect_mut(
                    &mut image,
                    Rect::at(cell.x as i32, cell.y as i32).of_size(cell.width, cell.height),
                    color,
                );
            }
        }
        let heatmap = layout.heatmap;
        draw_hollow_rect_mut(
            &mut image,
            Rect::at(heatmap.x as i32 - 1, heatmap.y as i32 - 1)
                .of_size(heatmap.width + 2, heatmap.height + 2),
            FOREGROUND,
        );
        if let Some((colorbar, region)) = colorbar.as_ref().zip(layout.colorbar.as_ref()) {
            colorbar.draw(&mut image, region);
        }

        Ok(Figure { image, layout })
    }
}
