//! Colorbar legend
//!
//! A vertical strip painted with the color map, maximum at the top, with tick
//! marks at evenly spaced values. Tick labels need a TrueType font, without
//! one only the tick marks are drawn.

use std::{fs, path::Path};

use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size},
    rect::Rect,
};
use rusttype::{Font, Scale};

use crate::{
    colormap::{Colormap, Normalize},
    renderer::{Region, FOREGROUND},
};

/// Colorbar strip width [px]
pub const BAR_WIDTH: u32 = 20;
/// Tick mark length [px]
pub const TICK_LENGTH: u32 = 5;
const LABEL_PAD: u32 = 4;
const FONT_SIZE: f32 = 14.;

/// Fonts tried in order when none is given
const SYSTEM_FONTS: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Loads a TrueType font, `None` if the file is missing or not a font
pub fn load_font<P: AsRef<Path>>(path: P) -> Option<Font<'static>> {
    fs::read(path.as_ref())
        .ok()
        .and_then(Font::try_from_vec)
        .map(|font| {
            log::debug!("colorbar labels font: {:?}", path.as_ref());
            font
        })
}
/// Loads the first available font among the usual system locations
pub fn system_font() -> Option<Font<'static>> {
    SYSTEM_FONTS.iter().find_map(load_font)
}

/// Formats a tick value with a precision suited to the colorbar range
pub fn format_tick(value: f64, span: f64) -> String {
    let magnitude = value.abs().max(span.abs());
    if magnitude != 0. && !(1e-3..1e5).contains(&magnitude) {
        format!("{:.2e}", value)
    } else {
        let digits = if span > 0. {
            (2. - span.log10().floor()).clamp(0., 6.) as usize
        } else {
            2
        };
        format!("{:.*}", digits, value)
    }
}

pub struct Colorbar {
    norm: Normalize,
    colormap: Colormap,
    n_tick: usize,
    font: Option<Font<'static>>,
}
impl Colorbar {
    pub fn new(
        norm: Normalize,
        colormap: Colormap,
        n_tick: usize,
        font: Option<Font<'static>>,
    ) -> Self {
        Self {
            norm,
            colormap,
            n_tick: n_tick.max(2),
            font,
        }
    }
    pub fn has_labels(&self) -> bool {
        self.font.is_some()
    }
    /// Ticks as (position in [0,1], label) pairs
    ///
    /// A degenerate range gets a single tick at the bottom.
    pub fn ticks(&self) -> Vec<(f64, String)> {
        let span = self.norm.span();
        if span > 0. {
            let ticks: Vec<(f64, f64)> = (0..self.n_tick)
                .map(|i| {
                    let t = i as f64 / (self.n_tick - 1) as f64;
                    (t, self.norm.value(t))
                })
                .collect();
            let mut labels: Vec<String> = ticks
                .iter()
                .map(|&(_, value)| format_tick(value, span))
                .collect();
            // narrow range around a large value, add digits until labels differ
            let mut precision = 3;
            while precision < 17 && labels.windows(2).any(|pair| pair[0] == pair[1]) {
                labels = ticks
                    .iter()
                    .map(|&(_, value)| format!("{:.*e}", precision, value))
                    .collect();
                precision += 1;
            }
            ticks
                .into_iter()
                .zip(labels)
                .map(|((t, _), label)| (t, label))
                .collect()
        } else {
            vec![(0., format_tick(self.norm.min, span))]
        }
    }
    fn scale() -> Scale {
        Scale::uniform(FONT_SIZE)
    }
    /// Width of the widest label [px], 0 without font
    pub fn label_width(&self) -> u32 {
        self.font
            .as_ref()
            .map(|font| {
                self.ticks()
                    .iter()
                    .map(|(_, label)| text_size(Self::scale(), font, label).0.max(0) as u32)
                    .max()
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
    /// Horizontal extent of the colorbar, strip, ticks and labels included [px]
    pub fn extent(&self) -> u32 {
        let label_width = self.label_width();
        BAR_WIDTH
            + TICK_LENGTH
            + if label_width > 0 {
                LABEL_PAD + label_width
            } else {
                0
            }
    }
    /// Row of the strip where the color at `t` is painted
    fn row(region: &Region, t: f64) -> u32 {
        let h = region.height.saturating_sub(1) as f64;
        region.y + ((1. - t) * h).round() as u32
    }
    /// Draws the colorbar with the strip in `region`
    pub fn draw(&self, image: &mut RgbImage, region: &Region) {
        let h = region.height;
        for k in 0..h {
            let t = if h > 1 {
                1. - k as f64 / (h - 1) as f64
            } else {
                1.
            };
            let color = Rgb(self.colormap.eval(t));
            for x in region.x..region.x + region.width {
                image.put_pixel(x, region.y + k, color);
            }
        }
        draw_hollow_rect_mut(
            image,
            Rect::at(region.x as i32 - 1, region.y as i32 - 1)
                .of_size(region.width + 2, region.height + 2),
            FOREGROUND,
        );

        let x_tick = (region.x + region.width) as f32;
        for (t, label) in self.ticks() {
            let y = Self::row(region, t);
            draw_line_segment_mut(
                image,
                (x_tick, y as f32),
                (x_tick + (TICK_LENGTH - 1) as f32, y as f32),
                FOREGROUND,
            );
            if let Some(font) = &self.font {
                let (_, text_height) = text_size(Self::scale(), font, &label);
                let x = (region.x + region.width + TICK_LENGTH + LABEL_PAD) as i32;
                let y = (y as i32 - text_height / 2).max(0);
                draw_text_mut(image, FOREGROUND, x, y, Self::scale(), font, &label);
            }
        }
    }
}
