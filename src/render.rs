//! Rasterizes the session panels into PNG figures.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use ndarray::ArrayView2;
use palette::Srgb;

use crate::reconstruct::Stats;
use crate::session::LAYOUT;
use crate::{Panel, Result, Session, FIGURE_TITLE};

const MARGIN: u32 = 16;
const CONTROL_BAR_HEIGHT: u32 = 64;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BUTTON_FACE: Rgb<u8> = Rgb([217, 217, 217]);
const BUTTON_EDGE: Rgb<u8> = Rgb([96, 96, 96]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    Gray,
    Viridis,
    Hot,
}

impl Colormap {
    /// Maps a value in `[0, 1]` to a colour, values outside are clamped.
    pub fn rgb(self, value: f64) -> Rgb<u8> {
        let value = if value.is_nan() { 0.0 } else { value.min(1.0).max(0.0) };
        match self {
            Colormap::Gray => {
                // linear in encoded sRGB, no gamma applied
                let colour = Srgb::new(value, value, value);
                Rgb([
                    (colour.red * 255.0).round() as u8,
                    (colour.green * 255.0).round() as u8,
                    (colour.blue * 255.0).round() as u8,
                ])
            }
            Colormap::Viridis => {
                let colour = colorous::VIRIDIS.eval_continuous(value);
                Rgb([colour.r, colour.g, colour.b])
            }
            Colormap::Hot => {
                // black, red, yellow, white
                let ramp = |lo: f64, hi: f64| ((value - lo) / (hi - lo)).min(1.0).max(0.0);
                Rgb([
                    (ramp(0.0, 0.365079) * 255.0).round() as u8,
                    (ramp(0.365079, 0.746032) * 255.0).round() as u8,
                    (ramp(0.746032, 1.0) * 255.0).round() as u8,
                ])
            }
        }
    }
}

/// Range of data values spanned by a colormap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorLimits {
    /// From the minimum to the maximum of the panel data
    DataRange,
    Fixed(f64, f64),
}

impl ColorLimits {
    pub fn resolve(self, arr: ArrayView2<f64>) -> (f64, f64) {
        match self {
            ColorLimits::DataRange => {
                let Stats { min, max, .. } = Stats::of(arr);
                (min, max)
            }
            ColorLimits::Fixed(lo, hi) => (lo, hi),
        }
    }
}

/// Scales `value` into `[0, 1]`; a degenerate range maps everything to 0.
pub fn normalise(value: f64, (lo, hi): (f64, f64)) -> f64 {
    let span = hi - lo;
    if !(span > 0.0) || !span.is_finite() {
        0.0
    } else {
        ((value - lo) / span).min(1.0).max(0.0)
    }
}

pub fn render_panel(panel: &Panel) -> RgbImage {
    let (h, w) = panel.data.dim();
    let limits = panel.limits.resolve(panel.data.view());

    let mut img = RgbImage::new(w as u32, h as u32);
    for (x, y, p) in img.enumerate_pixels_mut() {
        let value = normalise(panel.data[[y as usize, x as usize]], limits);
        *p = panel.colormap.rgb(value);
    }
    img
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, colour: Rgb<u8>) {
    let x1 = (x0 + w).min(img.width());
    let y1 = (y0 + h).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, colour);
        }
    }
}

fn draw_button(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
    fill_rect(img, x0, y0, w, h, BUTTON_EDGE);
    if w > 2 && h > 2 {
        fill_rect(img, x0 + 1, y0 + 1, w - 2, h - 2, BUTTON_FACE);
    }
}

/// Draws every panel on a 2x3 grid above a bar holding the improve and reset buttons.
///
/// The improve button carries one tick per improve step.
pub fn render_figure(session: &Session) -> RgbImage {
    let (rows, cols) = (LAYOUT.0 as u32, LAYOUT.1 as u32);
    let panels = session.panels();
    let cell = session.params().grid_size as u32;

    let width = cols * cell + (cols + 1) * MARGIN;
    let grid_height = rows * cell + (rows + 1) * MARGIN;
    let height = grid_height + CONTROL_BAR_HEIGHT;
    let mut figure = RgbImage::from_pixel(width, height, BACKGROUND);

    for (i, panel) in panels.iter().enumerate() {
        let (row, col) = (i as u32 / cols, i as u32 % cols);
        let x0 = MARGIN + col * (cell + MARGIN);
        let y0 = MARGIN + row * (cell + MARGIN);
        let tile = render_panel(panel);
        for (x, y, p) in tile.enumerate_pixels() {
            if x0 + x < width && y0 + y < grid_height {
                figure.put_pixel(x0 + x, y0 + y, *p);
            }
        }
    }

    // buttons at 30% and 55% of the width, each 15% wide
    let button_w = (width as f64 * 0.15) as u32;
    let button_h = CONTROL_BAR_HEIGHT / 2;
    let button_y = grid_height + (CONTROL_BAR_HEIGHT - button_h) / 2;
    let improve_x = (width as f64 * 0.3) as u32;
    let reset_x = (width as f64 * 0.55) as u32;
    draw_button(&mut figure, improve_x, button_y, button_w, button_h);
    draw_button(&mut figure, reset_x, button_y, button_w, button_h);

    let tick = 4;
    let max_ticks = button_w.saturating_sub(tick) / (2 * tick);
    for i in 0..(session.improve_count() as u32).min(max_ticks) {
        fill_rect(
            &mut figure,
            improve_x + tick + 2 * tick * i,
            button_y + button_h / 2 - tick / 2,
            tick,
            tick,
            BUTTON_EDGE,
        );
    }

    figure
}

/// File name for a panel, e.g. `apparent_image_after_cloaking.png`.
pub fn panel_file_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 4);
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    while name.ends_with('_') {
        name.pop();
    }
    name.push_str(".png");
    name
}

pub fn save_figure<P: AsRef<Path>>(path: P, session: &Session) -> Result<()> {
    let figure = render_figure(session);
    log::info!(
        "{} ({} iterations) - {:?}",
        FIGURE_TITLE,
        session.iterations(),
        path.as_ref()
    );
    figure.save(path)?;
    Ok(())
}

/// Writes each panel to its own file in `dir`, returning the paths written.
pub fn save_panels<P: AsRef<Path>>(dir: P, session: &Session) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir.as_ref())?;
    let mut paths = Vec::with_capacity(session.panels().len());
    for panel in session.panels() {
        let path = dir.as_ref().join(panel_file_name(panel.title));
        let (lo, hi) = panel.limits.resolve(panel.data.view());
        log::debug!("{}: limits [{}, {}] - {:?}", panel.title, lo, hi, path);
        render_panel(panel).save(&path)?;
        paths.push(path);
    }
    Ok(paths)
}
