//! Window chrome and drop shadow layers.

use super::config::CompositionConfig;
use super::layout::Dimensions;
use crate::color::Rgb;
use crate::error::ComposeError;
use crate::raster::{Canvas, CornerRadii, Fill, Shape};
use image::{imageops, RgbaImage};

/// Traffic-light buttons: close, minimize, zoom.
const BUTTON_COLORS: [Rgb; 3] = [
    Rgb::new(0xff, 0x5f, 0x57),
    Rgb::new(0xfe, 0xbc, 0x2e),
    Rgb::new(0x28, 0xc8, 0x40),
];
const BUTTON_RADIUS: f32 = 6.0;
/// Centre of the first button, measured from the frame's left edge.
const BUTTON_FIRST_X: f32 = 20.0;
const BUTTON_SPACING: f32 = 20.0;

/// Gaussian sigma as a fraction of the configured blur radius.
const BLUR_SIGMA_RATIO: f32 = 0.25;

/// Frame panel with a title bar strip and three buttons, `frame` sized.
pub fn render_frame(frame: Dimensions, config: &CompositionConfig) -> Result<RgbaImage, ComposeError> {
    let mut canvas = Canvas::new(frame.width, frame.height)?;
    let (w, h) = (frame.width as f32, frame.height as f32);
    let radius = config.corner_radius as f32;
    let title_bar = (config.title_bar_height as f32).min(h);

    canvas.fill(
        &Shape::rounded_rect(0.0, 0.0, w, h, CornerRadii::all(radius)),
        &Fill::solid(config.theme.panel(), 255),
    );

    if title_bar > 0.0 {
        // Rounded only on its own top corners; the bottom edge meets the
        // screenshot square.
        canvas.fill(
            &Shape::rounded_rect(0.0, 0.0, w, title_bar, CornerRadii::top(radius)),
            &Fill::solid(config.theme.title_bar(), 255),
        );

        let cy = title_bar / 2.0;
        let r = BUTTON_RADIUS.min(title_bar / 2.0);
        for (i, color) in BUTTON_COLORS.iter().enumerate() {
            let cx = BUTTON_FIRST_X + BUTTON_SPACING * i as f32;
            canvas.fill(&Shape::circle(cx, cy, r), &Fill::solid(*color, 255));
        }
    }

    Ok(canvas.into_rgba_image())
}

/// Blurred, translucent rounded rectangle matching the frame.
///
/// The layer is `blur` pixels larger than the frame on each axis with the
/// rectangle inset by `blur / 2`, so placing it at the layout's shadow
/// offset lines the unblurred rectangle up with the configured offset.
pub fn render_shadow(frame: Dimensions, config: &CompositionConfig) -> Result<RgbaImage, ComposeError> {
    let blur = config.shadow_blur.max(0) as u32;
    let mut canvas = Canvas::new(frame.width + blur, frame.height + blur)?;
    let inset = blur as f32 / 2.0;

    canvas.fill(
        &Shape::rounded_rect(
            inset,
            inset,
            frame.width as f32,
            frame.height as f32,
            CornerRadii::all(config.corner_radius as f32),
        ),
        &Fill::solid(config.shadow_color, config.shadow_alpha()),
    );

    // Blur runs on straight alpha; give transparent pixels the shadow
    // color too so the edges don't fade toward black.
    let mut shape = canvas.into_rgba_image();
    let c = config.shadow_color;
    for px in shape.pixels_mut() {
        px[0] = c.r;
        px[1] = c.g;
        px[2] = c.b;
    }
    if blur == 0 {
        return Ok(shape);
    }
    Ok(imageops::blur(&shape, blur as f32 * BLUR_SIGMA_RATIO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::config::ChromeTheme;

    #[test]
    fn frame_has_frame_dimensions() {
        let img = render_frame(Dimensions::new(300, 232), &CompositionConfig::default()).unwrap();
        assert_eq!(img.dimensions(), (300, 232));
    }

    #[test]
    fn buttons_sit_in_the_title_bar() {
        let img = render_frame(Dimensions::new(300, 232), &CompositionConfig::default()).unwrap();
        let close = img.get_pixel(20, 16);
        let minimize = img.get_pixel(40, 16);
        let zoom = img.get_pixel(60, 16);
        assert_eq!(close.0, [0xff, 0x5f, 0x57, 255]);
        assert_eq!(minimize.0, [0xfe, 0xbc, 0x2e, 255]);
        assert_eq!(zoom.0, [0x28, 0xc8, 0x40, 255]);
    }

    #[test]
    fn title_bar_and_panel_use_theme_colors() {
        let config = CompositionConfig { theme: ChromeTheme::Light, ..Default::default() };
        let img = render_frame(Dimensions::new(300, 232), &config).unwrap();
        let t = ChromeTheme::Light.title_bar();
        let p = ChromeTheme::Light.panel();
        assert_eq!(img.get_pixel(150, 16).0, [t.r, t.g, t.b, 255]);
        assert_eq!(img.get_pixel(150, 100).0, [p.r, p.g, p.b, 255]);
    }

    #[test]
    fn frame_corners_are_rounded() {
        let img = render_frame(Dimensions::new(300, 232), &CompositionConfig::default()).unwrap();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(299, 231)[3], 0);
    }

    #[test]
    fn shadow_is_frame_plus_blur_and_translucent() {
        let config = CompositionConfig::default();
        let img = render_shadow(Dimensions::new(200, 100), &config).unwrap();
        assert_eq!(img.dimensions(), (230, 130));
        let centre = img.get_pixel(115, 65);
        assert!(centre[3] > 100 && centre[3] <= 128, "alpha {}", centre[3]);
        assert!(img.get_pixel(0, 0)[3] < 10);
    }

    #[test]
    fn zero_blur_shadow_is_sharp() {
        let config = CompositionConfig { shadow_blur: 0, corner_radius: 0, ..Default::default() };
        let img = render_shadow(Dimensions::new(10, 10), &config).unwrap();
        assert_eq!(img.dimensions(), (10, 10));
        assert!(img.pixels().all(|p| p[3] == 128));
    }
}
