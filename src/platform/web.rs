//! Browser platform pieces
//!
//! DOM lookups, the font-load phase, label rasterization on a 2D canvas, and
//! opening the outbound link. Everything returns [`PlatformError`] so the
//! bootstrap can fail once, loudly, before the frame loop starts.

use std::fmt;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::consts::MAX_PIXEL_RATIO;
use crate::driver::Navigator;
use crate::renderer::GpuError;
use crate::scene::{LabelBitmap, LabelLayout, label_font};

/// Fatal startup errors
#[derive(Debug)]
pub enum PlatformError {
    NoWindow,
    NoDocument,
    NoBody,
    /// 2D canvas context unavailable
    NoContext2d,
    /// `document.fonts.load` rejected
    FontLoad(String),
    /// Label pixels did not match the canvas size
    LabelPixels { width: u32, height: u32, len: usize },
    Gpu(GpuError),
    /// Any other JS exception
    Js(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::NoWindow => write!(f, "No global window"),
            PlatformError::NoDocument => write!(f, "Window has no document"),
            PlatformError::NoBody => write!(f, "Document has no body"),
            PlatformError::NoContext2d => write!(f, "2D canvas context unavailable"),
            PlatformError::FontLoad(e) => write!(f, "Font failed to load: {}", e),
            PlatformError::LabelPixels { width, height, len } => write!(
                f,
                "Label canvas is {}x{} but returned {} bytes",
                width, height, len
            ),
            PlatformError::Gpu(e) => write!(f, "{}", e),
            PlatformError::Js(e) => write!(f, "JavaScript error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlatformError::Gpu(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GpuError> for PlatformError {
    fn from(e: GpuError) -> Self {
        PlatformError::Gpu(e)
    }
}

impl From<JsValue> for PlatformError {
    fn from(value: JsValue) -> Self {
        PlatformError::Js(js_error_string(&value))
    }
}

fn js_error_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub fn window() -> Result<Window, PlatformError> {
    web_sys::window().ok_or(PlatformError::NoWindow)
}

pub fn document(window: &Window) -> Result<Document, PlatformError> {
    window.document().ok_or(PlatformError::NoDocument)
}

/// Window size in CSS pixels and the capped device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css_width: f32,
    pub css_height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn of(window: &Window) -> Self {
        let css_width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let css_height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let pixel_ratio = window.device_pixel_ratio().min(MAX_PIXEL_RATIO);
        Self {
            css_width: css_width.max(1.0) as f32,
            css_height: css_height.max(1.0) as f32,
            pixel_ratio: pixel_ratio as f32,
        }
    }

    pub fn css_size(&self) -> (f32, f32) {
        (self.css_width, self.css_height)
    }

    /// Drawing buffer size in physical pixels
    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.css_width * self.pixel_ratio) as u32,
            (self.css_height * self.pixel_ratio) as u32,
        )
    }
}

/// Create the full-window canvas and append it to `<body>`
pub fn create_canvas(document: &Document, viewport: &Viewport) -> Result<HtmlCanvasElement, PlatformError> {
    let canvas = new_canvas(document)?;
    canvas.set_id("stillness");
    size_canvas(&canvas, viewport);
    document
        .body()
        .ok_or(PlatformError::NoBody)?
        .append_child(&canvas)?;
    Ok(canvas)
}

/// Match the canvas to the viewport (CSS size via stylesheet, buffer size here)
pub fn size_canvas(canvas: &HtmlCanvasElement, viewport: &Viewport) {
    let (width, height) = viewport.buffer_size();
    canvas.set_width(width);
    canvas.set_height(height);
}

/// Wait for a font face to finish loading
pub async fn load_font(document: &Document, query: &str) -> Result<(), PlatformError> {
    let promise = document.fonts().load(query)?;
    JsFuture::from(promise)
        .await
        .map_err(|e| PlatformError::FontLoad(js_error_string(&e)))?;
    Ok(())
}

/// Draw `text` white on a transparent canvas and read the pixels back
pub fn rasterize_label(document: &Document, text: &str) -> Result<(LabelLayout, LabelBitmap), PlatformError> {
    let canvas = new_canvas(document)?;
    let ctx = context_2d(&canvas)?;
    let font = label_font();

    ctx.set_font(&font);
    let metrics = ctx.measure_text(text)?;
    let layout = LabelLayout::from_text_width(metrics.width() as f32);

    // Resizing the canvas resets its state, font included
    canvas.set_width(layout.canvas_width);
    canvas.set_height(layout.canvas_height);
    ctx.set_font(&font);
    ctx.set_fill_style_str("white");
    ctx.fill_text(
        text,
        layout.text_origin.x as f64,
        layout.text_origin.y as f64,
    )?;

    let image = ctx.get_image_data(
        0.0,
        0.0,
        layout.canvas_width as f64,
        layout.canvas_height as f64,
    )?;
    let pixels = image.data().0;
    let len = pixels.len();
    let bitmap = LabelBitmap::new(layout.canvas_width, layout.canvas_height, pixels).ok_or(
        PlatformError::LabelPixels {
            width: layout.canvas_width,
            height: layout.canvas_height,
            len,
        },
    )?;

    log::info!(
        "Label laid out: text {:.1}px wide, canvas {}x{}",
        layout.text_width,
        layout.canvas_width,
        layout.canvas_height
    );
    Ok((layout, bitmap))
}

fn new_canvas(document: &Document) -> Result<HtmlCanvasElement, PlatformError> {
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| PlatformError::Js("created element is not a canvas".to_string()))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, PlatformError> {
    canvas
        .get_context("2d")?
        .ok_or(PlatformError::NoContext2d)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| PlatformError::NoContext2d)
}

/// Opens links with `window.open`
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn open(&mut self, url: &str, target: &str) {
        let Some(window) = web_sys::window() else {
            log::warn!("No window to open {} in", url);
            return;
        };
        if let Err(e) = window.open_with_url_and_target(url, target) {
            log::warn!("window.open failed: {}", js_error_string(&e));
        }
    }
}
