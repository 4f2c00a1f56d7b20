//! Painting: draws a projected [`DisplayList`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Everything it receives is already in screen space; it only produces pixels.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::HANDLE_SIZE_PX;
use crate::doc::ItemBody;
use crate::hit::is_resizable;
use crate::render::{DisplayEntry, DisplayList, DotGrid, ScreenRect};

/// Below this spacing the dot grid turns into noise and is skipped.
const MIN_VISIBLE_GRID_PX: f64 = 6.0;

/// Preview dash segment length in screen pixels.
const PREVIEW_DASH_PX: f64 = 6.0;

/// Base font size in world units.
const FONT_SIZE: f64 = 14.0;

/// Inner padding of cards and notes in world units.
const PADDING: f64 = 8.0;

/// Draw the full frame: grid, items bottom-first, then the drawing preview.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    list: &DisplayList<'_>,
    zoom: f64,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    draw_grid(ctx, list.grid, viewport_w, viewport_h);

    for entry in &list.entries {
        draw_entry(ctx, entry, zoom)?;
    }

    if let Some(preview) = list.preview {
        draw_preview(ctx, preview)?;
    }

    Ok(())
}

fn draw_grid(ctx: &CanvasRenderingContext2d, grid: DotGrid, viewport_w: f64, viewport_h: f64) {
    if grid.spacing < MIN_VISIBLE_GRID_PX {
        return;
    }
    ctx.set_fill_style_str("rgba(31, 26, 23, 0.18)");
    let mut y = grid.offset_y;
    while y < viewport_h {
        let mut x = grid.offset_x;
        while x < viewport_w {
            ctx.fill_rect(x - 1.0, y - 1.0, 2.0, 2.0);
            x += grid.spacing;
        }
        y += grid.spacing;
    }
}

// =============================================================
// Item dispatch
// =============================================================

fn draw_entry(ctx: &CanvasRenderingContext2d, entry: &DisplayEntry<'_>, zoom: f64) -> Result<(), JsValue> {
    let r = ScreenRect { x: entry.screen_x, y: entry.screen_y, width: entry.screen_width, height: entry.screen_height };

    match &entry.item.body {
        ItemBody::Rectangle { title } => draw_rectangle(ctx, r, title.as_deref(), zoom)?,
        ItemBody::Text { body } => draw_note(ctx, r, body, zoom)?,
        ItemBody::File { file_name, .. } => draw_file_card(ctx, r, file_name, zoom)?,
    }

    if is_resizable(entry.item) {
        draw_resize_handle(ctx, r);
    }
    Ok(())
}

fn draw_rectangle(ctx: &CanvasRenderingContext2d, r: ScreenRect, title: Option<&str>, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str("rgba(60, 64, 70, 0.06)");
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.set_stroke_style_str("#1F1A17");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(r.x, r.y, r.width, r.height);

    if let Some(title) = title {
        set_font(ctx, zoom, "600");
        ctx.set_fill_style_str("#1F1A17");
        ctx.set_text_baseline("top");
        let pad = PADDING * zoom;
        let fitted = fit_text_with_ellipsis(ctx, title, (r.width - pad * 2.0).max(1.0));
        ctx.fill_text(&fitted, r.x + pad, r.y + pad)?;
    }
    ctx.restore();
    Ok(())
}

fn draw_note(ctx: &CanvasRenderingContext2d, r: ScreenRect, body: &str, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str("#FFF6C7");
    ctx.fill_rect(r.x, r.y, r.width, r.height);

    set_font(ctx, zoom, "400");
    ctx.set_fill_style_str("#1F1A17");
    ctx.set_text_baseline("top");
    let pad = PADDING * zoom;
    let line_height = FONT_SIZE * 1.3 * zoom;
    let max_w = (r.width - pad * 2.0).max(1.0);
    let mut y = r.y + pad;
    for line in body.lines() {
        if y + line_height > r.y + r.height {
            break;
        }
        let fitted = fit_text_with_ellipsis(ctx, line, max_w);
        ctx.fill_text(&fitted, r.x + pad, y)?;
        y += line_height;
    }
    ctx.restore();
    Ok(())
}

fn draw_file_card(ctx: &CanvasRenderingContext2d, r: ScreenRect, file_name: &str, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str("#FFFFFF");
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.set_stroke_style_str("#C9C4BE");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(r.x, r.y, r.width, r.height);

    set_font(ctx, zoom, "400");
    ctx.set_fill_style_str("#1F1A17");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let fitted = fit_text_with_ellipsis(ctx, file_name, (r.width - PADDING * 2.0 * zoom).max(1.0));
    ctx.fill_text(&fitted, r.x + r.width * 0.5, r.y + r.height * 0.5)?;
    ctx.restore();
    Ok(())
}

fn draw_resize_handle(ctx: &CanvasRenderingContext2d, r: ScreenRect) {
    let half = HANDLE_SIZE_PX / 2.0;
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_stroke_style_str("#1E90FF");
    ctx.set_line_width(1.0);
    ctx.fill_rect(r.x + r.width - half, r.y + r.height - half, HANDLE_SIZE_PX, HANDLE_SIZE_PX);
    ctx.stroke_rect(r.x + r.width - half, r.y + r.height - half, HANDLE_SIZE_PX, HANDLE_SIZE_PX);
}

fn draw_preview(ctx: &CanvasRenderingContext2d, r: ScreenRect) -> Result<(), JsValue> {
    ctx.save();
    let dash_array = js_sys::Array::new();
    dash_array.push(&PREVIEW_DASH_PX.into());
    dash_array.push(&PREVIEW_DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.set_stroke_style_str("#1E90FF");
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.08)");
    ctx.set_line_width(1.0);
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.stroke_rect(r.x, r.y, r.width, r.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Text helpers
// =============================================================

fn set_font(ctx: &CanvasRenderingContext2d, zoom: f64, weight: &str) {
    let size = (FONT_SIZE * zoom).max(1.0);
    ctx.set_font(&format!("{weight} {size:.1}px sans-serif"));
}

fn fit_text_with_ellipsis(ctx: &CanvasRenderingContext2d, text: &str, max_w: f64) -> String {
    let trimmed = text.trim_end();
    if measured_text_width(ctx, trimmed) <= max_w {
        return trimmed.to_owned();
    }

    let ellipsis = "...";
    let mut chars: Vec<char> = trimmed.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}{}", chars.iter().collect::<String>().trim_end(), ellipsis);
        if measured_text_width(ctx, &candidate) <= max_w {
            return candidate;
        }
    }
    ellipsis.to_owned()
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => f64::INFINITY,
    }
}
