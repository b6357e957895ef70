//! SVG preview of the screen adapter output.
//!
//! Draws every page as a scaled panel, stacked vertically with a label
//! above each: cells, blank-fill areas, image placements and dashed cut
//! guides. Cropped images are outlined with a solid edge on their bottom to
//! show where the source was cut.
//!
//! # Example
//!
//! ```
//! use nuplayout::{AssetId, ItemRef, Mode, PageConstants, PlanOptions, plan};
//! use nuplayout::{screen::render_screen, svg::render_preview_svg};
//!
//! let items = [ItemRef::new(AssetId(0), 1080, 2400)];
//! let doc = plan(&items, Mode::Nine, &PageConstants::a4(), PlanOptions::default()).unwrap();
//! let svg = render_preview_svg(&render_screen(&doc));
//! assert!(svg.starts_with("<svg"));
//! ```

use core::fmt::Write as _;

use crate::screen::{PercentRect, ScreenPage};

/// Maximum pixel width for any page panel.
const MAX_PANEL_W: f64 = 300.0;
/// Maximum pixel height for any page panel.
const MAX_PANEL_H: f64 = 300.0;
/// Vertical gap between panels.
const PANEL_GAP: f64 = 30.0;
/// Horizontal margin.
const MARGIN_X: f64 = 40.0;
/// Top margin for first panel.
const MARGIN_TOP: f64 = 20.0;
/// Height of label text area above each panel.
const LABEL_H: f64 = 22.0;

/// Render preview pages into a complete SVG document.
pub fn render_preview_svg(pages: &[ScreenPage]) -> String {
    if pages.is_empty() {
        return String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#);
    }

    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;
    let total_h = 2.0 * MARGIN_TOP
        + pages.len() as f64 * (LABEL_H + MAX_PANEL_H)
        + (pages.len() - 1) as f64 * PANEL_GAP;

    let mut svg = String::with_capacity(2048 + pages.len() * 1024);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    );

    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .page { fill: #ffffff; stroke: #999; stroke-width: 1; }
  .slot { fill: none; stroke: #ccc; stroke-width: 0.5; }
  .fill { fill: #f4f4f4; }
  .image { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  .cut { stroke: #c0392b; stroke-width: 1.5; }
  .guide { stroke: #aaa; stroke-width: 0.75; stroke-dasharray: 4,4; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .page { fill: #2d2d2d; stroke: #555; }
    .fill { fill: #3a3a3a; }
    .image { fill: #3a72a4; stroke: #5a9fd4; }
    .guide { stroke: #777; }
  }
</style>
"##,
    );

    let center_x = total_w / 2.0;
    let mut y = MARGIN_TOP;

    for page in pages {
        let orientation = if page.orientation.is_landscape() { "landscape" } else { "portrait" };
        let label = format!(
            "Page {}/{}  {}×{} {orientation}",
            page.index + 1,
            pages.len(),
            page.size.width,
            page.size.height
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            center_x,
            y + 14.0,
            escape_xml(&label)
        );
        y += LABEL_H;

        // Panel scaled to the page aspect ratio.
        let scale = (MAX_PANEL_W / page.size.width).min(MAX_PANEL_H / page.size.height);
        let pw = page.size.width * scale;
        let ph = page.size.height * scale;
        let panel = Panel {
            x: center_x - pw / 2.0,
            y,
            w: pw,
            h: ph,
        };

        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="page"/>"#,
            panel.x, panel.y, panel.w, panel.h
        );

        for slot in &page.slots {
            if let Some(fill) = &slot.fill {
                panel.rect(&mut svg, fill, "fill");
            }
            panel.rect(&mut svg, &slot.image.rect, "image");
            if slot.image.crop.is_some() {
                let r = &slot.image.rect;
                let (x1, yb) = panel.point(r.left, r.top + r.height);
                let (x2, _) = panel.point(r.left + r.width, r.top + r.height);
                let _ = writeln!(
                    svg,
                    r#"<line x1="{x1:.1}" y1="{yb:.1}" x2="{x2:.1}" y2="{yb:.1}" class="cut"/>"#
                );
            }
            panel.rect(&mut svg, &slot.slot_rect, "slot");
        }

        for guide in &page.guides {
            let (x1, y1) = panel.point(guide.from.x, guide.from.y);
            let (x2, y2) = panel.point(guide.to.x, guide.to.y);
            let _ = writeln!(
                svg,
                r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" class="guide"/>"#
            );
        }

        y += MAX_PANEL_H + PANEL_GAP;
    }

    svg.push_str("</svg>\n");
    svg
}

/// Pixel box a page is drawn into.
struct Panel {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Panel {
    /// Page percentages → panel pixels.
    fn point(&self, x_pct: f64, y_pct: f64) -> (f64, f64) {
        (self.x + x_pct / 100.0 * self.w, self.y + y_pct / 100.0 * self.h)
    }

    fn rect(&self, svg: &mut String, r: &PercentRect, class: &str) {
        let (x, y) = self.point(r.left, r.top);
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="{class}"/>"#,
            x,
            y,
            r.width / 100.0 * self.w,
            r.height / 100.0 * self.h
        );
    }
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
