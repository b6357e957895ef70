//! Document adapter: turns a [`DocumentPlan`] into draw commands for an
//! external document writer, in absolute physical units.
//!
//! The writer only knows how to draw a whole bitmap into a rectangle, so a
//! cropped item is pre-cropped here and the cropped bitmap is drawn at the
//! placement rectangle. Per item the order is: blank-fill, then image.
//! Guides are stroked after all items of the page.

use core::convert::Infallible;

use crate::geometry::{CanvasColor, PixelRect, PixelSize, Point, Rect, Size};
use crate::plan::{AssetId, DocumentPlan, PlacedItem};

/// A decoded pixel source the document adapter can crop.
pub trait Bitmap {
    fn dimensions(&self) -> PixelSize;

    /// Copy of the given sub-region.
    fn crop(&self, rect: PixelRect) -> Self
    where
        Self: Sized;
}

#[cfg(feature = "image")]
impl Bitmap for image::DynamicImage {
    fn dimensions(&self) -> PixelSize {
        PixelSize::new(self.width(), self.height())
    }

    fn crop(&self, rect: PixelRect) -> Self {
        self.crop_imm(rect.x, rect.y, rect.width, rect.height)
    }
}

/// Stroke used for cut guides.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuideStyle {
    pub color: CanvasColor,
    /// Line width in physical units.
    pub width: f64,
    /// Dash length and gap length in physical units.
    pub dash: (f64, f64),
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self {
            color: CanvasColor::gray(170),
            width: 0.3,
            dash: (3.0, 3.0),
        }
    }
}

/// Paint settings for [`render_document`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DocumentStyle {
    /// Blank-fill color.
    pub background: CanvasColor,
    pub guide: GuideStyle,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            background: CanvasColor::white(),
            guide: GuideStyle::default(),
        }
    }
}

/// Low-level primitives of a document/PDF writer.
///
/// Coordinates are physical units with the origin at the page's top-left.
pub trait DocumentWriter {
    type Error;

    /// Start a new page of the given effective size.
    fn begin_page(&mut self, index: usize, size: Size) -> Result<(), Self::Error>;

    /// Draw the whole bitmap scaled into `rect`.
    fn draw_image<B: Bitmap>(&mut self, rect: Rect, bitmap: &B) -> Result<(), Self::Error>;

    /// Paint an opaque rectangle.
    fn fill_rect(&mut self, rect: Rect, color: CanvasColor) -> Result<(), Self::Error>;

    fn stroke_dashed_line(
        &mut self,
        from: Point,
        to: Point,
        style: &GuideStyle,
    ) -> Result<(), Self::Error>;
}

/// A recorded writer call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawCommand {
    BeginPage { index: usize, size: Size },
    /// `pixels` are the dimensions of the bitmap actually drawn, after any
    /// pre-crop.
    DrawImage { rect: Rect, pixels: PixelSize },
    FillRect { rect: Rect, color: CanvasColor },
    StrokeDashedLine {
        from: Point,
        to: Point,
        style: GuideStyle,
    },
}

/// [`DocumentWriter`] that records the command stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands grouped per page.
    pub fn pages(&self) -> Vec<&[DrawCommand]> {
        let starts: Vec<usize> = self
            .commands
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, DrawCommand::BeginPage { .. }))
            .map(|(i, _)| i)
            .collect();
        starts
            .iter()
            .enumerate()
            .map(|(n, &start)| {
                let end = starts.get(n + 1).copied().unwrap_or(self.commands.len());
                &self.commands[start..end]
            })
            .collect()
    }
}

impl DocumentWriter for CommandRecorder {
    type Error = Infallible;

    fn begin_page(&mut self, index: usize, size: Size) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::BeginPage { index, size });
        Ok(())
    }

    fn draw_image<B: Bitmap>(&mut self, rect: Rect, bitmap: &B) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::DrawImage {
            rect,
            pixels: bitmap.dimensions(),
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: CanvasColor) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::FillRect { rect, color });
        Ok(())
    }

    fn stroke_dashed_line(&mut self, from: Point, to: Point, style: &GuideStyle) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::StrokeDashedLine {
            from,
            to,
            style: *style,
        });
        Ok(())
    }
}

/// Counts of what [`render_document`] emitted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub images: usize,
    pub fills: usize,
    pub guides: usize,
    /// Items whose bitmap the lookup could not provide.
    pub missing: usize,
}

/// Emit the whole plan to `writer`.
///
/// `lookup` resolves an asset id to its bitmap; an unresolved id is
/// counted in [`RenderSummary::missing`] and its slot is left empty.
pub fn render_document<'a, B, W, F>(
    plan: &DocumentPlan,
    mut lookup: F,
    writer: &mut W,
    style: &DocumentStyle,
) -> Result<RenderSummary, W::Error>
where
    B: Bitmap + 'a,
    W: DocumentWriter,
    F: FnMut(AssetId) -> Option<&'a B>,
{
    let mut summary = RenderSummary::default();
    for page in &plan.pages {
        writer.begin_page(page.index, page.size)?;
        summary.pages += 1;

        for item in &page.items {
            let Some(bitmap) = lookup(item.id) else {
                tracing::warn!(id = item.id.0, item_index = item.slot.item_index, "bitmap missing");
                summary.missing += 1;
                continue;
            };
            if let Some(fill) = item.fill {
                writer.fill_rect(fill, style.background)?;
                summary.fills += 1;
            }
            draw_item(writer, item, bitmap)?;
            summary.images += 1;
        }

        for guide in &page.guides {
            writer.stroke_dashed_line(guide.from, guide.to, &style.guide)?;
            summary.guides += 1;
        }
        tracing::debug!(page = page.index, items = page.items.len(), "page emitted");
    }
    Ok(summary)
}

fn draw_item<B: Bitmap, W: DocumentWriter>(writer: &mut W, item: &PlacedItem, bitmap: &B) -> Result<(), W::Error> {
    let dims = bitmap.dimensions();
    let crop = item
        .fit
        .crop
        .map(|c| c.to_pixels(dims))
        .filter(|r| !r.is_full(dims));
    match crop {
        Some(rect) => writer.draw_image(item.image, &bitmap.crop(rect)),
        None => writer.draw_image(item.image, bitmap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Mode, PageConstants};
    use crate::plan::{ItemRef, PlanOptions, plan};

    /// Dimensions-only bitmap.
    #[derive(Clone, Debug, PartialEq)]
    struct Blank(PixelSize);

    impl Bitmap for Blank {
        fn dimensions(&self) -> PixelSize {
            self.0
        }

        fn crop(&self, rect: PixelRect) -> Self {
            Blank(rect.size())
        }
    }

    #[test]
    fn tall_screenshot_is_precropped() {
        let bitmap = Blank(PixelSize::new(1080, 2400));
        let items = [ItemRef::new(AssetId(1), 1080, 2400)];
        let doc = plan(&items, Mode::Nine, &PageConstants::a4(), PlanOptions::default().guides(false)).unwrap();
        let mut rec = CommandRecorder::new();
        let summary = render_document(&doc, |_| Some(&bitmap), &mut rec, &DocumentStyle::default()).unwrap();
        assert_eq!(summary, RenderSummary { pages: 1, images: 1, ..Default::default() });

        let DrawCommand::DrawImage { rect, pixels } = rec.commands[1] else {
            panic!("expected image, got {:?}", rec.commands[1]);
        };
        assert_eq!(pixels.width, 1080);
        assert!(pixels.height < 2400);
        assert!(rect.approx_eq(&doc.grid.cell_rect(0, 0), 1e-9));
    }

    #[test]
    fn short_image_fill_precedes_image() {
        let bitmap = Blank(PixelSize::new(2000, 1000));
        let items = [ItemRef::new(AssetId(1), 2000, 1000)];
        let doc = plan(&items, Mode::Six, &PageConstants::a4(), PlanOptions::default()).unwrap();
        let mut rec = CommandRecorder::new();
        let summary = render_document(&doc, |_| Some(&bitmap), &mut rec, &DocumentStyle::default()).unwrap();
        assert_eq!(summary.fills, 1);
        assert_eq!(summary.guides, 3);
        assert!(matches!(
            rec.commands[1],
            DrawCommand::FillRect { color, .. } if color == CanvasColor::white()
        ));
        assert!(matches!(rec.commands[2], DrawCommand::DrawImage { pixels, .. } if pixels == PixelSize::new(2000, 1000)));
        assert!(rec.commands[3..]
            .iter()
            .all(|c| matches!(c, DrawCommand::StrokeDashedLine { style, .. } if style.dash == (3.0, 3.0))));
    }

    #[test]
    fn missing_bitmap_is_counted() {
        let bitmap = Blank(PixelSize::new(10, 10));
        let items = [ItemRef::new(AssetId(1), 10, 10), ItemRef::new(AssetId(2), 10, 10)];
        let doc = plan(&items, Mode::Two, &PageConstants::a4(), PlanOptions::default()).unwrap();
        let mut rec = CommandRecorder::new();
        let summary = render_document(
            &doc,
            |id| (id == AssetId(1)).then_some(&bitmap),
            &mut rec,
            &DocumentStyle::default(),
        )
        .unwrap();
        assert_eq!(summary.images, 1);
        assert_eq!(summary.missing, 1);
    }

    #[cfg(feature = "image")]
    #[test]
    fn dynamic_image_keeps_top_rows() {
        use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};

        // Red band on top, blue below.
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(100, 300, |_, y| {
            if y < 10 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        }));
        let items = [ItemRef::new(AssetId(0), 100, 300)];
        let doc = plan(&items, Mode::Nine, &PageConstants::a4(), PlanOptions::default()).unwrap();
        let mut rec = CommandRecorder::new();
        let summary = render_document(&doc, |_| Some(&img), &mut rec, &DocumentStyle::default()).unwrap();
        assert_eq!(summary.images, 1);

        let rect = doc.pages[0].items[0].source_crop().unwrap();
        assert_eq!((rect.x, rect.y, rect.width), (0, 0, 100));
        assert!(rect.height < 300);
        assert!(matches!(rec.commands[1], DrawCommand::DrawImage { pixels, .. } if pixels == rect.size()));

        let cropped = Bitmap::crop(&img, rect);
        assert_eq!((cropped.width(), cropped.height()), (100, rect.height));
        assert_eq!(cropped.get_pixel(50, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(cropped.get_pixel(50, rect.height - 1), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn recorder_groups_pages() {
        let bitmap = Blank(PixelSize::new(10, 10));
        let items: Vec<ItemRef> = (0..5).map(|i| ItemRef::new(AssetId(i), 10, 10)).collect();
        let doc = plan(&items, Mode::Four, &PageConstants::a4(), PlanOptions::default()).unwrap();
        let mut rec = CommandRecorder::new();
        render_document(&doc, |_| Some(&bitmap), &mut rec, &DocumentStyle::default()).unwrap();
        let pages = rec.pages();
        assert_eq!(pages.len(), 2);
        assert!(matches!(pages[1][0], DrawCommand::BeginPage { index: 1, .. }));
    }
}
