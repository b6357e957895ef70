//! Import → plan → render, the way a host application drives the crate.

use std::ops::ControlFlow;

use nuplayout::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug, PartialEq)]
struct Px(PixelSize);

impl Bitmap for Px {
    fn dimensions(&self) -> PixelSize {
        self.0
    }

    fn crop(&self, rect: PixelRect) -> Self {
        Px(rect.size())
    }
}

/// Fake decoder: the first line of the content is `<w>x<h>`.
fn decode(file: &RawFile) -> Result<Px, DecodeError> {
    let text = std::str::from_utf8(&file.content)
        .map_err(|e| DecodeError::new(file.meta.name.clone(), e.to_string()))?;
    let header = text.lines().next().unwrap_or_default();
    let (w, h) = header
        .split_once('x')
        .ok_or_else(|| DecodeError::new(file.meta.name.clone(), "missing dimensions"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| DecodeError::new(file.meta.name.clone(), e.to_string()))
    };
    Ok(Px(PixelSize::new(parse(w)?, parse(h)?)))
}

fn screenshot(n: usize) -> RawFile {
    // Same dimensions, different bodies: size collisions resolved by content.
    RawFile::new(
        format!("Screenshot_{n:03}.png"),
        Some(1_700_000_000_000 + n as u64),
        format!("1080x2400\n{n:08}").into_bytes(),
    )
}

#[test]
fn screenshots_nine_up_end_to_end() {
    init_tracing();
    let mut session = Session::new(LayoutConfig::default());
    let report = session.add_assets((0..11).map(screenshot).collect(), &mut decode).unwrap();
    assert_eq!(report.added.len(), 11);
    assert!(report.skipped_duplicates.is_empty());

    let doc = session.plan().unwrap();
    assert_eq!(session.mode(), Mode::Nine);
    assert_eq!(doc.pages.len(), 2);
    assert_eq!(doc.pages[1].items.len(), 2);
    assert!(doc.items().all(|p| p.fit.needs_crop()));

    let screen = render_screen(&doc);
    assert_eq!(screen[0].slots.len(), 9);
    assert!(screen[0].slots[0].image.to_css().contains("object-position:top center"));

    let mut recorder = CommandRecorder::new();
    let style = session.config().document_style();
    let Ok(summary) = render_document(&doc, |id| session.bitmap(id), &mut recorder, &style);
    assert_eq!(
        summary,
        RenderSummary {
            pages: 2,
            images: 11,
            fills: 0,
            guides: 8,
            missing: 0,
        }
    );

    // Every drawn bitmap was pre-cropped to the cell's aspect ratio.
    let cell = doc.grid.cell;
    for cmd in &recorder.commands {
        if let DrawCommand::DrawImage { rect, pixels } = cmd {
            assert_eq!(pixels.width, 1080);
            assert!(pixels.height < 2400);
            let drawn = pixels.width as f64 / pixels.height as f64;
            assert!((drawn - cell.width / cell.height).abs() < 0.01, "{drawn}");
            assert!((rect.width - cell.width).abs() < 1e-9);
        }
    }
}

#[test]
fn mixed_batch_four_up() {
    init_tracing();
    let mut session = Session::new(LayoutConfig::default().default_mode(Mode::Four));
    let files = vec![
        RawFile::new("scan-1.jpg", Some(1), "2480x3508".as_bytes()),
        RawFile::new("scan-1.jpg", Some(1), "2480x3508".as_bytes()),
        RawFile::new("notes.txt", Some(2), "hello".as_bytes()),
        RawFile::new("photo.jpg", Some(3), "4000x3000".as_bytes()),
        RawFile::new("panorama.jpg", Some(4), "8000x1000".as_bytes()),
    ];
    let report = session.add_assets(files, &mut decode).unwrap();
    assert_eq!(report.added.len(), 3);
    assert_eq!(report.skipped_duplicates.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "notes.txt");

    let doc = session.plan().unwrap();
    assert_eq!(doc.policy, FitPolicy::Contain);
    assert_eq!(doc.grid.page.orientation, Orientation::Landscape);
    for item in doc.items() {
        assert!(!item.fit.needs_crop());
        assert!(item.cell.contains(&item.image, 1e-9));
    }

    let mut recorder = CommandRecorder::new();
    let Ok(summary) = render_document(
        &doc,
        |id| session.bitmap(id),
        &mut recorder,
        &DocumentStyle::default(),
    );
    assert_eq!(summary.images, 3);
    // Every letterboxed image gets its cell painted first.
    assert_eq!(summary.fills, doc.items().filter(|p| p.fit.needs_fill()).count());
}

#[test]
fn remove_then_replan() {
    let mut session = Session::new(LayoutConfig::default().default_mode(Mode::Two));
    session.add_assets((0..3).map(screenshot).collect(), &mut decode).unwrap();
    assert_eq!(session.plan().unwrap().pages.len(), 2);

    let removed = session.remove_asset(0).unwrap();
    assert_eq!(removed.id, AssetId(0));
    let doc = session.plan().unwrap();
    assert_eq!(doc.pages.len(), 1);
    let ids: Vec<AssetId> = doc.items().map(|p| p.id).collect();
    assert_eq!(ids, vec![AssetId(1), AssetId(2)]);
}

#[test]
fn progress_and_cancel() {
    let mut session = Session::new(LayoutConfig::default());
    let mut seen = Vec::new();
    let report = session
        .add_assets_with((0..5).map(screenshot).collect(), &mut decode, |p| {
            seen.push((p.done, p.total));
            if p.done == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
    assert_eq!(seen, vec![(1, 5), (2, 5), (3, 5)]);
    assert!(report.cancelled);
    assert_eq!(session.len(), 3);
}

#[test]
fn missing_bitmap_is_counted() {
    let items = [ItemRef::new(AssetId(0), 100, 100), ItemRef::new(AssetId(9), 100, 100)];
    let doc = plan(&items, Mode::Nine, &PageConstants::a4(), PlanOptions::default()).unwrap();
    let only = Px(PixelSize::new(100, 100));
    let mut recorder = CommandRecorder::new();
    let Ok(summary) = render_document(
        &doc,
        |id| (id == AssetId(0)).then_some(&only),
        &mut recorder,
        &DocumentStyle::default(),
    );
    assert_eq!(summary.images, 1);
    assert_eq!(summary.missing, 1);
}

#[cfg(feature = "svg")]
#[test]
fn session_preview_svg() {
    let mut session = Session::new(LayoutConfig::default());
    session.add_assets((0..4).map(screenshot).collect(), &mut decode).unwrap();
    let svg = svg::render_preview_svg(&render_screen(&session.plan().unwrap()));
    assert_eq!(svg.matches(r#"class="image""#).count(), 4);
}
