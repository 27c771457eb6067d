/// Integration tests for the label pipeline.
///
/// These tests render real labels, so they need a TrueType font. Set
/// `LABELS_TEST_FONT` to a `.ttf` file, or install DejaVu Sans / Liberation
/// Sans. Tests that need a font are skipped when none is found.
///
/// ```bash
/// LABELS_TEST_FONT=/path/to/font.ttf cargo test --test label_pipeline_test
/// ```
use pretty_assertions::assert_eq;
use resistor_labels::{
    batch::generate_labels,
    config::Settings,
    label::{LabelOutcome, LabelRenderer},
    sheet::SheetAssembler,
};
use resvg::tiny_skia::Pixmap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:/Windows/Fonts/arial.ttf",
];

fn find_test_font() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("LABELS_TEST_FONT") {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

macro_rules! require_font {
    () => {
        match find_test_font() {
            Some(font) => font,
            None => {
                eprintln!("skipping: no TrueType font found (set LABELS_TEST_FONT)");
                return;
            }
        }
    };
}

fn settings_with(font: PathBuf, dir: &Path, values: Vec<u32>) -> Settings {
    Settings {
        font_path: font,
        resistor_values: values,
        output_dir: dir.join("labels"),
        pdf_path: dir.join("labels.pdf"),
        ..Settings::default()
    }
}

fn has_dark_pixel(pixmap: &Pixmap, rows: std::ops::Range<u32>) -> bool {
    rows.flat_map(|y| (0..pixmap.width()).map(move |x| (x, y)))
        .filter_map(|(x, y)| pixmap.pixel(x, y))
        .any(|px| px.red() < 128 && px.green() < 128 && px.blue() < 128)
}

/// Values [10, 100] with a usable font produce 10.png and 100.png of the
/// configured size.
#[test]
fn test_two_values_produce_two_labels() {
    let font = require_font!();
    let dir = TempDir::new().unwrap();
    let settings = settings_with(font, dir.path(), vec![10, 100]);

    let renderer = LabelRenderer::new(&settings);
    let report = generate_labels(&renderer, &settings.resistor_values, &settings.output_dir).unwrap();

    assert_eq!(report.written_count(), 2);
    let mut names: Vec<String> = fs::read_dir(&settings.output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["10.png".to_string(), "100.png".to_string()]);

    for name in names {
        let pixmap = Pixmap::load_png(settings.output_dir.join(name)).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (177, 177));
    }
}

/// Text ink lands inside the top band; with the resistor drawing disabled
/// nothing is drawn below it.
#[test]
fn test_text_stays_in_band() {
    let font = require_font!();
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        draw_resistor: false,
        ..settings_with(font, dir.path(), vec![1_000_000])
    };

    let renderer = LabelRenderer::new(&settings);
    let outcome = renderer.render(1_000_000, &settings.output_dir).unwrap();
    let path = outcome.written_path().expect("label should be written");
    let pixmap = Pixmap::load_png(path).unwrap();

    let band = renderer.layout().text_band_px.ceil() as u32;
    assert!(has_dark_pixel(&pixmap, 0..band));
    assert!(!has_dark_pixel(&pixmap, band + 1..pixmap.height()));
}

/// Re-rendering the same value overwrites the file with identical bytes.
#[test]
fn test_rendering_is_deterministic() {
    let font = require_font!();
    let dir = TempDir::new().unwrap();
    let settings = settings_with(font, dir.path(), vec![4700]);
    let renderer = LabelRenderer::new(&settings);

    renderer.render(4700, &settings.output_dir).unwrap();
    let first = fs::read(settings.output_dir.join("4700.png")).unwrap();
    renderer.render(4700, &settings.output_dir).unwrap();
    let second = fs::read(settings.output_dir.join("4700.png")).unwrap();

    assert!(first == second, "label bytes differ between runs");
}

/// Pixel size follows the configured millimeters and DPI.
#[test]
fn test_custom_label_size() {
    let font = require_font!();
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        dpi: 150,
        label_width_mm: 10.0,
        label_height_mm: 20.0,
        ..settings_with(font, dir.path(), vec![220])
    };

    let outcome = LabelRenderer::new(&settings)
        .render(220, &settings.output_dir)
        .unwrap();
    let pixmap = Pixmap::load_png(outcome.written_path().unwrap()).unwrap();

    assert_eq!((pixmap.width(), pixmap.height()), (59, 118));
}

/// Full catalog renders and lands on a single A4 sheet.
#[test]
fn test_full_pipeline_writes_sheet() {
    let font = require_font!();
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        font_path: font,
        output_dir: dir.path().join("labels"),
        pdf_path: dir.path().join("labels.pdf"),
        ..Settings::default()
    };

    let renderer = LabelRenderer::new(&settings);
    let report = generate_labels(&renderer, &settings.resistor_values, &settings.output_dir).unwrap();
    assert_eq!(report.written_count(), 30);

    let images: Vec<PathBuf> = report.written().map(Path::to_path_buf).collect();
    let pages = SheetAssembler::new(*renderer.layout())
        .assemble(&images, &settings.pdf_path)
        .unwrap();

    assert_eq!(pages, 1);
    assert!(fs::read(&settings.pdf_path).unwrap().starts_with(b"%PDF"));
}

/// An invalid font path produces no files and no errors.
#[test]
fn test_invalid_font_produces_nothing() {
    let dir = TempDir::new().unwrap();
    let settings = settings_with(dir.path().join("no-such-font.ttf"), dir.path(), vec![10, 100]);

    let renderer = LabelRenderer::new(&settings);
    let report = generate_labels(&renderer, &settings.resistor_values, &settings.output_dir).unwrap();

    assert_eq!(report.skipped_count(), 2);
    assert!(report
        .outcomes
        .iter()
        .all(|outcome| matches!(outcome, LabelOutcome::Skipped { .. })));
    assert_eq!(fs::read_dir(&settings.output_dir).unwrap().count(), 0);
    assert!(!settings.pdf_path.exists());
}
