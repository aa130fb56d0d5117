use tattoo_text::{Color, RenderConfig, TattooRenderer};
use visual_tests::{
    compare_rgb, find_test_font, run_visual_test, should_update_references, update_reference,
    VisualTestConfig, VisualTestOutcome,
};

/// Helper macro to generate visual test functions
macro_rules! visual_test {
    ($name:ident, $text:literal, $color:literal, $size:literal) => {
        #[test]
        fn $name() {
            let Some(font) = find_test_font() else {
                eprintln!("skipping {}: no test font found", stringify!($name));
                return;
            };
            let color = Color::parse($color).expect("valid color");
            let config = VisualTestConfig::new(stringify!($name), $text, &font, color, $size);

            if should_update_references() {
                update_reference(&config).expect("Failed to update reference");
                return;
            }

            let result = match run_visual_test(&config).expect("Visual test failed to run") {
                VisualTestOutcome::Recorded(path) => {
                    eprintln!("Recorded new baseline: {}", path.display());
                    return;
                }
                VisualTestOutcome::Compared(result) => result,
            };

            assert!(
                result.passed,
                "Visual regression detected for '{}': similarity {:.4}% (threshold: 99.9%), \
                 {} pixels differ\n\
                 Reference: {}\n\
                 Captured:  {}\n\
                 Diff:      {}",
                stringify!($name),
                result.similarity * 100.0,
                result.differing_pixels,
                result.reference_path.display(),
                result.captured_path.display(),
                result
                    .diff_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "N/A".to_string())
            );
        }
    };
}

visual_test!(test_red_hi, "Hi", "#FF0000", 100);
visual_test!(test_descenders, "gjpqy", "#000000", 80);
visual_test!(test_small_text, "forever", "navy", 12);
visual_test!(test_large_text, "Mom", "#3366CC", 200);
visual_test!(test_mixed_case, "Tattoo Ink", "#800080", 64);

#[test]
fn test_renders_are_self_similar() {
    let Some(font) = find_test_font() else {
        return;
    };
    let renderer = TattooRenderer::new(RenderConfig::default());

    let a = renderer.rasterize("Always", &font, Color::BLACK, 72).unwrap();
    let b = renderer.rasterize("Always", &font, Color::BLACK, 72).unwrap();
    let result = compare_rgb(&a.image, &b.image).unwrap();
    assert!(result.similarity > 0.9999);
    assert_eq!(result.differing_pixels, 0);
}

#[test]
fn test_color_change_is_detected() {
    let Some(font) = find_test_font() else {
        return;
    };
    let renderer = TattooRenderer::new(RenderConfig::default());

    let black = renderer.rasterize("Ink", &font, Color::BLACK, 96).unwrap();
    let red = renderer.rasterize("Ink", &font, Color::rgb(255, 0, 0), 96).unwrap();
    let result = compare_rgb(&black.image, &red.image).unwrap();
    assert!(result.differing_pixels > 0);
}
