//! Render one tattoo from the command line.
//!
//! ```text
//! cargo run --example render_text -- <text> <font-file> [color] [size] [output-dir]
//! RUST_LOG=debug cargo run --example render_text -- "Mom" fonts/Lobster.ttf "#AA0000" 120
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use tattoo_text::prelude::*;
use tattoo_text::request::DEFAULT_COLOR;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(text), Some(font)) = (args.next(), args.next()) else {
        eprintln!("usage: render_text <text> <font-file> [color] [size] [output-dir]");
        return ExitCode::FAILURE;
    };
    let color = args.next().unwrap_or_else(|| DEFAULT_COLOR.to_string());
    let size = args.next().map(|s| SizeInput::from(s.as_str())).unwrap_or_default();
    let output_dir = args.next().map(PathBuf::from);

    let mut config = RenderConfig::default();
    if let Some(dir) = output_dir {
        config = config.output_dir(dir);
    }

    let font_path = PathBuf::from(&font);
    let font_name = font_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("font")
        .to_string();

    let mut catalog = FontCatalog::new();
    catalog.register(font_name.clone(), font_path);

    let raw = RawRequest {
        text,
        font: font_name,
        color: Some(color),
        size,
    };
    let request = match RenderRequest::validate(raw, &config) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let job = match RenderJob::from_request(&request, &catalog) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let renderer = TattooRenderer::new(config);
    match renderer.render(&job.text, &job.font_path, job.color, job.size) {
        Ok(artifact) => {
            println!(
                "{} ({}x{}, ink {:?})",
                artifact.path.display(),
                artifact.width,
                artifact.height,
                artifact.metrics
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to generate tattoo image: {}", e);
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
