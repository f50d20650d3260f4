pub mod cli;
pub mod error;
pub mod model;
pub mod parser;
pub mod validate;
pub mod writer;

pub use error::{DocumentError, Result};
pub use model::MapDocument;
pub use parser::{DecodeOptions, decode, decode_with, load};
pub use writer::{EncodeOptions, emit, encode};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use cli::Command;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Check { input, strict } => {
            let doc = parser::load(&input, &decode_options(strict))
                .with_context(|| format!("Loading {}", input.display()))?;
            let problems = validate::validate_document(&doc);
            for problem in &problems {
                warn!("{problem}");
            }
            println!(
                "{}: {} cameras, {} collisions, {} value warnings",
                input.display(),
                doc.cameras.len(),
                doc.collisions.len(),
                problems.len()
            );
        }
        Command::Resave {
            input,
            output,
            pretty,
            strict,
        } => {
            // 1. ── Parse ──────────────────────────────────────────────────────
            let doc = parser::load(&input, &decode_options(strict))
                .with_context(|| format!("Loading {}", input.display()))?;

            // 2. ── Write ──────────────────────────────────────────────────────
            writer::emit(&doc, &output, &EncodeOptions { pretty })
                .with_context(|| format!("Writing {}", output.display()))?;
            info!("resaved {} -> {}", input.display(), output.display());
        }
        Command::Cameras { input } => {
            let doc = parser::load(&input, &DecodeOptions::default())
                .with_context(|| format!("Loading {}", input.display()))?;
            for camera in &doc.cameras {
                println!(
                    "{:>5}  {:<24} {} objects",
                    camera.id,
                    camera.label(),
                    camera.map_objects.len()
                );
            }
        }
        Command::Summary { input } => {
            let doc = parser::load(&input, &DecodeOptions::default())
                .with_context(|| format!("Loading {}", input.display()))?;
            let summary = serde_json::to_string_pretty(&doc.summary())
                .with_context(|| "Serializing summary")?;
            println!("{summary}");
        }
    }

    Ok(())
}

fn decode_options(strict: bool) -> DecodeOptions {
    DecodeOptions {
        strict_values: strict,
    }
}
