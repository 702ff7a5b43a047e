use std::path::PathBuf;

use clap::Parser;
use log::info;

use mdl_renderer::app::{Headless, ImageFile, Window};
use mdl_renderer::config::RenderConfig;
use mdl_renderer::interpreter::Interpreter;
use mdl_renderer::ops;

/// Renders a parsed drawing script (JSON operation records) into an image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON array of operation records.
    script: PathBuf,
    /// JSON render configuration; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory SAVE writes into.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Skip DISPLAY instead of opening a window.
    #[arg(long)]
    headless: bool,
}

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let script = ops::load_script(&args.script)?;
    info!("loaded {} operations from {}", script.len(), args.script.display());

    let mut interpreter = Interpreter::new(config)?;
    let mut persist = ImageFile::new(args.output_dir);
    let stats = if args.headless {
        interpreter.run(&script, &mut persist, &mut Headless)?
    } else {
        interpreter.run(&script, &mut persist, &mut Window::default())?
    };
    info!("{} primitives drawn", stats.drawn);

    return Ok(());
}
