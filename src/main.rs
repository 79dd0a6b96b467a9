#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;

use whitted::parallel::parallel_render;
use whitted::reader::SceneReader;
use whitted::scene::Scene;

const DEFAULT_LOGGING_LEVEL: &str = "info";

/// Render block-structured scene description files to an image.
#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// Scene description files, read in order into a single scene.
    #[clap(required = true, parse(from_os_str))]
    files: Vec<PathBuf>,

    /// Number of worker threads to render with.
    #[clap(long, default_value_t = 1)]
    threads: usize,
}

fn main() {
    env_logger::Builder::from_env(
        Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)
    ).init();

    let args = Args::parse();

    let mut scene = Scene::new();
    {
        let mut reader = SceneReader::new(&mut scene);
        for file in &args.files {
            if let Err(err) = reader.read(file) {
                error!("{}", err);
                process::exit(1);
            }
        }
    }

    if !scene.has_camera() {
        error!("Cannot render a scene with no camera!");
        return;
    }

    let filename = scene.filename.clone();
    let canvas = if args.threads > 1 {
        parallel_render(Arc::new(scene), args.threads)
    } else {
        scene.render()
    };

    if let Err(err) = canvas.save(&filename) {
        error!("Unable to save {}: {}", filename, err);
        process::exit(1);
    }

    info!("saved render to {}", filename);
}
