use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mocap_browser::browse::MocapFolder;
use mocap_browser::{BrowserConfig, BvhLoader, SceneAggregator};

/// Preview mocap clips: load files (or a whole folder) and scrub through them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Files to load together.
    paths: Vec<PathBuf>,

    /// Folder to scan for mocap files; every match is loaded.
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Only load folder files whose relative path contains this text.
    #[arg(short = 's', long, default_value = "")]
    search: String,

    /// Bone names to hide on every loaded scene.
    #[arg(long = "hide")]
    hidden: Vec<String>,

    /// TOML config file (defaults to ./mocap_browser.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = BrowserConfig::load_or_default(args.config.as_deref()).context("loading config")?;

    let mut scenes = match config.playback.color_seed {
        Some(seed) => SceneAggregator::with_seed(BvhLoader, seed),
        None => SceneAggregator::new(BvhLoader),
    };

    let mut paths = args.paths.clone();
    if let Some(folder) = args.folder.as_ref().or(config.browser.root_folder.as_ref()) {
        let folder = MocapFolder::scan(folder, scenes.loader())
            .with_context(|| format!("scanning {}", folder.display()))?;
        paths.extend(folder.filter(&args.search).into_iter().map(PathBuf::from));
    }

    load_startup_paths(&mut scenes, &paths, &args.hidden);
    run(scenes, config)
}

/// Load what the command line asked for. Failures are logged and the viewer
/// opens anyway, possibly empty.
fn load_startup_paths(scenes: &mut SceneAggregator, paths: &[PathBuf], hidden: &[String]) {
    if paths.is_empty() {
        return;
    }
    match scenes.load_dropped(paths) {
        Ok(report) => {
            for path in report.loaded.iter() {
                scenes.set_node_visibility(path, hidden, true);
            }
        }
        Err(err) => log::warn!("starting without scenes: {err}"),
    }
}

#[cfg(feature = "visualize")]
fn run(scenes: SceneAggregator, config: BrowserConfig) -> anyhow::Result<()> {
    mocap_browser::visualize::run_viewer(scenes, config);
    Ok(())
}

/// Without a viewport, print what would be shown.
#[cfg(not(feature = "visualize"))]
fn run(scenes: SceneAggregator, _config: BrowserConfig) -> anyhow::Result<()> {
    let playback = scenes.playback();
    println!(
        "{} scene(s), frames {}..={}",
        scenes.scenes().len(),
        playback.start_frame(),
        playback.end_frame()
    );
    for (path, hierarchy) in &scenes.description().transform_hierarchy {
        println!("{}", path.display());
        for (child, parent) in hierarchy {
            println!("    {child:.<24} {parent}");
        }
    }
    println!("{} bone segment(s) at frame {}", scenes.sample_current_frame().len(), playback.active_frame());
    Ok(())
}
