use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use weft_common::{RealFileSystem, RenderConfig};
use weft_vdom::{DomOp, Handlers, MemoryDom, PassStats, Renderer, Scene};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Scene file with the frames to render
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Config file (defaults to weft.config.json in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Everything one frame did to the backend
#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub frame: usize,
    pub stats: PassStats,
    pub ops: Vec<DomOp>,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub frames: Vec<FrameReport>,
    pub html: String,
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = load_config(args.config.as_deref(), cwd)?;
    let scene = Scene::load(&args.input)?;
    let report = replay_scene(&scene, config)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_text(&report),
        other => bail!("Unknown format: {}. Use: text or json", other),
    }
    Ok(())
}

fn load_config(path: Option<&Path>, cwd: &str) -> Result<RenderConfig> {
    let config = match path {
        Some(path) => RenderConfig::load_file(&RealFileSystem, path)?,
        None => RenderConfig::load(cwd)?,
    };
    debug!(?config, "Loaded render config");
    Ok(config)
}

/// Render every frame of `scene` in order against an in-memory backend
pub fn replay_scene(scene: &Scene, config: RenderConfig) -> Result<ReplayReport> {
    let mut dom = MemoryDom::new();
    let container = dom.create_container("main");
    let mut renderer = Renderer::with_config(dom, container, config.clone());
    let mut handlers = Handlers::default();
    let mut frames = Vec::with_capacity(scene.frames.len());

    for (frame, node) in scene.frames.iter().enumerate() {
        let stats = renderer.render(node.to_vnode(&config, &mut handlers))?;
        let ops = renderer.backend_mut().take_ops();
        frames.push(FrameReport { frame, stats, ops });
    }

    Ok(ReplayReport {
        frames,
        html: renderer.backend().inner_html(container),
    })
}

fn print_text(report: &ReplayReport) {
    for frame in &report.frames {
        let s = &frame.stats;
        println!(
            "{} {}  created {}  reused {}  removed {}  updated {}",
            "frame".bright_blue().bold(),
            frame.frame,
            s.created,
            s.reused,
            s.removed,
            s.updated
        );
        if frame.ops.is_empty() {
            println!("  {}", "(no changes)".dimmed());
        }
        for op in &frame.ops {
            let line = op.to_string();
            if op.is_remove() {
                println!("  {} {}", "-".red(), line);
            } else if op.is_create() {
                println!("  {} {}", "+".green(), line);
            } else {
                println!("  {} {}", "~".yellow(), line);
            }
        }
    }
    println!();
    println!("{}", report.html);
}
