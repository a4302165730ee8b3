use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use weft_vdom::Scene;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Scene file to validate
    pub input: PathBuf,
}

pub fn check(args: CheckArgs, _cwd: &str) -> Result<()> {
    let scene = Scene::load(&args.input)?;

    println!(
        "{} {} ({} frames, {} nodes)",
        "✓".green(),
        args.input.display(),
        scene.frames.len(),
        scene.node_count()
    );
    Ok(())
}
