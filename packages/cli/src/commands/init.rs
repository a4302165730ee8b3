use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use weft_common::{RenderConfig, DEFAULT_CONFIG_NAME};

const EXAMPLE_SCENE: &str = r#"{
  "frames": [
    {
      "element": "div",
      "attrs": { "class": "toolbar" },
      "children": [
        { "element": "button", "attrs": { "class": "bold", "onClick": "bold" } },
        { "element": "button", "attrs": { "class": "italic", "onClick": "italic" } }
      ]
    },
    {
      "element": "div",
      "attrs": { "class": "toolbar active" },
      "children": [
        { "element": "span", "children": [ { "text": "B" } ] },
        { "element": "button", "attrs": { "class": "italic", "onClick": "italic" } }
      ]
    }
  ]
}
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let dir = PathBuf::from(cwd).join(&args.dir);
    fs::create_dir_all(&dir)?;

    println!("{}", "Initializing weft project...".bright_blue().bold());

    let config = serde_json::to_string_pretty(&RenderConfig::default())?;
    write_file(&dir.join(DEFAULT_CONFIG_NAME), &config, args.force)?;
    write_file(&dir.join("scene.json"), EXAMPLE_SCENE, args.force)?;

    println!();
    println!("Next: {}", "weft replay scene.json".bright_white());
    Ok(())
}

fn write_file(path: &Path, content: &str, force: bool) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if path.exists() && !force {
        println!("  {} {} already exists (use --force)", "!".yellow(), name);
        return Ok(());
    }

    fs::write(path, content)?;
    println!("  {} Created {}", "✓".green(), name);
    Ok(())
}
