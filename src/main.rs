use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use unity_webgl_packer::logging::{LogFormat, LogOptions, init_logging};
use unity_webgl_packer::{ProjectConfig, UnityPacker};

/// Pack a Unity WebGL export into a single self-contained HTML file.
#[derive(Debug, Parser)]
#[command(name = "unity-webgl-pack", version, about)]
struct Cli {
    /// Export directory containing the HTML shell and the build directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Explicit configuration file (defaults to `unity-pack.config.json` in the root).
    #[arg(long)]
    config: Option<PathBuf>,
    /// HTML shell, relative to the root.
    #[arg(long)]
    html: Option<String>,
    /// Build directory holding the manifest and assets, relative to the root.
    #[arg(long)]
    build_dir: Option<String>,
    /// Output directory, relative to the root.
    #[arg(long)]
    out_dir: Option<String>,
    /// Output file name inside the output directory.
    #[arg(long)]
    out_file: Option<String>,
    /// Do not rewrite `concat` paths inside inlined scripts.
    #[arg(long)]
    no_patch_scripts: bool,
    /// Default log filter, used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Cli {
    fn project_config(&self) -> Result<ProjectConfig> {
        let mut config = match &self.config {
            Some(path) => ProjectConfig::from_path(path)
                .ok_or_else(|| anyhow!("failed to load config from {}", path.display()))?,
            None => ProjectConfig::discover(&self.root),
        };

        if let Some(html) = &self.html {
            config.index_html_file = html.clone();
        }
        if let Some(build_dir) = &self.build_dir {
            config.build_dir = build_dir.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            config.output_dir = out_dir.clone();
        }
        if let Some(out_file) = &self.out_file {
            config.output_file = out_file.clone();
        }
        if self.no_patch_scripts {
            config.patch_script_paths = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogOptions {
        level: cli.log_level.clone(),
        format: cli.log_format,
    });

    let layout = cli.project_config()?.into_layout(&cli.root);
    UnityPacker::new(layout).run()?;
    Ok(())
}
