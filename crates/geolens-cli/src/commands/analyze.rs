use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use geolens_core::consts::UNSUPPORTED_FORMAT_MESSAGE;
use geolens_core::file::SelectedFile;
use geolens_core::report::render;
use geolens_core::upload::{HttpAnalysisClient, ProgressReporter, SessionState, UploadSession};
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::print_report;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// GeoTIFF, JPEG or PNG file to submit
    pub file: PathBuf,

    /// Analysis service URL (overrides the config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the raw JSON response instead of the formatted report
    #[arg(long)]
    pub json: bool,
}

/// Drives an indicatif bar from upload progress.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn started(&self, file: &SelectedFile) {
        self.pb.set_message(file.name().to_string());
    }

    fn progress(&self, percent: u8) {
        self.pb.set_position(percent as u64);
    }

    fn finished(&self, state: SessionState) {
        self.pb.finish_with_message(state.to_string());
    }
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(ref endpoint) = args.endpoint {
        config.endpoint = endpoint.clone();
    }
    config.validate()?;

    let file = SelectedFile::from_path(&args.file)?;
    if !file.display_mode().is_supported() {
        bail!(UNSUPPORTED_FORMAT_MESSAGE);
    }

    let client = HttpAnalysisClient::new(config.endpoint.as_str(), config.upload.timeout())
        .context("Failed to build HTTP client")?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { pb };

    let rt = super::runtime()?;
    let mut session = UploadSession::new(config.upload.clone());
    let result = rt
        .block_on(session.run(&client, &file, &reporter))
        .cloned()
        .context("Upload did not start")?;

    if args.json {
        println!("{}", result.to_json_pretty()?);
    } else {
        print_report(&render(&result));
    }

    if session.state() == SessionState::Failed {
        bail!("Analysis of {} failed", file.name());
    }
    Ok(())
}
