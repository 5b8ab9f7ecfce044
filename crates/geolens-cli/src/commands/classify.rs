use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::Style;
use geolens_core::classify::{classify, DisplayMode};
use geolens_core::consts::UNSUPPORTED_FORMAT_MESSAGE;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Files to classify
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: &ClassifyArgs) -> Result<()> {
    let ok = Style::new().green();
    let warn = Style::new().yellow();

    let mut unsupported = 0;
    for path in &args.files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mode = classify(&name);
        let style = if mode == DisplayMode::Unsupported {
            unsupported += 1;
            &warn
        } else {
            &ok
        };
        println!("{:<40}{}", name, style.apply_to(mode));
    }

    if unsupported > 0 {
        println!();
        println!("{}", warn.apply_to(UNSUPPORTED_FORMAT_MESSAGE));
    }
    Ok(())
}
