// aaxsplit - AAX audiobook to per-chapter MP3 converter
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use aaxsplit::ffmpeg::activation::DEFAULT_ACTIVATION_BYTES;
use aaxsplit::{ActivationBytes, ConversionOptions, Pipeline};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[cfg(windows)]
const DEFAULT_TOOL_DIR: &str = r"C:\Program Files\fmpeg\bin";
#[cfg(not(windows))]
const DEFAULT_TOOL_DIR: &str = "/usr/bin";

#[derive(Parser)]
#[command(name = "aaxsplit")]
#[command(about = "Convert an AAX audiobook into per-chapter MP3 files", long_about = None)]
struct Cli {
    /// Encrypted AAX input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output folder for the chapter files
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// Output base name
    #[arg(short, long, default_value = "out")]
    output: String,

    /// Display title used in chapter file names (defaults to the base name)
    #[arg(short, long)]
    title: Option<String>,

    /// Directory containing the ffmpeg and ffprobe executables
    #[arg(long, default_value = DEFAULT_TOOL_DIR)]
    tool: PathBuf,

    /// Working directory owning the intermediate transcode
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Activation bytes for the account owning the book (8 hex characters)
    #[arg(long, default_value = DEFAULT_ACTIVATION_BYTES)]
    activation_bytes: ActivationBytes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let title = cli.title.unwrap_or_else(|| cli.output.clone());

    let options = ConversionOptions {
        input: cli.input,
        output_dir: cli.directory,
        base_name: cli.output,
        title,
        tool_dir: cli.tool,
        work_dir: cli.work_dir,
        activation: cli.activation_bytes,
    };

    let pipeline = Pipeline::new(options);
    match pipeline.run().await {
        Ok(written) => {
            println!("Wrote {} chapter file(s)", written.len());
            for path in written {
                println!("  {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            // Exit 2 when ffmpeg/ffprobe itself failed or was missing,
            // 1 for bad input, probe data, or filesystem trouble
            std::process::exit(if e.is_tool_error() { 2 } else { 1 });
        }
    }
    Ok(())
}
