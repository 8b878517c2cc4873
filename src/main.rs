// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use clap::{crate_version, Parser, Subcommand, ValueEnum};
use duration_string::DurationString;
use lightmix::config::Show;
use lightmix::lighting::buffer::BufferLayout;
use lightmix::mixer::{LogOutput, Output, WriterOutput};
use lightmix::playsync::CancelHandle;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A tick-driven LED preset mixer."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the show's playlist through the mixer, logging every frame.
    Run {
        /// The path to the show file.
        show_path: PathBuf,
        /// Stops after this long, e.g. 30s. Runs until killed when unset.
        #[arg[short, long]]
        duration: Option<String>,
        /// Writes every frame as raw RGB bytes to this file instead of logging it.
        #[arg[short, long]]
        raw: Option<PathBuf>,
    },
    /// Prints the scene's strands, fixtures and frame buffer size.
    Scene {
        /// The path to the show file.
        show_path: PathBuf,
    },
    /// Ticks a single preset and prints its packed commands as JSON, one line per tick.
    Dump {
        /// The path to the show file.
        show_path: PathBuf,
        /// The name of the preset to dump.
        preset: String,
        /// The number of ticks to run.
        #[arg[short, long, default_value_t = 1]]
        ticks: u64,
        /// The output format.
        #[arg[short, long, value_enum, default_value_t = Format::Json]]
        format: Format,
    },
}

/// How dumped commands are printed.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One JSON array per line.
    Json,
    /// One YAML document per tick.
    Yaml,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            show_path,
            duration,
            raw,
        } => {
            let limit: Option<Duration> = match duration {
                Some(duration) => Some(DurationString::from_string(duration)?.into()),
                None => None,
            };

            let show = Show::load(&show_path)?;
            let mut mixer = show.mixer()?;
            let report_every = show.tick_rate().ceil() as u64;
            let mut output: Box<dyn Output> = match raw {
                Some(path) => Box::new(WriterOutput::new(BufWriter::new(File::create(path)?))),
                None => Box::new(LogOutput::new(report_every)),
            };
            let frames = mixer.run(output.as_mut(), &CancelHandle::new(), limit)?;
            info!(frames, "Show finished");
        }
        Commands::Scene { show_path } => {
            let show = Show::load(&show_path)?;
            let scene = show.scene()?;
            let layout = BufferLayout::new(&scene);

            for strand in scene.strands() {
                println!("Strand {}:", strand);
                for fixture in scene.strand_fixtures(strand)? {
                    println!("- {}", fixture);
                }
            }

            let (strands, pixels) = layout.shape();
            println!(
                "\nPixels: {}, buffer: {} strands x {} pixels",
                scene.pixel_count(),
                strands,
                pixels
            );
        }
        Commands::Dump {
            show_path,
            preset,
            ticks,
            format,
        } => {
            let show = Show::load(&show_path)?;
            let scene = show.scene()?;
            let mut preset = show.preset(&preset, &scene)?;

            for _ in 0..ticks {
                preset.tick()?;
                let packed = preset.get_cmd_packed();
                match format {
                    Format::Json => println!("{}", serde_json::to_string(&packed)?),
                    Format::Yaml => print!("---\n{}", serde_yml::to_string(&packed)?),
                }
                preset.clr_cmd();
            }
        }
    }

    Ok(())
}
