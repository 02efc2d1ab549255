mod serialiser;

use crate::serialiser::OutputFormat;

use std::io::{self, Read};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser as ClapParser, Subcommand};
use subcue::{CueIndex, ParseOptions, SubtitleFormat};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_logging();
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subcue=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[derive(ClapParser)]
#[command(about = "Parse SRT, WebVTT, ASS and MicroDVD subtitles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a subtitle file and print its cues.
    Parse {
        #[arg(
            value_name = "FILE",
            help = "The file to read from. Use '-' to read from standard input.",
            default_value = "-"
        )]
        input: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The file to write to. If not supplied, the cues will be written to standard output.",
            default_value = "-"
        )]
        output: String,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        to: OutputFormat,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the subtitle files that belong to a media file.
    Find {
        #[arg(value_name = "MEDIA")]
        media: String,
        #[arg(
            long,
            value_name = "MILLIS",
            help = "Give up when the directory scan takes longer than this."
        )]
        timeout_ms: Option<u64>,
        #[arg(long, help = "Print the result as JSON.")]
        json: bool,
    },
    /// Print the cue shown at each of the given times, in seconds.
    At {
        #[arg(value_name = "FILE")]
        input: String,
        #[arg(value_name = "SECONDS", required = true, allow_negative_numbers = true)]
        times: Vec<f64>,
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    #[arg(
        short,
        long,
        value_name = "FORMAT",
        help = "The input format (srt, vtt, ass, sub). Detected from the file extension when omitted."
    )]
    format: Option<SubtitleFormat>,
    #[arg(
        long,
        value_name = "FPS",
        help = "Frame rate for MicroDVD files.",
        default_value_t = subcue::timecode::DEFAULT_FRAME_RATE
    )]
    fps: f64,
    #[arg(
        long,
        help = "Use the frame rate a MicroDVD file declares in a leading {1}{1}<fps> line instead of --fps."
    )]
    declared_fps: bool,
}

impl SourceArgs {
    fn options(&self) -> Result<ParseOptions> {
        Ok(ParseOptions::default()
            .with_frame_rate(self.fps)?
            .use_declared_frame_rate(self.declared_fps))
    }

    fn format_for(&self, input: &str) -> Result<SubtitleFormat> {
        self.format
            .or_else(|| SubtitleFormat::from_path(input))
            .ok_or_else(|| anyhow!("Cannot tell the subtitle format of '{}', use --format.", input))
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            input,
            output,
            to,
            source,
        } => {
            let cues = read_cues(&input, &source)?;
            if cues.is_empty() {
                warn!(input = %input, "No cues found");
            }
            if output == "-" {
                serialiser::serialise(&cues, to, io::stdout())?;
            } else {
                let dst = std::fs::File::create(&output)
                    .context(format!("Failed to create output file: '{}'", output))?;
                serialiser::serialise(&cues, to, dst)?;
            }
        }
        Command::Find {
            media,
            timeout_ms,
            json,
        } => {
            let found = match timeout_ms {
                Some(ms) => subcue::find_subtitle_files_timeout(&media, Duration::from_millis(ms)),
                None => subcue::find_subtitle_files(&media),
            }
            .context(format!("Failed to look for subtitles of '{}'", media))?;
            info!(count = found.len(), "Subtitle search finished");
            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                for file in found {
                    match file.language {
                        Some(language) => {
                            println!("{}\t{}\t{}", file.format, language, file.path.display())
                        }
                        None => println!("{}\t-\t{}", file.format, file.path.display()),
                    }
                }
            }
        }
        Command::At {
            input,
            times,
            source,
        } => {
            let index = CueIndex::new(read_cues(&input, &source)?);
            for time in times {
                match index.active(time) {
                    Some(cue) => println!(
                        "{:.3}\t#{}\t{}",
                        time,
                        cue.index,
                        cue.lines().collect::<Vec<_>>().join(" / ")
                    ),
                    None => println!("{:.3}\t-", time),
                }
            }
        }
    }

    Ok(())
}

fn read_cues(input: &str, source: &SourceArgs) -> Result<Vec<subcue::Cue>> {
    let options = source.options()?;
    let format = source.format_for(input)?;

    let data = if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        subcue::read_subtitle_text(input)
            .context(format!("Failed to open input file: '{}'", input))?
    };

    Ok(format.parse(&data, &options))
}
