use subcue::timecode::format_clock;
use subcue::Cue;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Index, times in seconds and text.
    Text,
    Json,
    Srt,
    Vtt,
}

pub fn serialise<W: Write>(cues: &[Cue], format: OutputFormat, output: W) -> Result<()> {
    let mut writer = BufWriter::new(output);
    write_cues(&mut writer, cues, format).context("Failed to write subtitles.")?;
    writer.flush().context("Failed to write subtitles.")?;
    Ok(())
}

fn write_cues<W: Write>(buf: &mut W, cues: &[Cue], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for cue in cues {
                write_text(buf, cue)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *buf, cues)?;
            writeln!(buf)?;
        }
        OutputFormat::Srt => {
            for cue in cues {
                write_srt(buf, cue)?;
            }
        }
        OutputFormat::Vtt => {
            writeln!(buf, "WEBVTT")?;
            writeln!(buf)?;
            for cue in cues {
                write_vtt(buf, cue)?;
            }
        }
    }
    Ok(())
}

fn write_text<W: Write>(buf: &mut W, cue: &Cue) -> Result<()> {
    writeln!(
        buf,
        "#{} {:.3}s - {:.3}s",
        cue.index, cue.start_time, cue.end_time
    )?;
    for line in cue.lines() {
        writeln!(buf, "    {}", line)?;
    }
    Ok(())
}

fn write_srt<W: Write>(buf: &mut W, cue: &Cue) -> Result<()> {
    writeln!(buf, "{}", cue.index)?;
    write!(buf, "{}", format_clock(cue.start_time, ','))?;
    write!(buf, " --> ")?;
    write!(buf, "{}", format_clock(cue.end_time, ','))?;
    writeln!(buf)?;
    for line in cue.lines() {
        writeln!(buf, "{}", line)?;
    }
    writeln!(buf)?;
    Ok(())
}

fn write_vtt<W: Write>(buf: &mut W, cue: &Cue) -> Result<()> {
    write!(buf, "{}", format_clock(cue.start_time, '.'))?;
    write!(buf, " --> ")?;
    write!(buf, "{}", format_clock(cue.end_time, '.'))?;
    writeln!(buf)?;
    for line in cue.lines() {
        let escaped = line
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        writeln!(buf, "{}", escaped)?;
    }
    writeln!(buf)?;
    Ok(())
}
