//! Conversion of format specific timestamps to fractional seconds.
//!
//! Clock style timestamps (`HH:MM:SS,mmm`, `H:MM:SS.cc`, `MM:SS.mmm`) are
//! shared by SRT, WebVTT and ASS. MicroDVD counts frames instead and needs a
//! frame rate to get to seconds.

use nom::bytes::complete::{tag, take_while, take_while1, take_while_m_n};
use nom::character::complete::{char, one_of, space0};
use nom::combinator::{all_consuming, map_res, opt, verify};
use nom::sequence::preceded;
use nom::IResult;

/// Frame rate assumed for MicroDVD files that do not declare one.
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

/// Separators accepted between seconds and the fraction in SRT files.
pub const SRT_SEPARATORS: &str = ",.";
/// Separators accepted between seconds and the fraction in WebVTT and ASS.
pub const DOT_SEPARATOR: &str = ".";

/// Parses a complete clock timestamp, returning `None` when any component
/// is missing or not numeric.
pub fn parse_clock(token: &str, separators: &str) -> Option<f64> {
    all_consuming(|i| clock(i, separators))(token.trim())
        .ok()
        .map(|(_, secs)| secs)
}

pub fn frames_to_seconds(frames: u64, frame_rate: f64) -> f64 {
    frames as f64 / frame_rate
}

/// Renders seconds as `HH:MM:SS<sep>mmm`, rounded to the millisecond.
pub fn format_clock(seconds: f64, separator: char) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let total_secs = total_millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let millis = total_millis % 1000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, secs, separator, millis
    )
}

/// Parses `start --> end` at the start of `input`. Whatever follows the end
/// timestamp (WebVTT cue settings, SRT coordinates) is returned untouched.
pub(crate) fn timing_line<'a>(input: &'a str, separators: &str) -> Option<(f64, f64, &'a str)> {
    fn arrow<'a>(input: &'a str, separators: &str) -> IResult<&'a str, (f64, f64)> {
        let (input, _) = space0(input)?;
        let (input, start) = clock(input, separators)?;
        let (input, _) = space0(input)?;
        let (input, _) = tag("-->")(input)?;
        let (input, _) = space0(input)?;
        let (input, end) = clock(input, separators)?;
        Ok((input, (start, end)))
    }

    let (rest, (start, end)) = arrow(input, separators).ok()?;
    // `00:00:02,000abc` is not a timestamp followed by settings.
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some((start, end, rest.trim()))
    } else {
        None
    }
}

pub(crate) fn clock<'a>(input: &'a str, separators: &str) -> IResult<&'a str, f64> {
    let (input, first) = number(input)?;
    let (input, _) = char(':')(input)?;
    let (input, second) = sexagesimal(input)?;
    let (input, third) = opt(preceded(char(':'), sexagesimal))(input)?;
    let (hours, minutes, seconds) = match third {
        Some(seconds) => (first, second, seconds),
        // WebVTT leaves the hours out when they are zero.
        None if first < 60 => (0, first, second),
        None => return Err(invalid(input)),
    };
    let (input, _) = one_of(separators)(input)?;
    let (input, millis) = millis(input)?;

    let total_millis = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(|| invalid(input))?;
    Ok((input, total_millis as f64 / 1000.0))
}

fn invalid(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::make_error(input, nom::error::ErrorKind::Verify))
}

fn number(input: &str) -> IResult<&str, u64> {
    map_res(take_while1(|c: char| c.is_ascii_digit()), str::parse)(input)
}

fn sexagesimal(input: &str) -> IResult<&str, u64> {
    verify(
        map_res(
            take_while_m_n(1, 2, |c: char| c.is_ascii_digit()),
            str::parse,
        ),
        |v: &u64| *v < 60,
    )(input)
}

fn millis(input: &str) -> IResult<&str, u64> {
    map_res(take_while(|c: char| c.is_ascii_digit()), |s: &str| {
        // The fraction is a decimal fraction, not a count: `,2` is 200ms and
        // the ASS centiseconds `.50` are 500ms. Extra precision is dropped.
        let digits: String = s.chars().take(3).collect();
        format!("{:0<3}", digits).parse::<u64>()
    })(input)
}
