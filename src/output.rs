/*!
 * Rendering of parsed shows for the command line.
 */

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use crate::app_config::OutputFormat;
use crate::document::{Show, SpeakerLine};

/// Render a whole show in the requested format
pub fn render(show: &Show, format: OutputFormat, pretty: bool) -> Result<String> {
    debug!("Rendering {} episode(s) as {}", show.len(), format);
    match format {
        OutputFormat::Text => Ok(show.to_string()),
        OutputFormat::Json => to_json(show, pretty),
    }
}

/// Render only one speaker's lines, one `episode: speech` line each in text form
pub fn render_speaker(show: &Show, speaker: &str, format: OutputFormat, pretty: bool) -> Result<String> {
    let lines = show.lines_by(speaker);
    debug!("Rendering {} line(s) by '{}' as {}", lines.len(), speaker, format);

    match format {
        OutputFormat::Text => Ok(lines
            .iter()
            .map(|line| format!("{}: {}", line.episode, line.speech))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => to_json::<Vec<SpeakerLine<'_>>>(&lines, pretty),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output to JSON")
}
