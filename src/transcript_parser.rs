/*!
 * Transcript parser.
 *
 * Builds one `Episode` from the markup events of a transcript page. The page
 * carries no explicit schema; structure is inferred from conventions:
 * - the transcript lives in the region opened by an element with `id="Transcript"`
 *   and closed by the next `</div>`
 * - every `<p>` in that region is one line, classified by its text as a stage
 *   direction (`[...]`), a dialogue line (`Name: ...`) or a scene break (`-----`)
 *
 * One parser instance handles exactly one page.
 */

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::document::{Dialogue, Episode, StageDescription};
use crate::errors::ParseError;
use crate::markup::{self, MarkupEvent};
use crate::text_normalizer::normalize;

/// Attribute value marking the transcript region.
pub const TRANSCRIPT_ID: &str = "Transcript";

static STAGE_DIRECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(.*)\]").expect("Invalid stage direction regex")
});

static DIALOGUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+):(.+)").expect("Invalid dialogue regex")
});

static SCENE_BREAK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-{5,}").expect("Invalid scene break regex")
});

/// Classification of one transcript paragraph. Text is still raw here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph<'a> {
    /// `[text]`
    StageDirection(&'a str),
    /// `speaker: speech`
    Dialogue {
        /// Speaker identifier
        speaker: &'a str,
        /// Everything after the first colon
        speech: &'a str,
    },
    /// A run of five or more hyphens
    SceneBreak,
}

/// Classify a paragraph's text.
///
/// Patterns are tried in a fixed order: stage direction, dialogue, scene
/// break. A bracketed line containing a colon is therefore a stage
/// direction. Returns `None` for text matching none of them.
pub fn classify(text: &str) -> Option<Paragraph<'_>> {
    if let Some(caps) = STAGE_DIRECTION_PATTERN.captures(text) {
        let inner = caps.get(1).map_or("", |m| m.as_str());
        return Some(Paragraph::StageDirection(inner));
    }

    if let Some(caps) = DIALOGUE_PATTERN.captures(text) {
        let (_, [speaker, speech]) = caps.extract();
        return Some(Paragraph::Dialogue { speaker, speech });
    }

    if SCENE_BREAK_PATTERN.is_match(text) {
        return Some(Paragraph::SceneBreak);
    }

    None
}

/// Streaming parser for a single episode page.
#[derive(Debug)]
pub struct TranscriptParser {
    in_transcript: bool,
    in_paragraph: bool,
    buffer: String,
    episode: Episode,
}

impl TranscriptParser {
    /// Create a parser for the episode called `episode_name`.
    pub fn new(episode_name: impl Into<String>) -> Self {
        Self {
            in_transcript: false,
            in_paragraph: false,
            buffer: String::new(),
            episode: Episode::new(episode_name),
        }
    }

    /// Consume one markup event.
    pub fn handle(&mut self, event: &MarkupEvent) -> Result<(), ParseError> {
        match event {
            MarkupEvent::Open { tag, attrs } => {
                if markup::has_attr(attrs, "id", TRANSCRIPT_ID) {
                    self.in_transcript = true;
                }
                if tag == "p" && self.in_transcript {
                    self.in_paragraph = true;
                }
            }
            MarkupEvent::Data(text) => {
                if self.in_paragraph {
                    self.buffer.push_str(&text.replace("\r\n", " ").replace('\n', " "));
                }
            }
            MarkupEvent::Close { tag } => {
                if tag == "p" {
                    let text = std::mem::take(&mut self.buffer);
                    self.in_paragraph = false;
                    self.close_paragraph(&text)?;
                } else if tag == "div" && self.in_transcript {
                    self.in_transcript = false;
                }
            }
        }
        Ok(())
    }

    /// Consume a sequence of events.
    pub fn feed<'e, I>(&mut self, events: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = &'e MarkupEvent>,
    {
        for event in events {
            self.handle(event)?;
        }
        Ok(())
    }

    /// End of input: hand back the episode built so far.
    pub fn finish(self) -> Episode {
        self.episode
    }

    fn close_paragraph(&mut self, text: &str) -> Result<(), ParseError> {
        match classify(text) {
            Some(Paragraph::StageDirection(description)) => {
                self.episode.start_scene(StageDescription::new(normalize(description)));
            }
            Some(Paragraph::Dialogue { speaker, speech }) => {
                self.add_dialogue(speaker, normalize(speech))?;
            }
            Some(Paragraph::SceneBreak) => {
                self.episode.start_scene(StageDescription::default());
            }
            None => {
                if !text.trim().is_empty() {
                    debug!("Dropping unclassified paragraph in '{}': {:?}", self.episode.name, text);
                }
            }
        }
        Ok(())
    }

    fn add_dialogue(&mut self, speaker: &str, speech: String) -> Result<(), ParseError> {
        let scene = self.episode.current_scene_mut();
        // a same-speaker line right after another is attributed to that line
        match scene.last_dialogue_mut() {
            Some(previous) if previous.speaker == speaker => previous.set_speech(speech),
            _ => scene.add_dialogue(Dialogue::new(speaker)).set_speech(speech),
        }
    }
}

/// Parse a whole transcript page into an episode.
pub fn parse_episode_markup(episode_name: &str, html: &str) -> Result<Episode, ParseError> {
    let events = markup::tokenize(html);
    let mut parser = TranscriptParser::new(episode_name);
    parser.feed(&events)?;
    Ok(parser.finish())
}
