/*!
 * Core document model types for parsed transcripts.
 *
 * These types are built append-only by the transcript parser and are not
 * mutated after an episode is handed back to the caller. They serialize to
 * JSON and render back to a readable script form through `Display`.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::ParseError;

/// A complete show: every parsed episode, in index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Parsed episodes
    #[serde(default)]
    episodes: Vec<Episode>,
}

impl Show {
    /// Create an empty show.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an episode after the ones already collected.
    pub fn add_episode(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    /// Episodes in the order they were added.
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Number of episodes.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Check if the show has no episodes.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Every line spoken by `speaker` across the show, in reading order.
    ///
    /// Speaker names are compared verbatim, as they appear in the transcript.
    pub fn lines_by<'a>(&'a self, speaker: &str) -> Vec<SpeakerLine<'a>> {
        self.episodes
            .iter()
            .flat_map(|episode| {
                episode.lines_by(speaker).map(move |speech| SpeakerLine {
                    episode: &episode.name,
                    speech,
                })
            })
            .collect()
    }

    /// Count of dialogue lines per speaker, sorted by speaker name.
    pub fn speakers(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for dialogue in self.episodes.iter().flat_map(Episode::dialogue) {
            *counts.entry(dialogue.speaker.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, episode) in self.episodes.iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }
            write!(f, "{}", episode)?;
        }
        Ok(())
    }
}

/// One line attributed to a speaker, with the episode it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeakerLine<'a> {
    /// Episode name
    pub episode: &'a str,
    /// Normalized speech
    pub speech: &'a str,
}

/// A single episode transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode name, supplied by whoever requested the parse
    pub name: String,

    /// Scenes in source order
    #[serde(default)]
    scenes: Vec<Scene>,
}

impl Episode {
    /// Create an episode with no scenes yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenes: Vec::new(),
        }
    }

    /// Start a new scene opened by the given stage description and return it.
    pub fn start_scene(&mut self, description: StageDescription) -> &mut Scene {
        self.scenes.push(Scene::opened_by(description));
        let last = self.scenes.len() - 1;
        &mut self.scenes[last]
    }

    /// The scene currently receiving directions, creating an empty-description
    /// scene first if the episode has none.
    pub fn current_scene_mut(&mut self) -> &mut Scene {
        if self.scenes.is_empty() {
            return self.start_scene(StageDescription::default());
        }
        let last = self.scenes.len() - 1;
        &mut self.scenes[last]
    }

    /// Scenes in source order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// All dialogue lines of the episode, in reading order.
    pub fn dialogue(&self) -> impl Iterator<Item = &Dialogue> {
        self.scenes.iter().flat_map(Scene::dialogue)
    }

    /// Speech of every line by `speaker`, in reading order.
    pub fn lines_by<'a, 's>(&'a self, speaker: &'s str) -> impl Iterator<Item = &'a str> {
        self.dialogue()
            .filter(move |d| d.speaker == speaker)
            .filter_map(Dialogue::speech)
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Episode: {}", self.name)?;
        for scene in &self.scenes {
            write!(f, "\n\n{}", scene)?;
        }
        Ok(())
    }
}

/// A contiguous block of directions, opened by a stage description or a
/// scene-break marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Directions in source order
    #[serde(default)]
    directions: Vec<Direction>,
}

impl Scene {
    /// Create a scene with no directions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene whose first direction is `description`.
    pub fn opened_by(description: StageDescription) -> Self {
        Self {
            directions: vec![Direction::Stage(description)],
        }
    }

    /// Append a stage description.
    pub fn add_stage_description(&mut self, description: StageDescription) {
        self.directions.push(Direction::Stage(description));
    }

    /// Append a dialogue line and return it.
    pub fn add_dialogue(&mut self, dialogue: Dialogue) -> &mut Dialogue {
        self.directions.push(Direction::Dialogue(dialogue));
        match self.directions.last_mut() {
            Some(Direction::Dialogue(d)) => d,
            _ => unreachable!("a dialogue was just pushed"),
        }
    }

    /// The last direction, if it is a dialogue line.
    pub fn last_dialogue_mut(&mut self) -> Option<&mut Dialogue> {
        match self.directions.last_mut() {
            Some(Direction::Dialogue(d)) => Some(d),
            _ => None,
        }
    }

    /// Directions in source order.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Dialogue lines of this scene.
    pub fn dialogue(&self) -> impl Iterator<Item = &Dialogue> {
        self.directions.iter().filter_map(|direction| match direction {
            Direction::Dialogue(d) => Some(d),
            Direction::Stage(_) => None,
        })
    }

    /// Number of directions.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Check if the scene has no directions.
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, direction) in self.directions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", direction)?;
        }
        Ok(())
    }
}

/// One item of a scene: either spoken dialogue or a stage description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Direction {
    /// A line spoken by a character
    Dialogue(Dialogue),
    /// Scene-setting or camera direction
    Stage(StageDescription),
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Dialogue(d) => write!(f, "{}", d),
            Direction::Stage(s) => write!(f, "{}", s),
        }
    }
}

/// A spoken line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    /// Speaker identifier, verbatim from the transcript
    pub speaker: String,

    /// Normalized speech; only `None` while the line is being built
    speech: Option<String>,
}

impl Dialogue {
    /// Create a line whose speech has not been attributed yet.
    pub fn new(speaker: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            speech: None,
        }
    }

    /// Create a complete line.
    pub fn with_speech(speaker: impl Into<String>, speech: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            speech: Some(speech.into()),
        }
    }

    /// Attribute speech to this line.
    ///
    /// Speech is set at most once; a second assignment is rejected and the
    /// first value is kept.
    pub fn set_speech(&mut self, speech: String) -> Result<(), ParseError> {
        if self.speech.is_some() {
            return Err(ParseError::SpeechAlreadySet {
                speaker: self.speaker.clone(),
            });
        }
        self.speech = Some(speech);
        Ok(())
    }

    /// The speech, if set.
    pub fn speech(&self) -> Option<&str> {
        self.speech.as_deref()
    }
}

impl fmt::Display for Dialogue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.speech.as_deref().unwrap_or_default())
    }
}

/// A non-dialogue narrative beat. Empty text marks a bare scene break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescription {
    /// Normalized description text
    pub text: String,
}

impl StageDescription {
    /// Create a stage description.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for StageDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.text)
    }
}
