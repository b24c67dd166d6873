/*!
 * Tests for the document model as seen by library users
 */

use wikiscript::document::{Dialogue, Direction, Episode, Show, StageDescription};
use wikiscript::output;
use wikiscript::app_config::OutputFormat;

fn two_episode_show() -> Show {
    let mut pilot = Episode::new("Pilot");
    let scene = pilot.start_scene(StageDescription::new("flat"));
    scene.add_dialogue(Dialogue::with_speech("Mark", "right ."));
    scene.add_stage_description(StageDescription::new("jeremy enters"));
    scene.add_dialogue(Dialogue::with_speech("Jeremy", "morning !"));

    let mut second = Episode::new("Dance Class");
    second
        .current_scene_mut()
        .add_dialogue(Dialogue::with_speech("Mark", "no ."));

    let mut show = Show::new();
    show.add_episode(pilot);
    show.add_episode(second);
    show
}

/// Test the JSON layout external consumers rely on
#[test]
fn test_show_json_shouldExposeEpisodesScenesAndTaggedDirections() {
    let json = serde_json::to_value(two_episode_show()).unwrap();

    let episodes = json["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["name"], "Pilot");

    let directions = episodes[0]["scenes"][0]["directions"].as_array().unwrap();
    assert_eq!(directions[0]["kind"], "stage");
    assert_eq!(directions[0]["text"], "flat");
    assert_eq!(directions[1]["kind"], "dialogue");
    assert_eq!(directions[1]["speaker"], "Mark");
    assert_eq!(directions[1]["speech"], "right .");
}

#[test]
fn test_show_json_shouldRoundTripThroughRenderedOutput() {
    let show = two_episode_show();
    let rendered = output::render(&show, OutputFormat::Json, true).unwrap();

    let back: Show = serde_json::from_str(&rendered).unwrap();
    assert_eq!(back, show);
}

#[test]
fn test_show_display_shouldSeparateEpisodesWithBlankLine() {
    let text = two_episode_show().to_string();
    assert_eq!(
        text,
        "Episode: Pilot\n\n[flat]\nMark: right .\n[jeremy enters]\nJeremy: morning !\n\n\
         Episode: Dance Class\n\n[]\nMark: no ."
    );
}

#[test]
fn test_show_speakerQueries_shouldNotMutateTheShow() {
    let show = two_episode_show();
    let before = show.clone();

    let lines: Vec<_> = show.lines_by("Mark").iter().map(|l| (l.episode, l.speech)).collect();
    assert_eq!(lines, vec![("Pilot", "right ."), ("Dance Class", "no .")]);
    assert_eq!(show.speakers().into_iter().collect::<Vec<_>>(), vec![("Jeremy", 1), ("Mark", 2)]);
    assert_eq!(show, before);
}

#[test]
fn test_implicitScene_shouldOpenWithEmptyStageDescription() {
    let show = two_episode_show();
    let scene = &show.episodes()[1].scenes()[0];
    assert_eq!(scene.directions()[0], Direction::Stage(StageDescription::default()));
    assert_eq!(scene.len(), 2);
}
