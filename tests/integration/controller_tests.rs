/*!
 * Integration tests for fetch-and-parse runs
 *
 * All pages are served by the mock fetcher; no network access happens.
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use wikiscript::app_config::Config;
use wikiscript::app_controller::Controller;
use wikiscript::errors::{AppError, FetchError, LinkError, ParseError};

use crate::common::{self, mock_fetcher::{MockErrorType, MockFetcher}};

fn controller_with(config: Config, fetcher: MockFetcher) -> Controller {
    Controller::with_fetcher(config, Arc::new(fetcher)).unwrap()
}

/// Index with three episodes, each with a one-line transcript
fn three_episode_wiki() -> MockFetcher {
    MockFetcher::new()
        .with_page(
            common::INDEX_URL,
            common::index_page(&[
                ("Pilot", "/wiki/Pilot/Transcript"),
                ("Dance Class", "Dance_Class/Transcript"),
                ("Mark's Women", "https://other.test/wiki/Womens/Transcript"),
            ]),
        )
        .with_page(
            &common::wiki_url("Pilot/Transcript"),
            common::transcript_page(&["[Flat]", "Mark: Right."]),
        )
        .with_page(
            &common::wiki_url("Dance_Class/Transcript"),
            common::transcript_page(&["Jeremy: Salsa!"]),
        )
        .with_page(
            "https://other.test/wiki/Womens/Transcript",
            common::transcript_page(&["Sophie: Hi, Mark."]),
        )
}

fn episode_names(show: &wikiscript::Show) -> Vec<&str> {
    show.episodes().iter().map(|e| e.name.as_str()).collect()
}

#[tokio::test]
async fn test_parseEpisode_withReferencePage_shouldBuildEpisode() -> Result<()> {
    let url = common::wiki_url("Ep1");
    let fetcher = MockFetcher::new().with_page(
        &url,
        r#"<div id="Transcript"><p>[Kitchen]</p><p>Mark: Hello there.</p><p>-----</p><p>Jeremy: Bye.</p></div>"#,
    );
    let controller = controller_with(common::test_config(), fetcher);

    let episode = controller.parse_episode("Ep1", &url).await?;

    assert_eq!(episode.name, "Ep1");
    assert_eq!(episode.scenes().len(), 2);
    assert_eq!(episode.lines_by("Mark").collect::<Vec<_>>(), vec!["hello there ."]);
    assert_eq!(episode.lines_by("Jeremy").collect::<Vec<_>>(), vec!["bye ."]);
    Ok(())
}

#[tokio::test]
async fn test_parseEpisode_withDoubleSpeech_shouldReturnParseErrorUndecorated() {
    let url = common::wiki_url("Ep1");
    let fetcher = MockFetcher::new().with_page(&url, common::transcript_page(&["Mark: A.", "Mark: B."]));
    let controller = controller_with(common::test_config(), fetcher);

    let result = controller.parse_episode("Ep1", &url).await;

    assert!(matches!(
        result,
        Err(AppError::Parse(ParseError::SpeechAlreadySet { ref speaker })) if speaker == "Mark"
    ));
}

#[tokio::test]
async fn test_parseEpisode_withInvalidUrl_shouldFailBeforeFetching() {
    let fetcher = MockFetcher::new();
    let tracker = fetcher.tracker();
    let controller = controller_with(common::test_config(), fetcher);

    let result = controller.parse_episode("Ep1", "not a url").await;

    assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    assert_eq!(tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_listLinks_shouldResolveHrefsAgainstIndex() -> Result<()> {
    let controller = controller_with(common::test_config(), three_episode_wiki());

    let targets = controller.list_links(common::INDEX_URL).await?;
    let urls: Vec<String> = targets.iter().map(|t| t.url.to_string()).collect();

    assert_eq!(
        urls,
        vec![
            "https://wiki.test/wiki/Pilot/Transcript",
            "https://wiki.test/wiki/Dance_Class/Transcript",
            "https://other.test/wiki/Womens/Transcript",
        ]
    );
    assert_eq!(targets[2].name, "Mark's Women");
    Ok(())
}

#[tokio::test]
async fn test_parseAll_shouldParseEveryEpisodeInLinkOrder() -> Result<()> {
    let fetcher = three_episode_wiki();
    let tracker = fetcher.tracker();
    let controller = controller_with(common::test_config(), fetcher);

    let show = controller.parse_all(common::INDEX_URL).await?;

    assert_eq!(episode_names(&show), vec!["Pilot", "Dance Class", "Mark's Women"]);
    assert_eq!(show.lines_by("Sophie")[0].speech, "hi , mark .");
    assert_eq!(tracker.lock().unwrap().call_count, 4);
    assert_eq!(tracker.lock().unwrap().requested[0], common::INDEX_URL);
    Ok(())
}

#[tokio::test]
async fn test_parseAll_withConcurrentRequests_shouldKeepLinkOrder() -> Result<()> {
    let mut config = common::test_config();
    config.fetch.concurrent_requests = 3;

    // the first episode answers last
    let fetcher = three_episode_wiki()
        .with_delay(&common::wiki_url("Pilot/Transcript"), Duration::from_millis(80));
    let controller = controller_with(config, fetcher);

    let show = controller.parse_all(common::INDEX_URL).await?;

    assert_eq!(episode_names(&show), vec!["Pilot", "Dance Class", "Mark's Women"]);
    Ok(())
}

#[tokio::test]
async fn test_parseAll_withRequestDelay_shouldPauseBeforeEachEpisode() -> Result<()> {
    let mut config = common::test_config();
    config.fetch.request_delay_ms = 30;
    let controller = controller_with(config, three_episode_wiki());

    let start = Instant::now();
    let show = controller.parse_all(common::INDEX_URL).await?;

    assert_eq!(show.len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(90));
    Ok(())
}

#[tokio::test]
async fn test_parseAll_withFailingEpisode_shouldSkipItByDefault() -> Result<()> {
    let fetcher = three_episode_wiki()
        .with_failure(&common::wiki_url("Dance_Class/Transcript"), MockErrorType::Status(500));
    let controller = controller_with(common::test_config(), fetcher);

    let show = controller.parse_all(common::INDEX_URL).await?;

    assert_eq!(episode_names(&show), vec!["Pilot", "Mark's Women"]);
    Ok(())
}

#[tokio::test]
async fn test_parseAll_withFailingEpisodeAndNoSkip_shouldAbort() {
    let mut config = common::test_config();
    config.skip_failed_episodes = false;
    let fetcher = three_episode_wiki()
        .with_failure(&common::wiki_url("Dance_Class/Transcript"), MockErrorType::Connection);
    let controller = controller_with(config, fetcher);

    let result = controller.parse_all(common::INDEX_URL).await;

    assert!(matches!(result, Err(AppError::Fetch(FetchError::Request { .. }))));
}

#[tokio::test]
async fn test_parseAll_withUnparseableEpisodeAndNoSkip_shouldReturnParseError() {
    let mut config = common::test_config();
    config.skip_failed_episodes = false;
    let fetcher = three_episode_wiki().with_page(
        &common::wiki_url("Pilot/Transcript"),
        common::transcript_page(&["Mark: A.", "Mark: B."]),
    );
    let controller = controller_with(config, fetcher);

    let result = controller.parse_all(common::INDEX_URL).await;

    assert!(matches!(result, Err(AppError::Parse(_))));
}

#[tokio::test]
async fn test_parseAll_withBrokenIndexLink_shouldAbortEvenWhenSkipping() {
    let fetcher = MockFetcher::new().with_page(
        common::INDEX_URL,
        r#"<div id="mw-content-text"><ul><li><a href="/wiki/Untitled">?</a></li></ul></div>"#,
    );
    let tracker = fetcher.tracker();
    let controller = controller_with(common::test_config(), fetcher);

    let result = controller.parse_all(common::INDEX_URL).await;

    assert!(matches!(
        result,
        Err(AppError::Link(LinkError::MissingAttribute { attribute: "title", position: 1 }))
    ));
    assert_eq!(tracker.lock().unwrap().call_count, 1);
}

#[tokio::test]
async fn test_parseAll_withUnreachableIndex_shouldFail() {
    let fetcher = MockFetcher::new().with_failure(common::INDEX_URL, MockErrorType::Decode);
    let controller = controller_with(common::test_config(), fetcher);

    let result = controller.parse_all(common::INDEX_URL).await;

    assert!(matches!(result, Err(AppError::Fetch(FetchError::Decode { .. }))));
}

#[tokio::test]
async fn test_parseAll_withEmptyIndex_shouldReturnEmptyShow() -> Result<()> {
    let fetcher = MockFetcher::new().with_page(common::INDEX_URL, common::index_page(&[]));
    let controller = controller_with(common::test_config(), fetcher);

    let show = controller.parse_all(common::INDEX_URL).await?;

    assert!(show.is_empty());
    Ok(())
}

#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = common::test_config();
    config.fetch.concurrent_requests = 0;

    let result = Controller::with_fetcher(config, Arc::new(MockFetcher::new()));

    assert!(matches!(result, Err(AppError::Config(_))));
}
