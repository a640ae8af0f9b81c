use std::fs;
use std::time::Duration;

use presents::config::{MANIFEST_FILE, load_deck};
use presents::headless::{self, HeadlessOptions};
use presents::{SlideSource, SlideState, Slideshow, SlideshowOptions};

fn quick() -> HeadlessOptions {
    HeadlessOptions {
        dwell: Duration::from_millis(200),
        video_length: Duration::from_millis(400),
        max_time: Duration::from_secs(30),
    }
}

#[test]
fn plays_a_manifest_deck_to_the_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(MANIFEST_FILE),
        r#"{
            "options": { "transition": "slideFade" },
            "slides": [
                { "id": "title", "attributes": { "data-duration": "1000", "data-transition": "fadeToBlack" } },
                { "id": "clip", "attributes": { "data-video": "" },
                  "elements": [ { "type": "video", "src": "clip.mp4" } ] },
                { "id": "bullets", "attributes": { "data-fadeelements": "" },
                  "elements": [ { "type": "text", "text": "one" }, { "type": "text", "text": "two" } ] },
                { "id": "end" }
            ]
        }"#,
    )
    .unwrap();

    let manifest = load_deck(dir.path()).unwrap();
    let deck = Slideshow::new(manifest.slides, manifest.options.into()).unwrap();
    let shown = headless::run(&deck, &quick()).unwrap();

    assert_eq!(shown, ["title", "clip", "bullets", "end"]);
    assert_eq!(deck.current().unwrap().id(), "end");
    assert_eq!(deck.get("title").unwrap().state(), SlideState::AfterHide);
    assert!(deck.clock().now() < Duration::from_secs(10));
}

#[test]
fn looping_deck_runs_until_the_time_limit() {
    let deck = Slideshow::new(
        vec![SlideSource::new("only").with_attribute("data-duration", "500")],
        SlideshowOptions { looping: true, ..Default::default() },
    )
    .unwrap();
    let options = HeadlessOptions {
        max_time: Duration::from_millis(2200),
        ..quick()
    };
    let shown = headless::run(&deck, &options).unwrap();

    assert_eq!(shown, ["only", "only", "only", "only", "only"]);
    assert!(deck.clock().now() >= Duration::from_millis(2200));
}
