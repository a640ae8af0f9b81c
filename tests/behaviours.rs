use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use presents::transitions::Transitions;
use presents::{
    AttrValue, Behaviours, ElementSource, Error, SlideSource, SlideState, Slideshow, SlideshowOptions,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn current_id(deck: &Slideshow) -> String {
    deck.current().map(|s| s.id().to_string()).unwrap_or_default()
}

fn build(sources: Vec<SlideSource>) -> Slideshow {
    Slideshow::new(sources, SlideshowOptions::default()).unwrap()
}

#[test]
fn duration_advances_after_its_time() {
    let deck = build(vec![
        SlideSource::new("A").with_attribute("data-duration", "1000"),
        SlideSource::new("B"),
    ]);
    deck.start().unwrap();
    deck.tick(ms(999)).unwrap();
    assert_eq!(current_id(&deck), "A");
    deck.tick(ms(1)).unwrap();
    assert_eq!(current_id(&deck), "B");
}

#[test]
fn leaving_early_cancels_the_pending_advance() {
    let deck = build(vec![
        SlideSource::new("A").with_attribute("data-duration", "1000"),
        SlideSource::new("B"),
        SlideSource::new("C"),
    ]);
    deck.start().unwrap();
    deck.tick(ms(500)).unwrap();
    deck.next().unwrap();
    assert_eq!(current_id(&deck), "B");
    assert_eq!(deck.clock().pending(), 0);

    deck.tick(ms(5000)).unwrap();
    assert_eq!(current_id(&deck), "B");
}

#[test]
fn duration_rearms_on_every_visit() {
    let deck = build(vec![
        SlideSource::new("A").with_attribute("data-duration", "100"),
        SlideSource::new("B").with_attribute("data-duration", "100"),
    ]);
    deck.start().unwrap();
    deck.tick(ms(100)).unwrap();
    assert_eq!(current_id(&deck), "B");
    deck.prev().unwrap();
    assert_eq!(current_id(&deck), "A");
    deck.tick(ms(100)).unwrap();
    assert_eq!(current_id(&deck), "B");
}

#[test]
fn non_numeric_duration_is_rejected() {
    let err = Slideshow::new(
        vec![SlideSource::new("A").with_attribute("data-duration", "soon")],
        SlideshowOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err.root_cause().downcast_ref::<Error>(), Some(Error::NotANumber { .. })));
}

#[test]
fn unregistered_and_plain_attributes_are_ignored() {
    let deck = build(vec![
        SlideSource::new("A")
            .with_attribute("data-sparkle", "yes")
            .with_attribute("duration", "10")
            .with_attribute("class", "title"),
        SlideSource::new("B"),
    ]);
    deck.start().unwrap();
    deck.tick(ms(1000)).unwrap();
    assert_eq!(current_id(&deck), "A");
}

#[test]
fn custom_behaviour_gets_coerced_values() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut behaviours = Behaviours::default();
    let s = seen.clone();
    behaviours.register("mood", move |slide, value| {
        s.borrow_mut().push((slide.id().to_string(), value.clone()));
        Ok(())
    });

    Slideshow::with_registries(
        vec![
            SlideSource::new("A").with_attribute("data-mood", "42"),
            SlideSource::new("B").with_attribute("data-mood", "calm"),
        ],
        SlideshowOptions::default(),
        &behaviours,
        Transitions::default(),
    )
    .unwrap();

    assert_eq!(
        *seen.borrow(),
        [
            ("A".to_string(), AttrValue::Number(42.0)),
            ("B".to_string(), AttrValue::Text("calm".into())),
        ]
    );
}

#[test]
fn failing_installer_aborts_construction() {
    let mut behaviours = Behaviours::empty();
    behaviours.register("broken", |_, _| anyhow::bail!("nope"));
    let result = Slideshow::with_registries(
        vec![SlideSource::new("A").with_attribute("data-broken", "")],
        SlideshowOptions::default(),
        &behaviours,
        Transitions::default(),
    );
    let err = result.unwrap_err();
    assert_eq!(format!("{err:#}"), "failed to install `broken` on slide `A`: nope");
}

fn video_slide(id: &str, attribute: &str, value: &str) -> SlideSource {
    SlideSource::new(id)
        .with_attribute(attribute, value)
        .with_element(ElementSource::Video {
            src: "clip.mp4".into(),
            length_ms: Some(3000),
        })
}

#[test]
fn video_plays_when_shown_and_completes_the_slide() {
    let deck = build(vec![video_slide("A", "data-video", ""), SlideSource::new("B")]);
    let media = deck.get("A").unwrap().media().unwrap();
    assert_eq!(media.src(), "clip.mp4");
    assert!(!media.is_full());
    assert_eq!(media.length_hint(), Some(ms(3000)));

    // Commands issued before metadata are held back
    deck.start().unwrap();
    assert!(!media.is_playing());
    media.load_metadata(ms(3000)).unwrap();
    assert!(media.is_playing());

    deck.tick(ms(2999)).unwrap();
    assert_eq!(current_id(&deck), "A");
    deck.tick(ms(1)).unwrap();
    assert_eq!(current_id(&deck), "B");
    assert!(!media.is_playing());
}

#[test]
fn video_pauses_on_hide_and_rewinds_on_show() {
    let deck = build(vec![video_slide("A", "data-fullvideo", "other.mp4"), SlideSource::new("B")]);
    let media = deck.get("A").unwrap().media().unwrap();
    assert!(media.is_full());
    assert_eq!(media.src(), "other.mp4");
    assert_eq!(media.length_hint(), None);
    media.load_metadata(ms(3000)).unwrap();

    deck.start().unwrap();
    deck.tick(ms(1000)).unwrap();
    deck.next().unwrap();
    assert!(!media.is_playing());
    assert_eq!(media.position(), ms(1000));

    deck.prev().unwrap();
    assert!(media.is_playing());
    assert_eq!(media.position(), Duration::ZERO);
}

#[test]
fn video_without_a_source_is_a_configuration_error() {
    let err = Slideshow::new(
        vec![SlideSource::new("A").with_attribute("data-video", "")],
        SlideshowOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err.root_cause().downcast_ref::<Error>(), Some(Error::MissingVideo(id)) if id == "A"));
}

#[test]
fn fade_elements_staggers_and_resets() {
    let deck = build(vec![
        SlideSource::new("A"),
        SlideSource::new("B")
            .with_attribute("data-fadeelements", "")
            .with_element(ElementSource::Text { text: "one".into() })
            .with_element(ElementSource::Text { text: "two".into() }),
    ]);
    let b = deck.get("B").unwrap();
    let opacities = || b.elements().iter().map(|e| e.opacity()).collect::<Vec<_>>();

    deck.start().unwrap().next().unwrap();
    assert_eq!(opacities(), [0.0, 0.0]);

    // First element fully in, second one only just scheduled
    deck.tick(ms(510)).unwrap();
    let now = opacities();
    assert!(now[0] > 0.99);
    assert_eq!(now[1], 0.0);

    deck.tick(ms(300)).unwrap();
    assert!(opacities()[1] > 0.0 && opacities()[1] < 1.0);

    deck.prev().unwrap();
    assert_eq!(b.state(), SlideState::AfterHide);
    assert_eq!(opacities(), [1.0, 1.0]);
    // Only the cancelled second fade still has a frame queued
    assert_eq!(deck.clock().pending(), 1);
    deck.clock().run_until_idle(ms(5000)).unwrap();
    assert_eq!(deck.clock().pending(), 0);
    assert_eq!(opacities(), [1.0, 1.0]);
}
