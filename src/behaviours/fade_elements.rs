use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use raylib::ease;

use crate::behaviours::AttrValue;
use crate::clock::{Animation, TimerId};
use crate::constants::{ELEMENT_FADE_DURATION, ELEMENT_FADE_STAGGER};
use crate::slide::Slide;
use crate::state::SlideState;

#[derive(Default)]
struct Fades {
    timers: Vec<TimerId>,
    animations: Vec<Animation>,
}

/// `data-fadeelements`: fade the slide's elements in one after another
/// once the slide is shown.
pub fn fade_elements(slide: &Slide, _value: &AttrValue) -> Result<()> {
    let fades: Rc<RefCell<Fades>> = Rc::default();

    slide.on(SlideState::Show, |slide| {
        for element in slide.elements() {
            element.set_opacity(0.0);
        }
        Ok(())
    });

    let running = fades.clone();
    slide.on(SlideState::AfterShow, move |slide| {
        let clock = slide.clock().clone();
        for (i, delay) in (0..slide.elements().len()).map(|i| (i, ELEMENT_FADE_STAGGER * i as u32)) {
            let (target, animations, animator) = (slide.downgrade(), running.clone(), clock.clone());
            let timer = clock.set_timeout(delay, move || {
                let mut fade_in =
                    ease::Tween::new(ease::linear_none, 0.0, 1.0, ELEMENT_FADE_DURATION.as_secs_f32());
                let finished = target.clone();
                let animation = animator.animate(
                    ELEMENT_FADE_DURATION,
                    move |dt| {
                        if let Some(slide) = target.upgrade() {
                            slide.elements()[i].set_opacity(fade_in.apply(dt));
                        }
                    },
                    move || {
                        if let Some(slide) = finished.upgrade() {
                            slide.elements()[i].set_opacity(1.0);
                        }
                        Ok(())
                    },
                );
                animations.borrow_mut().animations.push(animation);
                Ok(())
            });
            running.borrow_mut().timers.push(timer);
        }
        Ok(())
    });

    slide.on(SlideState::AfterHide, move |slide| {
        let Fades { timers, animations } = std::mem::take(&mut *fades.borrow_mut());
        for timer in timers {
            slide.clock().clear_timeout(timer);
        }
        for animation in animations {
            animation.cancel();
        }
        for element in slide.elements() {
            element.set_opacity(1.0);
        }
        Ok(())
    });
    Ok(())
}
