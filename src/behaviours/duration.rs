use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use crate::behaviours::AttrValue;
use crate::clock::TimerId;
use crate::error::Error;
use crate::slide::Slide;
use crate::state::SlideState;

/// `data-duration="3000"`: advance 3 seconds after the slide is fully
/// shown. Leaving the slide early cancels the pending advance.
pub fn duration(slide: &Slide, value: &AttrValue) -> Result<()> {
    let delay = value
        .as_number()
        .and_then(|ms| Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).ok())
        .ok_or_else(|| Error::NotANumber {
            slide: slide.id().to_string(),
            name: "duration".to_string(),
            value: value.to_string(),
        })?;
    let pending: Rc<Cell<Option<TimerId>>> = Rc::default();

    let armed = pending.clone();
    slide.on(SlideState::AfterShow, move |slide| {
        let target = slide.downgrade();
        let timer = slide.clock().set_timeout(delay, move || match target.upgrade() {
            Some(slide) => slide.complete(),
            None => Ok(()),
        });
        armed.set(Some(timer));
        Ok(())
    });
    slide.on(SlideState::Hide, move |slide| {
        if let Some(timer) = pending.take() {
            slide.clock().clear_timeout(timer);
        }
        Ok(())
    });
    Ok(())
}
