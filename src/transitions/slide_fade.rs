use anyhow::Result;
use raylib::ease;

use crate::constants::{SLIDE_FADE_DELAY, SLIDE_FADE_DISTANCE, SLIDE_FADE_DURATION};
use crate::transitions::Transit;

/// Slide the current slide out to the left while the new one slides in
/// from the right, both fading.
pub fn slide_fade(transit: Transit) -> Result<()> {
    let Transit { from, to, clock, done, .. } = transit;

    from.update_style(|s| {
        s.positioned = true;
        s.offset_x = 0.0;
    });
    to.update_style(|s| {
        s.positioned = true;
        s.offset_x = SLIDE_FADE_DISTANCE;
        s.opacity = 0.0;
    });

    let animator = clock.clone();
    clock.set_timeout(SLIDE_FADE_DELAY, move || {
        let secs = SLIDE_FADE_DURATION.as_secs_f32();
        let mut out_x = ease::Tween::new(ease::quad_in_out, 0.0, -SLIDE_FADE_DISTANCE, secs);
        let mut in_x = ease::Tween::new(ease::quad_in_out, SLIDE_FADE_DISTANCE, 0.0, secs);
        let mut fade_out = ease::Tween::new(ease::quad_in_out, 1.0, 0.0, secs);
        let mut fade_in = ease::Tween::new(ease::quad_in_out, 0.0, 1.0, secs);

        let (outgoing, incoming) = (from.clone(), to.clone());
        animator.animate(
            SLIDE_FADE_DURATION,
            move |dt| {
                outgoing.update_style(|s| {
                    s.offset_x = out_x.apply(dt);
                    s.opacity = fade_out.apply(dt);
                });
                incoming.update_style(|s| {
                    s.offset_x = in_x.apply(dt);
                    s.opacity = fade_in.apply(dt);
                });
            },
            move || {
                // Back to normal flow so nothing leaks into the next transition
                to.update_style(|s| {
                    s.positioned = false;
                    s.offset_x = 0.0;
                    s.opacity = 1.0;
                });
                from.update_style(|s| {
                    s.positioned = false;
                    s.offset_x = 0.0;
                    s.opacity = 1.0;
                });
                done.finish()
            },
        );
        Ok(())
    });
    Ok(())
}
