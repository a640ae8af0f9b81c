use anyhow::Result;
use raylib::ease;

use crate::constants::FADE_TO_BLACK_STEP;
use crate::transitions::Transit;

/// Fade to black, swap the slides, then fade the new slide in.
pub fn fade_to_black(transit: Transit) -> Result<()> {
    let Transit { from, to, clock, stage, done } = transit;

    // Not ready for the new slide yet
    to.update_style(|s| s.visible = false);
    stage.set_overlay(Some(0.0));

    let step = FADE_TO_BLACK_STEP.as_secs_f32();
    let mut darken = ease::Tween::new(ease::quad_in_out, 0.0, 1.0, step);
    let overlay = stage.clone();
    let next = clock.clone();
    clock.animate(
        FADE_TO_BLACK_STEP,
        move |dt| overlay.set_overlay(Some(darken.apply(dt))),
        move || {
            stage.set_overlay(Some(1.0));
            from.update_style(|s| s.visible = false);
            to.update_style(|s| s.visible = true);

            let mut lighten = ease::Tween::new(ease::quad_in_out, 1.0, 0.0, step);
            let overlay = stage.clone();
            next.animate(
                FADE_TO_BLACK_STEP,
                move |dt| overlay.set_overlay(Some(lighten.apply(dt))),
                move || {
                    stage.set_overlay(None);
                    done.finish()
                },
            );
            Ok(())
        },
    );
    Ok(())
}
