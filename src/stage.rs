use std::cell::Cell;
use std::rc::Rc;

/// Deck-wide visual state shared between transitions and the renderer.
#[derive(Debug, Clone)]
pub struct Stage(Rc<StageState>);

#[derive(Debug)]
struct StageState {
    overlay: Cell<Option<f32>>, // Opacity of the full-screen black overlay, if present
    scale: Cell<f32>,
}

impl Default for Stage {
    fn default() -> Self {
        Self(Rc::new(StageState {
            overlay: Cell::new(None),
            scale: Cell::new(1.0),
        }))
    }
}

impl Stage {
    pub fn overlay(&self) -> Option<f32> {
        self.0.overlay.get()
    }

    pub fn set_overlay(&self, opacity: Option<f32>) {
        self.0.overlay.set(opacity.map(|o| o.clamp(0.0, 1.0)));
    }

    pub fn scale(&self) -> f32 {
        self.0.scale.get()
    }

    /// Scale the container to fit `window` without cropping.
    pub fn fill(&self, window: (f32, f32), container: (f32, f32)) {
        self.0.scale.set(scale_to_fill(window, container));
    }
}

pub fn scale_to_fill(window: (f32, f32), container: (f32, f32)) -> f32 {
    if container.0 <= 0.0 || container.1 <= 0.0 {
        return 1.0;
    }
    let scale_x = window.0 / container.0;
    let scale_y = window.1 / container.1;
    scale_x.min(scale_y)
}
