use std::fmt;

/// Lifecycle state of a slide. The state is also the name of the event
/// fired when a slide enters it.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum SlideState {
    #[default]
    AfterHide, // Off-screen
    Show,      // About to transition into view
    AfterShow, // Fully visible, may call complete()
    Hide,      // About to transition out of view
}

impl SlideState {
    pub fn event_name(self) -> &'static str {
        match self {
            SlideState::AfterHide => "afterHide",
            SlideState::Show => "show",
            SlideState::AfterShow => "afterShow",
            SlideState::Hide => "hide",
        }
    }

    /// The only state a slide may move to from `self`.
    pub fn next(self) -> SlideState {
        match self {
            SlideState::AfterHide => SlideState::Show,
            SlideState::Show => SlideState::AfterShow,
            SlideState::AfterShow => SlideState::Hide,
            SlideState::Hide => SlideState::AfterHide,
        }
    }

    pub fn is_on_screen(self) -> bool {
        matches!(self, SlideState::Show | SlideState::AfterShow)
    }
}

impl fmt::Display for SlideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_returns_to_start_after_four_steps() {
        let mut state = SlideState::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(
            seen,
            [SlideState::Show, SlideState::AfterShow, SlideState::Hide, SlideState::AfterHide]
        );
    }

    #[test]
    fn only_show_states_are_on_screen() {
        assert!(SlideState::Show.is_on_screen());
        assert!(SlideState::AfterShow.is_on_screen());
        assert!(!SlideState::Hide.is_on_screen());
        assert!(!SlideState::AfterHide.is_on_screen());
    }
}
