//! The reading position and the guarded moves between chapters.
//!
//! A chapter change is a two step transition. `go_to_chapter` only starts a
//! fade out. `commit` then swaps the content and `settle` makes the story
//! interactive again. The surface decides how long to wait before each step
//! (see [TransitionTimings](crate::TransitionTimings)); the navigator only
//! guarantees the order, and that a single transition is in flight.
//!
//! Every rejected move returns `false` and leaves the state untouched.

use log::{debug, info};
use serde::Serialize;

use crate::config::Cursor;
use crate::narrative::Story;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
pub enum Phase {
    Idle,
    /// The current content fades out. The cursor still points at the old node.
    FadingOut { target: usize },
    /// The new content is in place but not yet interactive.
    FadingIn,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Navigator {
    subsection_counts: Vec<usize>,
    cursor: Cursor,
    phase: Phase,
    initialized: bool,
}

impl Navigator {
    pub fn new(story: &Story) -> Navigator {
        Navigator::from_counts(story.subsection_counts())
    }

    /// A navigator over chapters with the given number of subsections each.
    pub fn from_counts(subsection_counts: Vec<usize>) -> Navigator {
        let in_subsection_mode = subsection_counts.first().map_or(false, |c| *c > 0);
        Navigator {
            subsection_counts,
            cursor: Cursor {
                chapter: 0,
                subsection: 0,
                in_subsection_mode,
            },
            phase: Phase::Idle,
            initialized: false,
        }
    }

    /// An initialized, idle navigator already at `cursor`, for surfaces that
    /// draw a step they did not navigate to. `None` when the cursor does not
    /// point at a node of the story.
    pub fn resting_at(story: &Story, cursor: Cursor) -> Option<Navigator> {
        let mut nav = Navigator::new(story);
        let count = nav.subsection_counts.get(cursor.chapter).cloned()?;
        let valid = if cursor.in_subsection_mode {
            cursor.subsection < count
        } else {
            cursor.subsection == 0
        };
        if !valid {
            return None;
        }
        nav.cursor = cursor;
        nav.initialized = true;
        Some(nav)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn chapter_count(&self) -> usize {
        self.subsection_counts.len()
    }

    fn subsection_count(&self, chapter: usize) -> usize {
        self.subsection_counts.get(chapter).cloned().unwrap_or(0)
    }

    /// Enters the first chapter through a regular transition, once the data
    /// is available. Only the first call has an effect.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        self.go_to_chapter(0)
    }

    /// Starts the transition to a chapter.
    ///
    /// Ignored when the index is out of range or while another transition
    /// is in progress.
    pub fn go_to_chapter(&mut self, index: usize) -> bool {
        if index >= self.chapter_count() {
            debug!("go_to_chapter: index {} out of range", index);
            return false;
        }
        if self.is_transitioning() {
            debug!("go_to_chapter: {:?} in progress, ignoring {}", self.phase, index);
            return false;
        }
        info!(
            "Navigating to chapter {} (has subsections: {})",
            index,
            self.subsection_count(index) > 0
        );
        self.phase = Phase::FadingOut { target: index };
        true
    }

    /// Swaps the content: the cursor moves to the first node of the target
    /// chapter.
    pub fn commit(&mut self) -> bool {
        match self.phase {
            Phase::FadingOut { target } => {
                self.cursor = Cursor {
                    chapter: target,
                    subsection: 0,
                    in_subsection_mode: self.subsection_count(target) > 0,
                };
                self.phase = Phase::FadingIn;
                debug!("commit: cursor: {:?}", self.cursor);
                true
            }
            _ => false,
        }
    }

    /// Ends the transition.
    pub fn settle(&mut self) -> bool {
        match self.phase {
            Phase::FadingIn => {
                self.phase = Phase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Runs both steps of a pending transition without waiting.
    pub fn finish_transition(&mut self) -> bool {
        let committed = self.commit();
        let settled = self.settle();
        committed || settled
    }

    pub fn previous(&mut self) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let c = self.cursor;
        if c.in_subsection_mode && c.subsection > 0 {
            self.cursor.subsection -= 1;
            info!("Previous subsection: {}", self.cursor.subsection);
            return true;
        }
        if c.chapter == 0 {
            return false;
        }
        self.go_to_chapter(c.chapter - 1)
    }

    pub fn next(&mut self) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let c = self.cursor;
        if c.in_subsection_mode && c.subsection + 1 < self.subsection_count(c.chapter) {
            self.cursor.subsection += 1;
            info!("Next subsection: {}", self.cursor.subsection);
            return true;
        }
        self.go_to_chapter(c.chapter + 1)
    }

    /// Jumps to a subsection of the current chapter. There is no transition.
    pub fn set_subsection(&mut self, index: usize) -> bool {
        if self.is_transitioning() || !self.cursor.in_subsection_mode {
            return false;
        }
        if index >= self.subsection_count(self.cursor.chapter) {
            debug!("set_subsection: index {} out of range", index);
            return false;
        }
        self.cursor.subsection = index;
        true
    }

    pub fn can_go_previous(&self) -> bool {
        let c = self.cursor;
        c.chapter > 0 || (c.in_subsection_mode && c.subsection > 0)
    }

    pub fn can_go_next(&self) -> bool {
        let c = self.cursor;
        c.chapter + 1 < self.chapter_count()
            || (c.in_subsection_mode && c.subsection + 1 < self.subsection_count(c.chapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn at(chapter: usize, subsection: usize, in_subsection_mode: bool) -> Cursor {
        Cursor {
            chapter,
            subsection,
            in_subsection_mode,
        }
    }

    // intro, then two chapters with 3 subsections, then a bare chapter.
    fn navigator() -> Navigator {
        init_logger();
        let mut nav = Navigator::from_counts(vec![0, 3, 3, 0]);
        assert!(nav.initialize());
        assert!(nav.finish_transition());
        nav
    }

    #[test]
    fn resting_navigator() {
        let story = Story::builtin().unwrap();
        let nav = Navigator::resting_at(&story, at(1, 2, true)).unwrap();
        assert!(!nav.is_transitioning());
        assert!(nav.can_go_previous());
        assert!(nav.can_go_next());
        let mut last = Navigator::resting_at(&story, at(3, 2, true)).unwrap();
        assert!(!last.can_go_next());
        // Already initialized.
        assert!(!last.initialize());
        assert!(Navigator::resting_at(&story, at(1, 3, true)).is_none());
        assert!(Navigator::resting_at(&story, at(4, 0, false)).is_none());
        assert!(Navigator::resting_at(&story, at(0, 1, false)).is_none());
    }

    #[test]
    fn initialize_runs_once() {
        let mut nav = Navigator::from_counts(vec![2, 0]);
        assert_eq!(nav.cursor(), at(0, 0, true));
        assert!(nav.initialize());
        assert_eq!(nav.phase(), Phase::FadingOut { target: 0 });
        assert!(nav.finish_transition());
        assert!(!nav.initialize());
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn previous_at_start_is_a_noop() {
        let mut nav = navigator();
        assert_eq!(nav.cursor(), at(0, 0, false));
        assert!(!nav.can_go_previous());
        assert!(!nav.previous());
        assert_eq!(nav.cursor(), at(0, 0, false));
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn next_at_the_end_is_a_noop() {
        let mut nav = navigator();
        assert!(nav.go_to_chapter(3));
        nav.finish_transition();
        assert!(!nav.can_go_next());
        assert!(!nav.next());
        assert_eq!(nav.cursor(), at(3, 0, false));
    }

    #[test]
    fn next_from_last_subsection_enters_next_chapter() {
        let mut nav = navigator();
        nav.go_to_chapter(1);
        nav.finish_transition();
        assert!(nav.set_subsection(2));
        assert!(nav.next());
        // The content only changes on commit.
        assert_eq!(nav.cursor(), at(1, 2, true));
        assert!(nav.commit());
        assert_eq!(nav.cursor(), at(2, 0, true));
        assert!(nav.settle());

        nav.set_subsection(2);
        assert!(nav.next());
        nav.finish_transition();
        assert_eq!(nav.cursor(), at(3, 0, false));
    }

    #[test]
    fn steps_through_subsections_without_transition() {
        let mut nav = navigator();
        nav.next();
        nav.finish_transition();
        assert_eq!(nav.cursor(), at(1, 0, true));
        assert!(nav.next());
        assert!(!nav.is_transitioning());
        assert_eq!(nav.cursor(), at(1, 1, true));
        assert!(nav.previous());
        assert_eq!(nav.cursor(), at(1, 0, true));
        // At the first subsection, previous leaves the chapter.
        assert!(nav.previous());
        nav.finish_transition();
        assert_eq!(nav.cursor(), at(0, 0, false));
    }

    #[test]
    fn previous_chapter_starts_at_its_first_subsection() {
        let mut nav = navigator();
        nav.go_to_chapter(3);
        nav.finish_transition();
        nav.previous();
        nav.finish_transition();
        assert_eq!(nav.cursor(), at(2, 0, true));
    }

    #[test]
    fn second_transition_is_ignored() {
        let mut nav = navigator();
        assert!(nav.go_to_chapter(1));
        assert!(!nav.go_to_chapter(2));
        assert_eq!(nav.phase(), Phase::FadingOut { target: 1 });
        assert!(nav.commit());
        assert!(!nav.go_to_chapter(2));
        assert!(!nav.next());
        assert!(!nav.previous());
        assert!(!nav.set_subsection(1));
        assert_eq!(nav.cursor(), at(1, 0, true));
        assert!(nav.settle());
        assert!(nav.go_to_chapter(2));
    }

    #[test]
    fn phases_in_order() {
        let mut nav = navigator();
        assert!(!nav.commit());
        assert!(!nav.settle());
        nav.go_to_chapter(2);
        assert!(!nav.settle());
        assert!(nav.commit());
        assert!(!nav.commit());
        assert!(nav.settle());
        assert_eq!(nav.phase(), Phase::Idle);
    }

    #[test]
    fn invalid_targets() {
        let mut nav = navigator();
        assert!(!nav.go_to_chapter(4));
        assert!(!nav.set_subsection(0));
        nav.go_to_chapter(1);
        nav.finish_transition();
        assert!(!nav.set_subsection(3));
        assert!(nav.set_subsection(1));
        assert_eq!(nav.cursor(), at(1, 1, true));
    }

    #[test]
    fn cursor_invariants_hold_on_a_walk() {
        let mut nav = navigator();
        let mut steps = 0;
        while nav.next() {
            nav.finish_transition();
            let c = nav.cursor();
            assert!(c.chapter < nav.chapter_count());
            let count = nav.subsection_count(c.chapter);
            assert_eq!(c.in_subsection_mode, count > 0);
            if c.in_subsection_mode {
                assert!(c.subsection < count);
            }
            steps += 1;
        }
        // 3 chapter changes plus 2 subsection steps in each of two chapters.
        assert_eq!(steps, 7);
    }
}
