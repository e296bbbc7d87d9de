// The keyboard driven session.
//
// A line may hold several commands separated by ';'. They are applied back to
// back before a pending transition runs, like keys pressed in a burst: the
// ones that arrive during the transition are dropped by the navigator.

use std::io::{BufRead, Write};
use std::thread::sleep;
use std::time::Duration;

use crate::story::boundaries::BoundaryFeature;
use crate::story::render::*;
use crate::story::*;

use regional_story::{Navigator, Observation, Story, TransitionTimings};

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Command {
    Previous,
    Next,
    /// A chapter indicator, counted from 1.
    Chapter(usize),
    /// A subsection indicator of the current chapter, counted from 1.
    Subsection(usize),
    Hover(String),
    Click(String),
    Quit,
}

pub fn parse_command(s: &str) -> Option<Command> {
    let s = s.trim();
    let (head, rest) = match s.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (s, ""),
    };
    let index = |r: &str| r.parse::<usize>().ok().filter(|i| *i > 0);
    match head {
        "up" | "k" => Some(Command::Previous),
        "down" | "j" => Some(Command::Next),
        "c" => index(rest).map(Command::Chapter),
        "s" => index(rest).map(Command::Subsection),
        "h" if !rest.is_empty() => Some(Command::Hover(rest.to_string())),
        "p" if !rest.is_empty() => Some(Command::Click(rest.to_string())),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

pub struct Session<'a, W: Write> {
    story: &'a Story,
    rows: &'a [Observation],
    features: &'a [BoundaryFeature],
    timings: TransitionTimings,
    nav: Navigator,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(
        story: &'a Story,
        rows: &'a [Observation],
        features: &'a [BoundaryFeature],
        timings: TransitionTimings,
        out: W,
    ) -> Session<'a, W> {
        Session {
            story,
            rows,
            features,
            timings,
            nav: Navigator::new(story),
            out,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    fn show(&mut self) -> StoryResult<()> {
        let text = render_step(self.story, &self.nav.cursor(), self.rows, self.features);
        writeln!(self.out, "{}\n", text).context(WritingOutputSnafu { path: "stdout" })
    }

    fn say(&mut self, msg: &str) -> StoryResult<()> {
        writeln!(self.out, "{}", msg).context(WritingOutputSnafu { path: "stdout" })
    }

    // Fade out, swap the content, fade in.
    fn run_transition(&mut self) -> StoryResult<()> {
        if !self.nav.is_transitioning() {
            return Ok(());
        }
        pause(self.timings.fade_out_ms);
        self.nav.commit();
        self.show()?;
        pause(self.timings.settle_ms);
        self.nav.settle();
        Ok(())
    }

    /// Applies one command. Returns false when the session should end.
    pub fn apply(&mut self, command: &Command) -> StoryResult<bool> {
        debug!("apply: {:?} at {:?}", command, self.nav.cursor());
        match command {
            Command::Previous => {
                if self.nav.previous() && !self.nav.is_transitioning() {
                    self.show()?;
                }
            }
            Command::Next => {
                if self.nav.next() && !self.nav.is_transitioning() {
                    self.show()?;
                }
            }
            Command::Chapter(i) => {
                if let Some(idx) = i.checked_sub(1) {
                    self.nav.go_to_chapter(idx);
                }
            }
            Command::Subsection(i) => {
                let moved = i.checked_sub(1).map_or(false, |idx| self.nav.set_subsection(idx));
                if moved {
                    self.show()?;
                }
            }
            Command::Hover(name) => {
                let view = MapView::new(self.story, &self.nav.cursor(), self.rows);
                let msg = match find_feature(self.features, name) {
                    Some(f) => view.tooltip(&f.name),
                    None => format!("Unknown region {:?}", name),
                };
                self.say(&msg)?;
            }
            Command::Click(name) => {
                let view = MapView::new(self.story, &self.nav.cursor(), self.rows);
                let msg = match find_feature(self.features, name) {
                    Some(f) => {
                        let event = click(&view, f);
                        info!("Region clicked: {} {:?}", event.name, event.value);
                        serde_json::to_string(&event).context(SerializingJsonSnafu {})?
                    }
                    None => format!("Unknown region {:?}", name),
                };
                self.say(&msg)?;
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    pub fn run<R: BufRead>(&mut self, input: R) -> StoryResult<()> {
        self.nav.initialize();
        self.run_transition()?;
        for line_r in input.lines() {
            let line = line_r.context(ReadingInputSnafu {})?;
            for part in line.split(';').filter(|p| !p.trim().is_empty()) {
                let keep_going = match parse_command(part) {
                    Some(c) => self.apply(&c)?,
                    None => {
                        self.say(&format!("Unknown command {:?}", part.trim()))?;
                        true
                    }
                };
                if !keep_going {
                    return Ok(());
                }
            }
            self.run_transition()?;
        }
        Ok(())
    }
}

fn pause(ms: u64) {
    if ms > 0 {
        sleep(Duration::from_millis(ms));
    }
}
