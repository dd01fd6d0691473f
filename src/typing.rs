use std::rc::Rc;

use log::{debug, error};

use crate::config::TYPING_CLASS;
use crate::dom::ElementHandle;
use crate::error::SiteError;
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingStep {
    Char(char),
    LineBreak,
    Finished,
}

/// Character-by-character reveal of a string.
#[derive(Debug, Clone)]
pub struct TypeWriter {
    chars: Vec<char>,
    index: usize,
    delay_ms: u32,
}

impl TypeWriter {
    pub fn new(text: &str, delay_ms: u32) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            delay_ms,
        }
    }

    pub fn step(&mut self) -> TypingStep {
        match self.chars.get(self.index) {
            Some(&c) => {
                self.index += 1;
                if c == '\n' {
                    TypingStep::LineBreak
                } else {
                    TypingStep::Char(c)
                }
            }
            None => TypingStep::Finished,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.chars.len()
    }
}

/// Clears `element` and types `text` into it, one step per `delay_ms`.
///
/// The first character is written immediately. The `typing` class stays on the
/// element until one delay after the last character.
pub fn type_into<E, S>(element: E, text: &str, delay_ms: u32, scheduler: Rc<S>) -> Result<(), SiteError>
where
    E: ElementHandle + 'static,
    S: Scheduler + ?Sized + 'static,
{
    element.clear_content()?;
    element.add_class(TYPING_CLASS)?;

    let writer = TypeWriter::new(text, delay_ms);
    debug!("Typing {} characters", writer.len());
    advance(element, writer, scheduler);
    Ok(())
}

fn advance<E, S>(element: E, mut writer: TypeWriter, scheduler: Rc<S>)
where
    E: ElementHandle + 'static,
    S: Scheduler + ?Sized + 'static,
{
    let written = match writer.step() {
        TypingStep::Char(c) => element.append_text(c.encode_utf8(&mut [0; 4])),
        TypingStep::LineBreak => element.append_line_break(),
        TypingStep::Finished => {
            if let Err(e) = element.remove_class(TYPING_CLASS) {
                error!("Failed to finish typing animation: {}", e);
            }
            return;
        }
    };

    if let Err(e) = written {
        error!("Typing animation stopped: {}", e);
        return;
    }

    let delay = writer.delay_ms();
    let next = Rc::clone(&scheduler);
    scheduler.schedule(delay, Box::new(move || advance(element, writer, next)));
}
