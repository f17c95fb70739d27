//! Human advice
//!
//! Where the character's daily advice comes from. The console source asks
//! on stdin; tests and unattended runs use the others.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Supplies optional advice for a day
pub trait AdviceSource {
    /// `None` means the advisor stayed silent
    fn advice(&mut self, day: u32) -> Option<String>;
}

impl<A: AdviceSource + ?Sized> AdviceSource for Box<A> {
    fn advice(&mut self, day: u32) -> Option<String> {
        (**self).advice(day)
    }
}

/// Reads one line of advice per day; a blank line or end of input is silence
#[derive(Debug)]
pub struct ConsoleAdvice<R> {
    input: R,
}

impl ConsoleAdvice<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> ConsoleAdvice<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> AdviceSource for ConsoleAdvice<R> {
    fn advice(&mut self, _day: u32) -> Option<String> {
        println!("\n>>> What advice do you give? (or press Enter to skip)");
        print!("Your advice: ");
        if let Err(e) = io::stdout().flush() {
            tracing::debug!("Could not flush prompt: {}", e);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(e) => {
                tracing::warn!("Could not read advice: {}", e);
                None
            }
        }
    }
}

/// Never offers advice
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdvice;

impl AdviceSource for NoAdvice {
    fn advice(&mut self, _day: u32) -> Option<String> {
        None
    }
}

/// Replays queued advice, then stays silent
#[derive(Debug, Clone, Default)]
pub struct ScriptedAdvice {
    queue: VecDeque<Option<String>>,
}

impl ScriptedAdvice {
    pub fn new<I, S>(advice: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            queue: advice.into_iter().map(|a| a.map(Into::into)).collect(),
        }
    }
}

impl AdviceSource for ScriptedAdvice {
    fn advice(&mut self, _day: u32) -> Option<String> {
        self.queue.pop_front().flatten()
    }
}
