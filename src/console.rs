use crate::progress;
use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, Clear, ClearType},
};
use indicatif::ProgressBar;
use std::io::{self, IsTerminal};

/// Everything the sync flow says to, or asks of, the user.
pub trait Console {
    fn notice(&mut self, lines: &[&str]);

    /// Prints `label` and returns a byte progress bar to report into.
    fn begin_task(&mut self, label: &str) -> ProgressBar;

    /// Clears the bar and prints the closing word for the current task.
    fn end_task(&mut self, progress: ProgressBar, status: &str);

    /// `true` only for an explicit yes.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    fn clear(&mut self);
}

/// Prints a message framed by dashes, as used for the update banner.
pub fn banner(message: &str) -> [String; 3] {
    let rule = "-".repeat(message.chars().count());
    [rule.clone(), message.to_string(), rule]
}

pub struct TerminalConsole {
    interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole {
            interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
        }
    }

    /// Blocks until a key is pressed. Does nothing without a terminal.
    pub fn wait_for_key(&mut self, message: &str) {
        println!("{message}");
        if self.interactive {
            let _ = read_key();
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn notice(&mut self, lines: &[&str]) {
        for line in lines {
            println!("{line}");
        }
    }

    fn begin_task(&mut self, label: &str) -> ProgressBar {
        println!("{label}");
        if self.interactive {
            progress::byte_bar()
        } else {
            ProgressBar::hidden()
        }
    }

    fn end_task(&mut self, progress: ProgressBar, status: &str) {
        progress.finish_and_clear();
        println!("{status}");
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        println!("{question} (Y)es (N)o");
        if !self.interactive {
            let mut line = String::new();
            io::stdin().read_line(&mut line).context("read answer")?;
            return Ok(line.trim().eq_ignore_ascii_case("y"));
        }
        let key = read_key()?;
        Ok(matches!(key, KeyCode::Char('y' | 'Y')))
    }

    fn clear(&mut self) {
        if self.interactive {
            let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
        }
    }
}

fn read_key() -> Result<KeyCode> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(key.code),
            Ok(_) => continue,
            Err(err) => break Err(err).context("read key"),
        }
    };
    let _ = terminal::disable_raw_mode();
    result
}
