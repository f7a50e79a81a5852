//! The interactive command loop

use anyhow::Context;
use ay38910::{ByteStream, Error, Session, catalog};
use dialoguer::Input;
use dialoguer::console::style;
use tracing::error;

/// What a line of operator input asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Request<'a> {
    Help,
    Quit,
    Command(&'a str),
}

impl<'a> Request<'a> {
    /// Expects input that is already trimmed and lowercased
    pub fn parse(line: &'a str) -> Self {
        match line {
            "h" | "help" => Request::Help,
            "q" | "quit" => Request::Quit,
            command => Request::Command(command),
        }
    }
}

pub fn usage() -> String {
    format!(
        "usage: ay38910a cli controller tool.
  - 'h', 'help':                show this message
  - 'q', 'quit':                exit the tool
  - 'amplitude, octave, shape': manage settings
      - 0 <= amplitude <= 15, 0 <= octave <= 8
      - for shape, use either its id or its string:
{}",
        catalog::help_listing()
    )
}

/// Read commands until the operator quits or the link breaks
pub fn run<S: ByteStream>(session: &mut Session<S>) -> anyhow::Result<()> {
    println!("Connected, input a frame, use 'h' or 'help' for more info");

    loop {
        let line: String = Input::new()
            .with_prompt(">>>")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;
        let line = line.trim().to_lowercase();

        match Request::parse(&line) {
            Request::Help => println!("{}", usage()),
            Request::Quit => return Ok(()),
            Request::Command(raw) => match session.submit(raw) {
                Ok(reply) => println!("{}", style(String::from_utf8_lossy(&reply)).dim()),
                Err(Error::Validation(e)) => {
                    println!("{}, use 'h' or 'help' for more info", style(e).yellow())
                }
                Err(Error::Encode(e)) => error!("refusing to send command: {e}"),
                Err(Error::Transport(e)) => {
                    return Err(e).context("Lost the link to the synth");
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests() {
        assert_eq!(Request::parse("h"), Request::Help);
        assert_eq!(Request::parse("help"), Request::Help);
        assert_eq!(Request::parse("q"), Request::Quit);
        assert_eq!(Request::parse("quit"), Request::Quit);
        assert_eq!(Request::parse("1,2,3"), Request::Command("1,2,3"));
    }

    #[test]
    fn usage_lists_every_shape() {
        let usage = usage();
        for shape in catalog::describe() {
            assert!(usage.contains(shape.name));
        }
    }
}
