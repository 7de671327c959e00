use std::{
    io::{self, BufRead, Write},
    process::{Command, ExitStatus},
};

/// Side effects the launch sequences need from the outside world.
///
/// `SystemHost` talks to the real console and spawns real processes; tests swap in
/// recorders so every step can be checked without a Python install.
pub trait Host {
    /// Runs `cmd` to completion.
    fn status(&mut self, cmd: &mut Command) -> io::Result<ExitStatus>;
    /// Starts `cmd` and returns without waiting on it.
    fn spawn_detached(&mut self, cmd: &mut Command) -> io::Result<()>;
    /// Prints one status line for the user.
    fn say(&mut self, line: &str);
    /// Blocks until the user acknowledges `prompt`.
    fn pause(&mut self, prompt: &str);
    /// Shows `prompt` and reads one line, terminator included.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

#[derive(Debug, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn status(&mut self, cmd: &mut Command) -> io::Result<ExitStatus> {
        cmd.status()
    }

    fn spawn_detached(&mut self, cmd: &mut Command) -> io::Result<()> {
        // Dropping the handle leaves the child running on its own.
        cmd.spawn().map(|_child| ())
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    fn pause(&mut self, prompt: &str) {
        let _ = self.read_line(prompt);
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut out = io::stdout().lock();
        write!(out, "{prompt}")?;
        out.flush()?;
        drop(out);
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

/// Strips one trailing `\n` or `\r\n` and nothing else.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_ending_keeps_inner_whitespace() {
        assert_eq!(strip_line_ending("C:\\data\\laws\r\n"), "C:\\data\\laws");
        assert_eq!(strip_line_ending("/srv/laws \n"), "/srv/laws ");
        assert_eq!(strip_line_ending("no-newline"), "no-newline");
        assert_eq!(strip_line_ending("\n"), "");
        assert_eq!(strip_line_ending(""), "");
    }
}
