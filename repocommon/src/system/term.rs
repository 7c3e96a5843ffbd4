use crate::prelude::*;

use std::io::IsTerminal;

use terminal_size::{Height, Width};

use super::Error;

/// Size of a terminal in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

/// Get the size of the terminal attached to stdout
pub fn stdout_dimensions() -> Result<Dimensions, Error> {
    let stdout = std::io::stdout();
    if !stdout.is_terminal() {
        return Err(report!(Error::NotTerminal("stdout")));
    }
    let (Width(cols), Height(rows)) =
        terminal_size::terminal_size_of(stdout).ok_or(Error::TerminalSize("stdout"))?;
    verboseln!("stdout is {}x{}", cols, rows);

    Ok(Dimensions { rows, cols })
}

/// Raw input and output mode bits of a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalModes {
    pub input: u64,
    pub output: u64,
}

/// Get the termios mode bits of the terminal attached to stdout
#[cfg(unix)]
pub fn stdout_modes() -> Result<TerminalModes, Error> {
    let termios = rustix::termios::tcgetattr(rustix::stdio::stdout())
        .change_context(Error::TerminalModes("stdout"))?;

    Ok(TerminalModes {
        input: u64::from(termios.input_modes.bits()),
        output: u64::from(termios.output_modes.bits()),
    })
}

/// Get the name of the tty attached to stdout, e.g. `/dev/pts/0`
#[cfg(unix)]
pub fn stdout_tty_name() -> Result<String, Error> {
    let name = rustix::termios::ttyname(rustix::stdio::stdout(), Vec::new())
        .change_context(Error::TtyName("stdout"))?;
    verboseln!("stdout is {}", name.to_string_lossy());

    Ok(name.to_string_lossy().into_owned())
}
