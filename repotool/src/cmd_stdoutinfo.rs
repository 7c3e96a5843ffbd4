use repocommon::prelude::*;

use std::io::Write;

use repocommon::system::{Dimensions, TerminalModes};

use crate::error::Error;

pub fn run() -> Result<(), Error> {
    let dimensions = match system::stdout_dimensions() {
        Ok(dimensions) => dimensions,
        Err(e) => {
            errorln!("Failed", "Cannot get terminal size of stdout");
            hintln!("Consider", "Run without redirecting stdout");
            return Err(e.change_context(Error::StdoutInfo));
        }
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", describe_dimensions(dimensions)).change_context(Error::StdoutInfo)?;

    #[cfg(unix)]
    {
        let modes = system::stdout_modes().change_context(Error::StdoutInfo)?;
        writeln!(stdout, "{}", describe_modes(modes)).change_context(Error::StdoutInfo)?;

        let tty = system::stdout_tty_name().change_context(Error::StdoutInfo)?;
        writeln!(stdout, "tty: {}", tty).change_context(Error::StdoutInfo)?;
    }

    Ok(())
}

fn describe_dimensions(dimensions: Dimensions) -> String {
    format!("Rows: {}, Cols: {}", dimensions.rows, dimensions.cols)
}

#[cfg_attr(not(unix), allow(dead_code))]
fn describe_modes(modes: TerminalModes) -> String {
    format!("Input flags: {}, Output flags: {}", modes.input, modes.output)
}
