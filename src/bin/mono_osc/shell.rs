//! Line-oriented console for `--plain` mode.

use std::io::{self, BufRead, Write};

use super::command::{Reply, Session, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until `q` or end of input.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    name: &str,
    input: R,
    output: &mut W,
) -> io::Result<()> {
    writeln!(output, "Hi! if you need help, type h")?;
    writeln!(output, "To close the synth, type q or ^D")?;
    write!(output, "{name}: ")?;
    output.flush()?;

    for line in input.lines() {
        if handle_line(session, &line?, output)? == Flow::Quit {
            return Ok(());
        }
        match session.prompt() {
            Some(prompt) => write!(output, "{prompt}")?,
            None => write!(output, "{name}: ")?,
        }
        output.flush()?;
    }

    // ^D leaves the cursor after a prompt
    writeln!(output)?;
    Ok(())
}

fn handle_line<W: Write>(session: &mut Session, line: &str, output: &mut W) -> io::Result<Flow> {
    if session.pending().is_some() {
        return report(session.answer(line), output);
    }

    let mut chars = line.trim().chars();
    let Some(key) = chars.next() else {
        return Ok(Flow::Continue);
    };
    let flow = report(session.command(key), output)?;

    // "A -0.5" answers the prompt on the same line
    let rest = chars.as_str().trim();
    if flow == Flow::Continue && session.pending().is_some() && !rest.is_empty() {
        return report(session.answer(rest), output);
    }
    Ok(flow)
}

fn report<W: Write>(reply: Reply, output: &mut W) -> io::Result<Flow> {
    match reply {
        Reply::Idle | Reply::Ask => {}
        Reply::Done(message) => writeln!(output, "{message}")?,
        Reply::Rejected(err) => writeln!(output, "Error: {err}")?,
        Reply::UnknownCommand(key) => writeln!(output, "Unknown command '{key}', type h for help")?,
        Reply::Help => writeln!(output, "{HELP}")?,
        Reply::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
