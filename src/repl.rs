//! Interactive loop for the Pokedex shell
//!
//! Input is read on its own thread and handed to the command loop over an
//! unbounded channel, so reading never waits on a command and a command never
//! waits on reading. The loop runs one command at a time in input order.

use std::io::{BufRead, Write};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::{CommandError, ControlFlow, Dispatcher};

/// Prompt printed before each line is read
pub const PROMPT: &str = "pokedex > ";

/// Starts a thread that forwards trimmed input lines into a channel
///
/// The channel closes when the input reaches end of file, fails to read, or
/// the receiver is dropped. The thread is detached; it does not hold up
/// process exit.
pub fn spawn_line_reader<R>(input: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line.trim().to_string()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    break;
                }
            }
        }
        debug!("input closed");
    });

    rx
}

/// Runs commands from `lines` until `exit` or end of input
///
/// Command errors are printed as a single line and the loop carries on; only
/// a failure to write to `out` ends it early.
pub async fn run<W: Write>(
    dispatcher: &mut Dispatcher,
    lines: &mut mpsc::UnboundedReceiver<String>,
    out: &mut W,
) -> std::io::Result<()> {
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.recv().await else {
            writeln!(out)?;
            break;
        };
        if line.is_empty() {
            continue;
        }

        match dispatcher.execute_line(&line, out).await {
            Ok(ControlFlow::Continue) => {}
            Ok(ControlFlow::Exit) => break,
            Err(CommandError::Output(e)) => return Err(e),
            Err(e) => {
                if matches!(e, CommandError::Resource(_)) {
                    warn!(error = %e, command = %line, "command failed");
                } else {
                    debug!(error = %e, command = %line, "command rejected");
                }
                writeln!(out, "{}", e)?;
            }
        }
        out.flush()?;
    }

    Ok(())
}
