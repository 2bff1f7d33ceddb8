use std::io::BufRead;
use std::sync::mpsc::{SyncSender, TrySendError};
use std::thread;
use std::time::Duration;
use crate::AppEvent;

/// Send `AppEvent::Tick` every `interval` until the receiver goes away.
///
/// Give this a `sync_channel(1)` sender: a tick that finds the slot taken is
/// dropped, so a slow poll merges missed ticks into one instead of queuing them.
pub fn start_ticker(sender: SyncSender<AppEvent>, interval: Duration) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        match sender.try_send(AppEvent::Tick) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => break,
        }
    });
}

/// Parse one line typed by the user
pub fn parse_command(line: &str) -> Option<AppEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "reload" => Some(AppEvent::Reload),
        "q" | "quit" | "exit" => Some(AppEvent::Quit),
        _ => None,
    }
}

/// Forward `reload` / `quit` commands read from `input` until it closes
pub fn start_command_reader<R>(input: R, sender: SyncSender<AppEvent>)
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(event) => {
                    if sender.send(event).is_err() {
                        break;
                    }
                }
                None => tracing::warn!("Unknown command '{}', try 'reload' or 'quit'", line.trim()),
            }
        }
    });
}
