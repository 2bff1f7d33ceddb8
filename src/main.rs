use clap::Parser;
use anyhow::Result;
use std::io::BufReader;
use std::sync::mpsc;

use filemon::{
    cli::{Cli, OutputFormat},
    start_command_reader, start_ticker, AppEvent, MatchEvent, Monitor,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = cli.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    cli.setup_logging();

    let settings = cli.settings()?;
    let files = cli.get_files()?;
    let interval = settings.poll_interval();

    let mut monitor = Monitor::new(settings);
    let report = monitor.start(&files, &cli.patterns)?;
    for failure in &report.failed {
        eprintln!("{}", failure);
    }
    eprintln!("{}", monitor.current_config());
    tracing::info!(
        "Polling every {} ms; type 'reload' to re-read patterns, Ctrl+C to quit",
        interval.as_millis()
    );

    // One slot: ticks that find it taken are dropped, other senders block
    let (tx, rx) = mpsc::sync_channel::<AppEvent>(1);
    let quit_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = quit_tx.send(AppEvent::Quit);
    })?;
    start_command_reader(BufReader::new(std::io::stdin()), tx.clone());
    start_ticker(tx, interval);

    // One loop owns the monitor, so polls never overlap
    while let Ok(event) = rx.recv() {
        match event {
            AppEvent::Tick => {
                for event in monitor.poll() {
                    print_event(&event, &cli)?;
                }
            }
            AppEvent::Reload => {
                match monitor.reload(&cli.patterns) {
                    Ok(count) => tracing::info!("Reloaded {} patterns", count),
                    Err(err) => tracing::warn!("{}; keeping previous patterns", err),
                }
                eprintln!("{}", monitor.current_config());
            }
            AppEvent::Quit => break,
        }
    }

    monitor.stop();
    Ok(())
}

fn print_event(event: &MatchEvent, cli: &Cli) -> Result<()> {
    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
        OutputFormat::Compact => print_compact_event(event),
        OutputFormat::Text => print_text_event(event, cli.no_color),
    }
    Ok(())
}

fn print_text_event(event: &MatchEvent, no_color: bool) {
    let (start, end) = if event.highlight && !no_color {
        ("\x1b[1;30;102m", "\x1b[0m") // Bold on light green
    } else {
        ("", "")
    };

    for line in &event.context_before {
        println!("{}  [before] {}{}", start, line, end);
    }
    println!(
        "{}[{}] Pattern found: \"{}\" in file: {}, line: {}{}",
        start,
        event.timestamp.format("%Y-%m-%dT%H:%M:%S"),
        event.pattern,
        event.file_path.display(),
        event.matched_line,
        end
    );
    for line in &event.context_after {
        println!("{}  [after] {}{}", start, line, end);
    }
}

fn print_compact_event(event: &MatchEvent) {
    println!(
        "{} {}: {}",
        event.rule_id,
        event.file_path.display(),
        event.matched_line
    );
}
