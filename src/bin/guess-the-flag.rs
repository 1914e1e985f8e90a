//! Terminal front end for the flag quiz
//!
//! Usage: `guess-the-flag [OPTIONS_JSON_PATH]`
//!
//! Type the number of a flag to tap it, press Enter to dismiss the result
//! notice, and `q` to quit. Set `RUST_LOG=debug` to follow the game's
//! decisions.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
    thread,
};

use guess_the_flag::{
    config::{self, Options},
    game::{IncomingMessage, QuizState, SyncMessage, Verdict},
};
use itertools::Itertools;
use thiserror::Error;

#[derive(Error, Debug)]
enum Error {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not load options: {0}")]
    Options(#[from] config::Error),
}

fn load_options() -> Result<Options, Error> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading options from {path}");
            Ok(Options::from_json(&std::fs::read_to_string(path)?)?)
        }
        None => Ok(Options::default()),
    }
}

/// Flags of the default pool; other countries are shown by name
fn flag_of(country: &str) -> &str {
    match country {
        "Estonia" => "\u{1f1ea}\u{1f1ea}",
        "France" => "\u{1f1eb}\u{1f1f7}",
        "Germany" => "\u{1f1e9}\u{1f1ea}",
        "Ireland" => "\u{1f1ee}\u{1f1ea}",
        "Italy" => "\u{1f1ee}\u{1f1f9}",
        "Nigeria" => "\u{1f1f3}\u{1f1ec}",
        "Poland" => "\u{1f1f5}\u{1f1f1}",
        "Russia" => "\u{1f1f7}\u{1f1fa}",
        "Spain" => "\u{1f1ea}\u{1f1f8}",
        "UK" => "\u{1f1ec}\u{1f1e7}",
        "US" => "\u{1f1fa}\u{1f1f8}",
        other => other,
    }
}

fn render(out: &mut impl Write, sync: &SyncMessage) -> io::Result<()> {
    match sync {
        SyncMessage::AwaitingTap {
            prompt,
            flags,
            score,
        } => {
            writeln!(out)?;
            writeln!(out, "Tap the flag of: {prompt}")?;
            for (number, country) in flags.iter().enumerate() {
                writeln!(out, "  [{}] {}", number + 1, flag_of(country))?;
            }
            writeln!(out, "Score: {score}")?;
            write!(out, "> ")?;
        }
        SyncMessage::ShowingResult { notice, .. } => {
            if let Some(notice) = notice {
                writeln!(out, "{}", notice.title)?;
                writeln!(out, "{}", notice.message)?;
                write!(out, "[Enter] {}", notice.dismiss_label)?;
            }
        }
    }
    out.flush()
}

/// Parses a one-based flag number typed by the player
fn parse_tap(line: &str) -> Option<IncomingMessage> {
    let number: usize = line.trim().parse().ok()?;
    number.checked_sub(1).map(IncomingMessage::Tap)
}

fn play(state: &mut QuizState) -> Result<(), Error> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    render(&mut stdout, &state.sync_message())?;
    while let Some(line) = lines.next().transpose()? {
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let message = if state.accepts_taps() {
            match parse_tap(&line) {
                Some(message) => message,
                None => {
                    write!(stdout, "Type 1, 2 or 3 > ")?;
                    stdout.flush()?;
                    continue;
                }
            }
        } else {
            IncomingMessage::Dismiss
        };

        let mut alarms = Vec::new();
        if !state.receive_message(&message, |alarm, delay| alarms.push((alarm, delay))) {
            write!(stdout, "Type 1, 2 or 3 > ")?;
            stdout.flush()?;
            continue;
        }
        render(&mut stdout, &state.sync_message())?;

        for (alarm, delay) in alarms {
            if let Some(verdict) = state.last_result().map(|r| r.verdict()) {
                writeln!(stdout, "{verdict}!")?;
            }
            thread::sleep(delay);
            if state.receive_alarm(&alarm) {
                render(&mut stdout, &state.sync_message())?;
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let result = load_options().and_then(|options| {
        let mut state = QuizState::new(options);
        play(&mut state)?;

        let tally = state.tally();
        println!();
        println!(
            "Rounds: {} ({})",
            tally.values().sum::<u64>(),
            [Verdict::Correct, Verdict::Wrong]
                .iter()
                .map(|verdict| format!("{verdict}: {}", tally[*verdict]))
                .join(", ")
        );
        println!("Best score: {}", state.best_score());
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
