use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use client_logging::client_info;
use pricewatch_core::{update, AppState, Msg};

use crate::effects::EffectRunner;
use crate::input::{parse_line, Command, HELP_TEXT};
use crate::logging::{self, LogDestination};
use crate::{config, render};

pub fn run() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let config = config::load(Path::new("."));
    client_info!("Starting pricewatch against {}", config.api_base_url);

    let (tx, rx) = mpsc::channel::<Command>();
    let runner = EffectRunner::new(&config, tx.clone())
        .with_context(|| format!("cannot use API base URL {}", config.api_base_url))?;
    spawn_input_thread(tx);

    let mut state = AppState::new();
    dispatch(&mut state, Msg::Started, &runner);

    println!("pricewatch - competitive price intelligence dashboard");
    println!("Type 'help' for commands.");
    render_dashboard(&mut state);

    loop {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(Command::Dispatch(msg)) => {
                dispatch(&mut state, msg, &runner);
                render_dashboard(&mut state);
            }
            Ok(Command::Show) => {
                print!("{}", render::render(&state.view()));
                prompt();
            }
            Ok(Command::Help) => {
                print!("{HELP_TEXT}");
                prompt();
            }
            Ok(Command::Invalid(reason)) => {
                println!("{reason}");
                prompt();
            }
            Ok(Command::Empty) => {}
            Ok(Command::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Idle heartbeat; keeps render coalescing uniform.
                dispatch(&mut state, Msg::Tick, &runner);
                render_dashboard(&mut state);
            }
        }
    }

    client_info!("pricewatch shutting down");
    Ok(())
}

fn dispatch(state: &mut AppState, msg: Msg, runner: &EffectRunner) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    runner.run(effects);
}

/// Renders only when the last message changed something visible.
fn render_dashboard(state: &mut AppState) {
    if state.consume_dirty() {
        print!("{}", render::render(&state.view()));
        prompt();
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn spawn_input_thread(tx: mpsc::Sender<Command>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(parse_line(&line)).is_err() {
                break;
            }
        }
        // Stdin closed: treat it like a quit request.
        let _ = tx.send(Command::Quit);
    });
}
