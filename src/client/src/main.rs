use chrono::Local;
use client::{
    config::ClientConfig,
    debounce::Debouncer,
    model::{Mode, Status},
    session::{GameSession, SessionError},
};
use common::{model::game::Move, utility::shutdown_signal};
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, error, info};

enum Command {
    Play(Move),
    SetMode(Mode),
    Score,
    Export,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Command> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "mode" => Command::SetMode(words.next()?.parse().ok()?),
            "score" => Command::Score,
            "export" => Command::Export,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Play(other.parse().ok()?),
        };
        Some(command)
    }
}

#[tokio::main]
async fn main() {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(config.log_level)
        .init();

    let session = match GameSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to create scoring client: {}", e);
            std::process::exit(1);
        }
    };
    info!("Starting in {} mode against {}", config.mode, config.scoring_url);

    let (debouncer, mut moves) = Debouncer::spawn(config.debounce_window);
    let mut lines = BufReader::new(io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    print_help();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                let Some(command) = Command::parse(&line) else {
                    if !line.trim().is_empty() {
                        println!("Unrecognized input {:?}, type `help` for commands.", line.trim());
                    }
                    continue;
                };
                match command {
                    Command::Play(choice) => {
                        debouncer.submit(session.pending(choice));
                    }
                    Command::SetMode(mode) => switch_mode(&session, mode, &mut lines).await,
                    Command::Score => print_scoreboard(&session),
                    Command::Export => export(&session, &config),
                    Command::Help => print_help(),
                    Command::Quit => break,
                }
            }
            Some(pending) = moves.recv() => {
                // Other errors are already reflected in the session status.
                if let Err(SessionError::Superseded) = session.submit_pending(pending).await {
                    debug!("Skipped {:?} from before the last mode switch", pending.choice);
                    continue;
                }
                print_status(&session);
                print_scoreboard(&session);
            }
            _ = &mut shutdown => break,
        }
    }
    drop(moves);
    debouncer.close().await;
    info!("Exiting after {} games", session.tally().total());
}

async fn switch_mode(session: &GameSession, mode: Mode, lines: &mut Lines<BufReader<Stdin>>) {
    if session.mode() == mode {
        println!("Already in {} mode.", mode);
        return;
    }
    println!("{} [y/N]", GameSession::switch_prompt(mode));
    let answer = matches!(
        lines.next_line().await,
        Ok(Some(reply)) if reply.trim().eq_ignore_ascii_case("y") || reply.trim().eq_ignore_ascii_case("yes")
    );
    if session.set_mode(mode, &|_: &str| answer) {
        println!("Now playing in {} mode.", mode);
    } else {
        println!("Mode unchanged.");
    }
}

fn export(session: &GameSession, config: &ClientConfig) {
    match session.export(&Local::now()).write_to(&config.export_dir) {
        Ok(path) => println!("History written to {}", path.display()),
        Err(e) => error!("Failed to export history: {}", e),
    }
}

fn print_status(session: &GameSession) {
    match session.status() {
        Status::Idle => {}
        Status::Played(record) => {
            println!("Your choice: {}", record.player_move);
            println!("Computer's choice: {}", record.opponent_move);
            println!("{}", record.outcome.phrase());
        }
        Status::Failed(message) => println!("{}", message),
    }
}

fn print_scoreboard(session: &GameSession) {
    let tally = session.tally();
    println!(
        "Victories: {}  Losses: {}  Ties: {}",
        tally.wins, tally.losses, tally.ties
    );
    println!("{}", tally.percentages());
    println!("Total Games: {}", tally.total());
}

fn print_help() {
    println!("Rock Paper Scissors");
    println!("  rock | paper | scissors (or r/p/s)  play a round");
    println!("  mode random | mode remote           switch opponent (resets the scoreboard)");
    println!("  score                               show the scoreboard");
    println!("  export                              write the game history as CSV");
    println!("  quit                                leave");
}
