//! Run a bundled game with seeded random agents and print what happened.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_parley::agents::{random_seats, run_episode, Agent, EpisodeReport, RandomAgent, Seats};
use rust_parley::core::{GameRng, Message, Sender, Visibility};
use rust_parley::games::{negotiation, win_as_much};
use rust_parley::{Game, GameRules};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "parley", version, about = "Multi-agent text game runner")]
struct Cli {
    #[command(subcommand)]
    game: GameCommand,
}

#[derive(Subcommand, Debug)]
enum GameCommand {
    /// Four players, ten rounds of X or Y.
    WinAsMuch {
        #[command(flatten)]
        run: RunArgs,

        /// Strikes tolerated before a player loses agency.
        #[arg(long, default_value_t = 3)]
        allowance: u32,
    },
    /// Brand Specialist and Vendor bargain over discounts.
    Negotiation {
        #[command(flatten)]
        run: RunArgs,

        /// Exchange cap for the negotiation.
        #[arg(long, default_value_t = 20)]
        max_exchanges: u32,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Seed for agents and game randomness.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Give up after this many submissions.
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Print the report and transcript as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Printout<'a> {
    report: &'a EpisodeReport,
    transcript: Vec<&'a Message>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.game {
        GameCommand::WinAsMuch { run, allowance } => {
            let mut game = win_as_much::new_game(allowance)
                .with_context(|| format!("building Win as Much with allowance {allowance}"))?;
            let mut seats = random_seats(win_as_much::PLAYERS, run.seed);
            play(&mut game, &mut seats, &run)
        }
        GameCommand::Negotiation { run, max_exchanges } => {
            let settings = negotiation::NegotiationSettings::default()
                .with_seed(run.seed)
                .with_max_exchanges(max_exchanges);
            let lines = negotiation_lines(&settings);
            let mut game = negotiation_game(settings)?;
            let mut rng = GameRng::new(run.seed);
            let mut seats: Seats = (0..2)
                .map(|_| Box::new(RandomAgent::from_rng(&mut rng).with_lines(lines.clone())) as Box<dyn Agent>)
                .collect();
            play(&mut game, &mut seats, &run)
        }
    }
}

fn negotiation_game(settings: negotiation::NegotiationSettings) -> Result<Game<negotiation::NegotiationRules>> {
    negotiation::new_game(settings).context("building the negotiation game")
}

/// Uniform proposals at every shared rate plus responses and small talk.
fn negotiation_lines(settings: &negotiation::NegotiationSettings) -> Vec<String> {
    let products = settings.products.len();
    let mut lines: Vec<String> = negotiation::allowed_discounts(&settings.products)
        .into_iter()
        .map(|d| format!("[Propose] {}", vec![format!("{d}%"); products].join(", ")))
        .collect();
    lines.extend(
        ["[Accept]", "[Reject]", "Can you move on the smart watch?", "That is my best offer."]
            .map(String::from),
    );
    lines
}

fn play<R: GameRules>(game: &mut Game<R>, seats: &mut Seats, run: &RunArgs) -> Result<()> {
    let report = run_episode(game, seats, run.max_steps).context("episode aborted")?;
    let transcript = &game.state().transcript;

    if run.json {
        let printout = Printout {
            report: &report,
            transcript: transcript.iter().collect(),
        };
        let json = serde_json::to_string_pretty(&printout).context("serializing the episode printout")?;
        println!("{json}");
        return Ok(());
    }

    for message in transcript {
        println!("{}", transcript_line(message));
    }
    println!();
    println!(
        "steps: {} (accepted {}, rejected {})",
        report.steps, report.accepted, report.rejected
    );
    match &report.outcome {
        Some(outcome) => {
            println!("result: {}", outcome.summary);
            for (player, result) in outcome.players.iter() {
                println!("  {player}: reward {:+.1} ({})", result.reward, result.reason);
            }
        }
        None => println!("result: unfinished after {} steps", run.max_steps),
    }
    Ok(())
}

/// Omniscient rendering: private and sealed content shown with its scope.
fn transcript_line(message: &Message) -> String {
    let scope = match message.visibility {
        Visibility::Public | Visibility::AdminChannel => String::new(),
        Visibility::PrivateTo(target) => format!(" -> {target}"),
        Visibility::Sealed => " (sealed)".to_string(),
    };
    let body = match &message.preamble {
        Some(preamble) => format!("{preamble} | {}", message.content),
        None => message.content.clone(),
    };
    match message.sender {
        Sender::Referee => format!("[r{}] Referee: {body}", message.round),
        Sender::Player(p) => format!("[r{}.{}] {p}{scope} {:?}: {body}", message.round, message.sequence, message.kind),
    }
}
