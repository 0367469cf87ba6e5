use std::path::PathBuf;

use clap::Parser;
use plank_planner::history::{DEFAULT_HISTORY_FILE, History};
use plank_planner::logging;
use plank_planner::render;
use plank_planner::session::Session;
use plank_planner::validate::{BoardInput, RequestInput, parse_width};

#[derive(Parser)]
#[command(
    name = "plank_planner",
    about = "Plan how to cut plank widths from standard boards"
)]
struct Cli {
    /// Board dimensions in cm (LxW, e.g. 244x122)
    #[arg(long, default_value = "244x122", value_parser = parse_board)]
    board: BoardInput,

    /// Cut widths as WIDTH:COUNT in cm (e.g. 61:2 22.5:4)
    #[arg(long = "cuts", num_args = 1.., value_parser = RequestInput::parse_pair)]
    cuts: Vec<RequestInput>,

    /// Show a bar diagram of each board
    #[arg(long)]
    layout: bool,

    /// History file
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    history: PathBuf,

    /// Do not read or write the history file
    #[arg(long, conflicts_with_all = ["list_history", "replay"])]
    no_history: bool,

    /// List saved calculations, newest first
    #[arg(long, conflicts_with_all = ["cuts", "replay"])]
    list_history: bool,

    /// Show a saved calculation again (0 is the newest)
    #[arg(long, conflicts_with = "cuts")]
    replay: Option<usize>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_board(s: &str) -> Result<BoardInput, String> {
    let (length, width) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid board '{s}', expected LxW"))?;
    Ok(BoardInput {
        board_length: parse_width(length),
        board_width: parse_width(width),
    })
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    logging::init_stderr(logging::level_for_verbosity(cli.verbose));

    let history = if cli.no_history {
        History::new()
    } else {
        History::load(&cli.history).unwrap_or_else(|e| fail(e))
    };
    let mut session = Session::new(history);

    if cli.list_history {
        if session.history().is_empty() {
            println!("No saved calculations");
        }
        for (i, entry) in session.history().entries().iter().enumerate() {
            println!("{i:>2}  {}", entry.summary());
        }
        return;
    }

    if let Some(index) = cli.replay {
        let count = session.history().len();
        let calc = session.select_history(index).unwrap_or_else(|| {
            fail(format!(
                "no saved calculation at index {index} ({count} saved)"
            ))
        });
        println!("Board {}cm", calc.board_size());
        print!("{}", render::render_calculation(calc, cli.layout));
        return;
    }

    if cli.cuts.is_empty() {
        fail("no cuts given, use --cuts WIDTH:COUNT ...");
    }

    let calc = session
        .submit(cli.board, &cli.cuts)
        .unwrap_or_else(|e| fail(e));
    println!("Board {}cm", calc.board_size());
    print!("{}", render::render_calculation(calc, cli.layout));

    if !cli.no_history
        && let Err(e) = session.history().save(&cli.history)
    {
        fail(e);
    }
}
