use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process::ExitCode;
use wordle_constraints::cli::{CliInterface, parse_cli};
use wordle_constraints::tui::TuiInterface;
use wordle_constraints::{CandidateEngine, game_loop, logging, resolve_wordbank};

fn main() -> ExitCode {
    let cli = parse_cli();

    if let Err(e) = logging::init(cli.log_file.as_deref()) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    let words = match resolve_wordbank(cli.wordbank_path.as_deref()) {
        Ok((words, _source)) => words,
        Err(e) => {
            eprintln!("Failed to load word list: {e}");
            return ExitCode::FAILURE;
        }
    };

    let engine = CandidateEngine::new(words);
    let mode = cli.selection_mode();
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    log::info!("starting session: {mode:?}, seed {:?}", cli.seed);

    if cli.tui {
        if cli.log_file.is_none() {
            log::set_max_level(log::LevelFilter::Off);
        }
        match TuiInterface::new() {
            Ok(mut interface) => game_loop(&engine, mode, rng, &mut interface),
            Err(e) => {
                eprintln!("Failed to start terminal interface: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let stdin = std::io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&engine, mode, rng, &mut interface);
    }

    ExitCode::SUCCESS
}
