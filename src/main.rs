//! chess-lm: corpus preparation and self-play for chess sequence models
//!
//! Subcommands:
//! - reduce          movetext lines -> canonical game JSONL
//! - fit-vocab       canonical games -> vocabulary JSON
//! - build-examples  canonical games + vocabulary -> train/validation JSONL
//! - selfplay        uniform model against itself through the constrained decoder

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chess_engine::BoardState;
use chess_lm::{
    split_games, write_jsonl, BoundaryMode, CanonicalGame, ChessLmConfig, ConstrainedDecoder,
    CorpusReport, DatasetConfig, ExampleBuilder, GameReducer, MoveCodec, PlaySession, RawGameRecord,
    UniformModel, Vocabulary,
};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "chess-lm",
    version,
    about = "Tokenize chess games for sequence models and play with legality-constrained decoding"
)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay movetext games and keep the legal ones
    Reduce {
        /// One game per line
        #[arg(long)]
        input: PathBuf,
        /// Canonical games as JSON lines
        #[arg(long)]
        output: PathBuf,
        /// Optional JSON summary of accepted/rejected counts
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Fit a vocabulary over canonical games
    FitVocab {
        #[arg(long)]
        games: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },

    /// Window canonical games into training examples
    BuildExamples {
        #[arg(long)]
        games: PathBuf,
        #[arg(long)]
        vocab: PathBuf,
        #[arg(long)]
        train_out: PathBuf,
        #[arg(long)]
        validation_out: PathBuf,
        #[arg(long)]
        window_length: Option<usize>,
        #[arg(long)]
        stride: Option<usize>,
        /// Stream games back to back instead of windowing each one separately
        #[arg(long)]
        packed: bool,
        #[arg(long)]
        validation_split: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play games with a uniform model through the constrained decoder
    Selfplay {
        /// Vocabulary file; every geometric move is used when omitted
        #[arg(long)]
        vocab: Option<PathBuf>,
        #[arg(long, default_value_t = 1)]
        games: usize,
        #[arg(long, default_value_t = 300)]
        max_plies: usize,
        /// Starting position, standard initial position if omitted
        #[arg(long)]
        fen: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        temperature: Option<f64>,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long)]
        greedy: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ChessLmConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Reduce {
            input,
            output,
            report,
        } => cmd_reduce(&input, &output, report.as_deref()),
        Command::FitVocab { games, output } => cmd_fit_vocab(&games, &output),
        Command::BuildExamples {
            games,
            vocab,
            train_out,
            validation_out,
            window_length,
            stride,
            packed,
            validation_split,
            seed,
        } => {
            let mut dataset = config.dataset.clone();
            if let Some(window_length) = window_length {
                dataset.window_length = window_length;
                if stride.is_none() && dataset.stride > window_length {
                    dataset.stride = window_length;
                }
            }
            if let Some(stride) = stride {
                dataset.stride = stride;
            }
            if packed {
                dataset.boundary = BoundaryMode::Packed;
            }
            if let Some(split) = validation_split {
                dataset.validation_split = split;
            }
            if let Some(seed) = seed {
                dataset.seed = seed;
            }
            dataset.validate()?;
            cmd_build_examples(&games, &vocab, &train_out, &validation_out, &dataset)
        }
        Command::Selfplay {
            vocab,
            games,
            max_plies,
            fen,
            seed,
            temperature,
            top_k,
            greedy,
        } => {
            let mut decoding = config.decoding.clone();
            if seed.is_some() {
                decoding.seed = seed;
            }
            if let Some(temperature) = temperature {
                decoding.temperature = temperature;
            }
            if top_k.is_some() {
                decoding.top_k = top_k;
            }
            decoding.greedy |= greedy;
            let mut config = config;
            config.decoding = decoding;
            config.validate()?;
            cmd_selfplay(vocab.as_deref(), games, max_plies, fen.as_deref(), &config)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_reduce(input: &Path, output: &Path, report_path: Option<&Path>) -> Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("opening movetext {:?}", input))?,
    );
    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("creating {:?}", output))?,
    );

    let reducer = GameReducer::new();
    let mut report = CorpusReport::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let game = RawGameRecord::from_movetext(&line).and_then(|record| reducer.reduce(&record));
        match game {
            Ok(game) => {
                report.accept();
                serde_json::to_writer(&mut writer, &game.to_record())?;
                writer.write_all(b"\n")?;
            }
            Err(err) => {
                debug!("[REDUCER] Rejected line {}: {}", index + 1, err);
                report.reject(&err);
            }
        }
    }
    writer.flush()?;

    info!("[REDUCER] {}", report);
    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report {:?}", path))?;
    }
    println!("{}", report);
    Ok(())
}

/// Read canonical JSONL and replay every record
fn load_games(path: &Path) -> Result<Vec<CanonicalGame>> {
    let reader =
        BufReader::new(File::open(path).with_context(|| format!("opening games {:?}", path))?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RawGameRecord = serde_json::from_str(&line)
            .with_context(|| format!("{:?} line {} is not a game record", path, index + 1))?;
        records.push(record);
    }

    let (games, report) = GameReducer::new().reduce_corpus(&records);
    if report.rejected > 0 {
        warn!(
            "[REDUCER] {} records in {:?} no longer reduce and were skipped",
            report.rejected, path
        );
    }
    Ok(games)
}

fn cmd_fit_vocab(games_path: &Path, output: &Path) -> Result<()> {
    let games = load_games(games_path)?;
    let vocabulary = MoveCodec::fit(&games);
    vocabulary.save(output)?;
    println!(
        "{} move tokens ({} total) from {} games",
        vocabulary.move_count(),
        vocabulary.len(),
        games.len()
    );
    Ok(())
}

fn cmd_build_examples(
    games_path: &Path,
    vocab_path: &Path,
    train_out: &Path,
    validation_out: &Path,
    dataset: &DatasetConfig,
) -> Result<()> {
    let codec = MoveCodec::new(Arc::new(Vocabulary::load(vocab_path)?));
    let games = load_games(games_path)?;
    let builder = ExampleBuilder::from_config(dataset)?;
    let (train, validation) = split_games(games, dataset.validation_split, dataset.seed);

    let mut train_writer = BufWriter::new(File::create(train_out)?);
    let train_count = write_jsonl(&mut train_writer, builder.build(&codec, &train))?;
    let mut validation_writer = BufWriter::new(File::create(validation_out)?);
    let validation_count =
        write_jsonl(&mut validation_writer, builder.build(&codec, &validation))?;

    println!(
        "{} training examples from {} games, {} validation examples from {} games",
        train_count,
        train.len(),
        validation_count,
        validation.len()
    );
    Ok(())
}

fn cmd_selfplay(
    vocab_path: Option<&Path>,
    games: usize,
    max_plies: usize,
    fen: Option<&str>,
    config: &ChessLmConfig,
) -> Result<()> {
    let vocabulary = match vocab_path {
        Some(path) => Vocabulary::load(path)?,
        None => Vocabulary::exhaustive(),
    };
    if vocabulary.is_empty() {
        bail!("vocabulary has no move tokens");
    }
    let vocabulary = Arc::new(vocabulary);
    let codec = MoveCodec::new(vocabulary);

    for game_index in 0..games {
        let mut decoding = config.decoding.clone();
        decoding.seed = decoding.seed.map(|seed| seed.wrapping_add(game_index as u64));
        let decoder = ConstrainedDecoder::new(codec.clone(), decoding)?;
        let model = UniformModel::new(codec.vocab_size(), config.max_context);
        let start = match fen {
            Some(fen) => BoardState::from_fen(fen)?,
            None => BoardState::new(),
        };

        let mut session = PlaySession::new(decoder, model, start, config.max_context)?;
        let outcome = session.play_out(max_plies);
        let sans = session.san_moves()?;

        println!("Game {}: {}", game_index + 1, format_san(&sans, fen.is_none()));
        match outcome {
            Ok(Some(kind)) => println!("  {} ({})", kind, kind.result()),
            Ok(None) => println!("  stopped after {} plies", session.moves().len()),
            Err(err) => println!("  aborted after {} plies: {}", session.moves().len(), err),
        }
    }
    Ok(())
}

/// Numbered SAN line; only numbered from move 1 for standard starts
fn format_san(sans: &[String], numbered: bool) -> String {
    if !numbered {
        return sans.join(" ");
    }
    sans.chunks(2)
        .enumerate()
        .map(|(index, pair)| format!("{}. {}", index + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}
