/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use chessie::{Color, Game, Move};
use clap::Parser;
use uci_parser::{UciCommand, UciInfo, UciOption, UciParseError, UciResponse, UciSearchOptions};

use crate::{
    outcome, trim, EngineCommand, Evaluator, PositionCache, Search, SearchResult,
    Strategy, BENCHMARK_FENS, FEN_STARTPOS,
};

/// Number of cache entries per unit of the `Hash` option.
const HASH_UNIT: usize = 1_000;

/// The pawnstorm chess engine.
#[derive(Debug)]
pub struct Engine {
    /// The current state of the chess board, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given,
    /// and is reset whenever the engine is told to start a new game.
    game: Game,

    /// Piece values, tables, breadth and depth used for every decision.
    strategy: Strategy,

    /// Scores of previously evaluated positions, kept for the lifetime of a game.
    cache: PositionCache,

    /// The color the engine plays against a human, if a game is in progress via `play`.
    opponent_of: Option<Color>,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] instance to be executed with [`Engine::run`].
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            game: Game::default(),
            strategy: Strategy::default(),
            cache: PositionCache::default(),
            opponent_of: None,
            sender,
            receiver,
        }
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Returns a string of all authors of this engine.
    pub fn authors(&self) -> String {
        // Split multiple authors by comma-space
        env!("CARGO_PKG_AUTHORS").replace(':', ", ").to_string()
    }

    /// The game as currently known to the engine.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The strategy the engine is currently playing with.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) {
        // Safe unwrap: `send` can only fail if it's corresponding receiver doesn't exist,
        //  and the only way our engine's `Receiver` can no longer exist is when our engine
        //  doesn't exist either, so this is always safe.
        self.sender.send(command).unwrap();
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    /// Commands are executed one at a time; a search blocks until it has finished.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if matches!(cmd, EngineCommand::Exit) {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.execute(cmd) {
                eprintln!("Error: {e}");
            }
        }

        Ok(())
    }

    /// Execute a single [`EngineCommand`].
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Bench { depth, pretty } => self.bench(depth, pretty)?,

            EngineCommand::Candidates => self.candidates(),

            EngineCommand::Display => println!("{}", self.game),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            EngineCommand::Exit => {}

            EngineCommand::Fen => println!("{}", self.game.to_fen()),

            EngineCommand::HashInfo => self.hash_info(),

            EngineCommand::MakeMove { mv_string } => self.make_move(&mv_string)?,

            EngineCommand::Moves => {
                let moves = self.game.get_legal_moves();

                // If there are none, print "(none)"
                let moves_string = if moves.is_empty() {
                    String::from("(none)")
                } else {
                    // Otherwise, join them by comma-space
                    moves
                        .into_iter()
                        .map(|mv| mv.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{moves_string}");
            }

            EngineCommand::Option { name } => {
                let name = name.join(" ");
                if let Some(value) = self.get_option(&name) {
                    println!("{name} := {value}");
                } else {
                    println!("{} has no option {name:?}", self.name());
                }
            }

            EngineCommand::Play { engine } => self.play(engine.into())?,

            EngineCommand::Uci { cmd } => self.handle_uci_command(cmd)?,
        }

        Ok(())
    }

    /// Handle the execution of a single [`UciCommand`].
    fn handle_uci_command(&mut self, uci: UciCommand) -> Result<()> {
        use UciCommand::*;
        match uci {
            Uci => self.uci(),

            IsReady => println!("{}", UciResponse::<&str>::ReadyOk),

            SetOption { name, value } => self.set_option(&name, value)?,

            UciNewGame => self.new_game(),

            Position { fen, moves } => self.position(fen, moves)?,

            Go(options) => {
                let res = self.go(options);

                // Search has ended; send bestmove
                let response = UciResponse::BestMove {
                    bestmove: res.bestmove,
                    ponder: None,
                };
                println!("{response}");
            }

            // Searches are synchronous, so there is never anything to stop
            Stop => {}

            Quit => self.send_command(EngineCommand::Exit),

            _ => bail!(
                "{} does not support UCI command {uci:?}",
                env!("CARGO_PKG_NAME")
            ),
        }

        Ok(())
    }

    /// Searches the current position, honoring a `depth` override in `options`.
    ///
    /// Time controls are ignored: every search runs to its configured depth.
    fn go(&mut self, options: UciSearchOptions) -> SearchResult {
        let strategy = match options.depth {
            Some(depth) => self.strategy.clone().with_depth(depth as usize),
            None => self.strategy.clone(),
        };

        self.search(&strategy)
    }

    /// Runs a search on the current position with `strategy`, reporting its statistics as UCI `info`.
    fn search(&mut self, strategy: &Strategy) -> SearchResult {
        self.send_info(UciInfo::new().string(format!(
            "Starting search on {:?} (depth {}, lines {})",
            self.game.to_fen(),
            strategy.depth(),
            strategy.lines()
        )));

        let starttime = Instant::now();
        let res = Search::new(strategy, &mut self.cache).select_move(&self.game);
        let elapsed = starttime.elapsed();

        match res.bestmove {
            Some(_) => self.send_info(
                UciInfo::new()
                    .depth(strategy.depth() + 1)
                    .nodes(res.nodes)
                    .score(res.score.into_uci())
                    .nps((res.nodes as f32 / elapsed.as_secs_f32()).trunc())
                    .time(elapsed.as_millis()),
            ),
            None => self.send_info(
                UciInfo::new().string(format!("No legal moves: {}", outcome(&self.game))),
            ),
        }

        res
    }

    #[inline(always)]
    fn send_info(&self, info: UciInfo) {
        let resp = UciResponse::<String>::Info(Box::new(info));
        println!("{resp}");
    }

    /// Execute the `bench` command, running a benchmark of a fixed search on a series of positions and displaying the results.
    fn bench(&mut self, depth: Option<usize>, pretty: bool) -> Result<()> {
        let strategy = match depth {
            Some(depth) => self.strategy.clone().with_depth(depth),
            None => self.strategy.clone(),
        };

        let benches = BENCHMARK_FENS;
        let num_tests = benches.len();
        let mut nodes = 0;
        let starttime = Instant::now();

        // Run a fixed search on each position
        for (i, epd) in benches.into_iter().enumerate() {
            let fen = epd.split(';').next().unwrap_or(epd).trim();
            println!("Benchmark position {}/{}: {fen}", i + 1, num_tests);

            // Every position starts from a cold cache
            self.game = Game::from_fen(fen)?;
            self.cache.clear();

            nodes += self.search(&strategy).nodes;
        }

        // Compute results
        let elapsed = starttime.elapsed();
        let nps = (nodes as f32 / elapsed.as_secs_f32()) as u64;
        let m_nps = nodes as f32 / elapsed.as_secs_f32() / 1_000_000.0;
        let ms = elapsed.as_millis();

        if pretty {
            // Display the results in a nice table
            println!();
            println!("+--- Benchmark Complete ---+");
            println!("| time (ms)  : {ms:<12}|");
            println!("| nodes      : {nodes:<12}|");
            println!("| nps        : {nps:<12}|");
            println!("| Mnps       : {m_nps:<12.2}|");
            println!("+--------------------------+");
        } else {
            println!("{nodes} nodes {nps} nps");
        }

        // Re-set the internal game state.
        self.new_game();

        Ok(())
    }

    /// Executes the `candidates` command, printing the trimmed candidate moves.
    fn candidates(&mut self) {
        let candidates = trim(&self.game, &self.strategy, &mut self.cache);

        if candidates.is_empty() {
            println!("(none)");
        }

        for (i, candidate) in candidates.iter().enumerate() {
            println!("{:>2}. {candidate}", i + 1);
        }
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool) {
        let evaluator = Evaluator::new(&self.game, &self.strategy);
        if pretty {
            println!("{evaluator}");
        } else {
            println!("{}", evaluator.eval());
        }
    }

    /// Executes the `hashinfo` command, printing statistics of the position cache.
    fn hash_info(&self) {
        let cache = &self.cache;
        let hit_rate = if cache.accesses() == 0 {
            0.0
        } else {
            cache.hits() as f32 / cache.accesses() as f32 * 100.0
        };

        println!("Capacity  : {} entries", cache.capacity());
        println!("Entries   : {}", cache.len());
        println!("Accesses  : {}", cache.accesses());
        println!("Hits      : {} ({hit_rate:.2}%)", cache.hits());
    }

    /// Applies `mv_str` to the current game if it is a legal move.
    ///
    /// If the engine is playing a game against the user, it replies with its own move.
    fn make_move(&mut self, mv_str: &str) -> Result<()> {
        let mv = self.parse_legal_move(mv_str)?;
        self.game.make_move(mv);

        if self.opponent_of.is_some() && !self.report_if_over() {
            self.respond()?;
        }

        Ok(())
    }

    /// Parses `mv_str` as a UCI move, ensuring it is legal in the current position.
    fn parse_legal_move(&self, mv_str: &str) -> Result<Move> {
        let mv = Move::from_uci(&self.game, mv_str)
            .with_context(|| format!("Failed to parse {mv_str:?} as a move"))?;

        if !self.game.get_legal_moves().into_iter().any(|legal| legal == mv) {
            bail!("{mv_str} is not a legal move in {}", self.game.to_fen());
        }

        Ok(mv)
    }

    /// Starts a new game against the user, with the engine playing `color`.
    fn play(&mut self, color: Color) -> Result<()> {
        self.new_game();
        self.strategy = Strategy::new(color)
            .with_lines(self.strategy.lines())
            .with_depth(self.strategy.depth());
        self.opponent_of = Some(color);

        println!("{} plays {}", self.name(), color.name());
        println!("{}", self.game);

        if self.game.side_to_move() == color {
            self.respond()?;
        }

        Ok(())
    }

    /// Has the engine select and play a move in the ongoing game, reporting how long it took.
    fn respond(&mut self) -> Result<()> {
        let starttime = Instant::now();
        let strategy = self.strategy.clone();
        let res = self.search(&strategy);

        let Some(mv) = res.bestmove else {
            bail!("{} has no move to play", self.name());
        };

        self.game.make_move(mv);
        println!("{} plays {mv}", self.name());
        println!("CPU took {:.3} seconds", starttime.elapsed().as_secs_f32());
        println!("{}", self.game);

        self.report_if_over();
        Ok(())
    }

    /// Prints the result of the game against the user if it has concluded, ending it.
    ///
    /// Returns `true` if the game is over.
    fn report_if_over(&mut self) -> bool {
        let Some(engine_color) = self.opponent_of else {
            return false;
        };

        let outcome = outcome(&self.game);
        if !outcome.is_over() {
            return false;
        }

        let result = match outcome.winner() {
            Some(winner) if winner == engine_color => "CPU wins",
            Some(_) => "Player wins",
            None => "Draw",
        };
        println!("{outcome} {result}");

        self.opponent_of = None;
        true
    }

    /// Set the position to the supplied FEN string (defaults to the standard startpos if not supplied),
    /// and then apply `moves` one-by-one to the position.
    fn position<T: AsRef<str>>(
        &mut self,
        fen: Option<T>,
        moves: impl IntoIterator<Item = T>,
    ) -> Result<()> {
        // Set the new position
        if let Some(fen) = fen {
            self.game = fen.as_ref().parse()?;
        } else {
            self.game = Game::from_fen(FEN_STARTPOS)?;
        }

        // Apply the provided moves
        for mv_str in moves {
            let mv = self.parse_legal_move(mv_str.as_ref())?;
            self.game.make_move(mv);
        }

        Ok(())
    }

    /// Resets the engine's internal game state.
    ///
    /// This clears the position cache and ends any game against the user.
    fn new_game(&mut self) {
        self.game = Game::default();
        self.cache.clear();
        self.opponent_of = None;
    }

    /// Called when the engine receives the `uci` command.
    ///
    /// Prints engine's ID, version, and authors, and lists all UCI options.
    fn uci(&self) {
        println!("id name {}\nid author {}\n", self.name(), self.authors());

        // Print all UCI options
        for opt in self.options() {
            println!("{}", UciResponse::Option(opt));
        }

        // We're ready to go!
        println!("{}", UciResponse::<&str>::UciOk)
    }

    /// Convenience function to return an iterator over all UCI options this engine supports.
    fn options(&self) -> impl Iterator<Item = UciOption<&str>> {
        [
            UciOption::spin(
                "Hash",
                (PositionCache::DEFAULT_CAPACITY / HASH_UNIT) as i32,
                0,
                (PositionCache::MAX_CAPACITY / HASH_UNIT) as i32,
            ),
            UciOption::spin(
                "Lines",
                Strategy::DEFAULT_LINES as i32,
                Strategy::MIN_LINES as i32,
                Strategy::MAX_LINES as i32,
            ),
            UciOption::spin(
                "Depth",
                Strategy::DEFAULT_DEPTH as i32,
                0,
                Strategy::MAX_DEPTH as i32,
            ),
        ]
        .into_iter()
    }

    /// Handles the `setoption` command, setting option `name` to `value`.
    ///
    /// Will return an error if `name` isn't a valid option or `value` is not a valid value for that option.
    fn set_option(&mut self, name: &str, value: Option<String>) -> Result<()> {
        let Some(value) = value else {
            bail!("Option {name:?} requires a value");
        };

        let parsed = value
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid value {value:?} for option {name:?}"))?;

        match name {
            "Hash" => {
                let max = PositionCache::MAX_CAPACITY / HASH_UNIT;
                if parsed > max {
                    bail!("Maximum value for Hash is {max}");
                }
                self.cache = PositionCache::new(parsed * HASH_UNIT);
            }

            "Lines" => {
                if !(Strategy::MIN_LINES..=Strategy::MAX_LINES).contains(&parsed) {
                    bail!(
                        "Lines must be within [{}, {}]",
                        Strategy::MIN_LINES,
                        Strategy::MAX_LINES
                    );
                }
                self.strategy = self.strategy.clone().with_lines(parsed);
            }

            "Depth" => {
                if parsed > Strategy::MAX_DEPTH {
                    bail!("Depth must be at most {}", Strategy::MAX_DEPTH);
                }
                self.strategy = self.strategy.clone().with_depth(parsed);
            }

            _ => bail!("{} has no option named {name:?}", self.name()),
        }

        Ok(())
    }

    /// Returns the current value of the option `name`, if it exists on this engine.
    fn get_option(&self, name: &str) -> Option<String> {
        let value = match name {
            "Hash" => self.cache.capacity() / HASH_UNIT,
            "Lines" => self.strategy.lines(),
            "Depth" => self.strategy.depth(),
            _ => return None,
        };

        Some(value.to_string())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(2048);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing UCI commands")?;

        // For ctrl + d
        if 0 == bytes {
            // Send the Quit command and exit this function
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'quit' command after receiving empty input")?;

            bail!("Engine received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        // Attempt to parse the input as a UCI command first, since that's the primary use case of the engine
        match UciCommand::new(buf) {
            Ok(cmd) => sender
                .send(EngineCommand::Uci { cmd })
                .context("Failed to send UCI command to engine")?,

            // If it's not a UCI command, check if it's an engine-specific command
            Err(UciParseError::UnrecognizedCommand { cmd: _ }) => {
                match EngineCommand::try_parse_from(buf.split_ascii_whitespace()) {
                    Ok(cmd) => sender
                        .send(cmd)
                        .context("Failed to send command to engine")?,

                    // If it wasn't a custom command, either, print an error.
                    Err(err) => eprintln!("{err}"),
                }
            }

            // If it was a UCI command, print a usage message.
            Err(uci_err) => eprintln!("{uci_err}"),
        }
    }
}
