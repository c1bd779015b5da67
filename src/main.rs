//! Word Sieve CLI
//!
//! Interactive command-line front end for the constraint filter.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use word_sieve::config::UNSELECTED_SYMBOL;
use word_sieve::normalize::upper_letter;
use word_sieve::{
    DictionaryRequest, DictionarySource, DirectorySource, Language, PositionFilter,
    Solver, SolverConfig, SolverError, WORD_LENGTH_DEFAULT,
};

const USAGE_TEXT: &str = include_str!("text/usage.txt");

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dictionary language: default, en, es, fr or de.
    #[arg(short, long, default_value = "fr")]
    language: Language,

    /// Word length, 3 to 12.
    #[arg(short = 'n', long, default_value_t = WORD_LENGTH_DEFAULT)]
    length: usize,

    /// Drop words that repeat a letter.
    #[arg(long)]
    no_duplicates: bool,

    /// Directory holding `<code>/<NN>.txt` word lists.
    #[arg(short, long, default_value = "dictionary")]
    dictionary_dir: PathBuf,

    /// Letters known to be absent.
    #[arg(short = 'x', long)]
    exclude: Option<String>,

    /// Known slots, '.' for unknown (e.g. `.R..E`).
    #[arg(short, long)]
    pattern: Option<String>,

    /// Letters present at some unknown slot.
    #[arg(short, long)]
    require: Option<String>,

    /// Print the candidates and exit.
    #[arg(long)]
    list: bool,
}

fn letters(arg: &str) -> impl Iterator<Item = char> + '_ {
    arg.chars().filter(|c| c.is_alphabetic())
}

fn parse_letter(arg: &str) -> Option<char> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some('-'), None) | (Some('.'), None) => None,
        (Some(c), None) if c.is_alphabetic() => Some(c),
        _ => None,
    }
}

fn fix(solver: &mut Solver, slot: usize, letter: Option<char>) -> Result<(), SolverError> {
    match solver.included().id_at_position(slot) {
        Some(id) => solver.set_required(id, letter),
        None => {
            if letter.is_some() {
                solver.add_requirement(letter, Some(slot));
            }
            Ok(())
        }
    }
}

fn drop_requirement(solver: &mut Solver, letter: char) -> Result<bool, SolverError> {
    let letter = upper_letter(letter);
    let id = solver
        .included()
        .records()
        .iter()
        .find(|r| r.position.is_none() && r.letter == Some(letter))
        .map(|r| r.id);
    match id {
        Some(id) => solver.remove_requirement(id).map(|_| true),
        None => Ok(false),
    }
}

fn apply_args(solver: &mut Solver, args: &Args) -> Result<(), SolverError> {
    if let Some(exclude) = &args.exclude {
        for letter in letters(exclude) {
            solver.exclude_letter(letter, true)?;
        }
    }
    if let Some(pattern) = &args.pattern {
        for (slot, c) in pattern.chars().enumerate() {
            if c.is_alphabetic() {
                fix(solver, slot, Some(c))?;
            }
        }
    }
    if let Some(require) = &args.require {
        for letter in letters(require) {
            solver.add_requirement(Some(letter), None);
        }
    }
    Ok(())
}

async fn load<S: DictionarySource>(solver: &mut Solver, source: &S, request: DictionaryRequest) {
    let fetched = source.fetch(request.language, request.length).await;
    solver.apply_dictionary(request, fetched);
    println!(
        "Loaded {} {} words of {} letters.",
        solver.dictionary().len(),
        solver.language(),
        solver.word_length()
    );
}

fn print_list(solver: &Solver) {
    println!();
    println!("Word count: {}", solver.result().count);
    println!("{}", solver.render());
    println!();
}

fn print_status(solver: &Solver) {
    let pattern = solver.fixed_pattern();
    let excluded = solver.excluded().flattened_letters(PositionFilter::Any);
    let required = solver.included().flattened_letters(PositionFilter::Variable);
    let pattern_text: String = pattern
        .slots()
        .iter()
        .map(|s| s.unwrap_or(UNSELECTED_SYMBOL))
        .collect();

    println!();
    println!("Language:          {}", solver.language());
    println!("Word length:       {}", solver.word_length());
    println!(
        "Duplicate letters: {}",
        if solver.allow_duplicate_letters() { "allowed" } else { "forbidden" }
    );
    println!("Exact positions:   {}", pattern_text);
    println!("Somewhere:         {}", if required.is_empty() { "<none>" } else { required.as_str() });
    println!("Excluded:          {}", if excluded.is_empty() { "<none>" } else { excluded.as_str() });
    if let Err(e) = Solver::check_conflicts(&pattern) {
        println!("Warning: {}", e);
    }
    println!("Remaining words:   {}", solver.result().count);
    println!();
}

async fn run_interactive(mut solver: Solver, source: DirectorySource) {
    println!("Word Sieve. Type 'help' for commands.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Could not read input: {}", e);
                break;
            }
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        let command = parts[0].to_lowercase();
        let outcome = match command.as_str() {
            "help" | "h" | "?" => {
                println!("{}", USAGE_TEXT);
                Ok(())
            }
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                break;
            }
            "list" | "l" => {
                print_list(&solver);
                Ok(())
            }
            "status" | "s" => {
                print_status(&solver);
                Ok(())
            }
            "exclude" | "x" | "allow" | "a" => {
                let active = matches!(command.as_str(), "exclude" | "x");
                let mut outcome = Ok(());
                for letter in parts[1..].iter().flat_map(|p| letters(*p)) {
                    outcome = solver.exclude_letter(letter, active);
                    if outcome.is_err() {
                        break;
                    }
                }
                println!("{} words remaining.", solver.result().count);
                outcome
            }
            "fix" | "f" => {
                let slot = parts.get(1).and_then(|s| s.parse::<usize>().ok());
                match (slot, parts.get(2)) {
                    (Some(slot), Some(arg)) if slot < solver.word_length() => {
                        let outcome = fix(&mut solver, slot, parse_letter(arg));
                        println!("{} words remaining.", solver.result().count);
                        outcome
                    }
                    _ => {
                        println!("Usage: fix <slot 0..{}> <letter|->", solver.word_length() - 1);
                        Ok(())
                    }
                }
            }
            "need" | "n" => {
                match parts.get(1).and_then(|s| parse_letter(s)) {
                    Some(letter) => {
                        solver.add_requirement(Some(letter), None);
                        println!("{} words remaining.", solver.result().count);
                    }
                    None => println!("Usage: need <letter>"),
                }
                Ok(())
            }
            "drop" => match parts.get(1).and_then(|s| parse_letter(s)) {
                Some(letter) => drop_requirement(&mut solver, letter).map(|found| {
                    if !found {
                        println!("{} is not required anywhere.", letter);
                    }
                    println!("{} words remaining.", solver.result().count);
                }),
                None => {
                    println!("Usage: drop <letter>");
                    Ok(())
                }
            },
            "dups" => {
                match parts.get(1).map(|s| s.to_lowercase()) {
                    Some(v) if v == "on" => solver.set_allow_duplicate_letters(true),
                    Some(v) if v == "off" => solver.set_allow_duplicate_letters(false),
                    _ => println!("Usage: dups on|off"),
                }
                println!("{} words remaining.", solver.result().count);
                Ok(())
            }
            "lang" => match parts.get(1).map(|s| s.parse::<Language>()) {
                Some(Ok(language)) => {
                    let request = solver.set_language(language);
                    load(&mut solver, &source, request).await;
                    Ok(())
                }
                Some(Err(e)) => Err(e),
                None => {
                    println!("Usage: lang <default|en|es|fr|de>");
                    Ok(())
                }
            },
            "length" => match parts.get(1).and_then(|s| s.parse::<usize>().ok()) {
                Some(length) => match solver.set_word_length(length) {
                    Ok(request) => {
                        load(&mut solver, &source, request).await;
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                None => {
                    println!("Usage: length <n>");
                    Ok(())
                }
            },
            "reset" => {
                solver.reset();
                println!("Constraints cleared. {} words available.", solver.result().count);
                Ok(())
            }
            _ => {
                println!("Unknown command: {}", parts[0]);
                println!("Type 'help' for available commands.");
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("Error: {}", e);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = SolverConfig {
        language: args.language,
        word_length: args.length,
        allow_duplicate_letters: !args.no_duplicates,
    };

    let mut solver = match Solver::new(config) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let source = DirectorySource::new(&args.dictionary_dir);
    let request = solver.request_dictionary();
    load(&mut solver, &source, request).await;

    if let Err(e) = apply_args(&mut solver, &args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if args.list {
        print_list(&solver);
    } else {
        run_interactive(solver, source).await;
    }
}
