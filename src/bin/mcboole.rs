//! McBoole Logic Minimizer - Command Line Interface
//!
//! Reads a cube file, minimizes it exactly and prints the resulting cover in
//! the same format.

use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use mcboole_logic::{
    minimize, verify, Cover, CubeFileReader, CubeFormat, MinimizeConfig, MinimizeStats,
};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Minimize the cover (default)
    Minimize,
    /// Compare the cover with the one given by --against
    Verify,
    /// Print the cover without modification
    Echo,
    /// Print statistics about the cover
    Stats,
}

#[derive(Parser, Debug)]
#[command(name = "mcboole")]
#[command(about = "McBoole exact multi-output logic minimizer", long_about = None)]
#[command(version)]
struct Args {
    /// Input cube file (reads stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Operation to execute
    #[arg(short = 'D', long = "do", value_enum, default_value = "minimize")]
    command: Command,

    /// Cover to compare the input with, for --do verify
    #[arg(long = "against", value_name = "FILE")]
    against: Option<PathBuf>,

    /// Output file (writes to stdout if not specified)
    #[arg(short = 'O', long = "out-file")]
    output_file: Option<PathBuf>,

    /// Deepest level of branching explored exactly
    #[arg(short = 'b', long = "depth", default_value_t = 10,
          value_parser = clap::value_parser!(u8).range(0..=16))]
    depth: u8,

    /// Character ending the input part of a cube when reading
    #[arg(long = "rit", value_name = "CHAR", default_value = " ", value_parser = parse_terminator)]
    read_input_terminator: char,

    /// Character ending the output part of a cube when reading
    #[arg(long = "rot", value_name = "CHAR", default_value = "\\n", value_parser = parse_terminator)]
    read_output_terminator: char,

    /// Text printed after the input part of a cube
    #[arg(long = "pit", value_name = "TEXT", default_value = " ", value_parser = parse_escaped)]
    print_input_terminator: String,

    /// Text printed after the output part of a cube
    #[arg(long = "pot", value_name = "TEXT", default_value = "\\n", value_parser = parse_escaped)]
    print_output_terminator: String,

    /// Require the input cubes to be pairwise disjoint
    #[arg(short = 'n', long = "disjoint")]
    disjoint: bool,

    /// Prefer primes with fewer literals
    #[arg(long = "min-literals")]
    min_literals: bool,

    /// Also list the essential prime implicants
    #[arg(short = 'e', long = "essentials")]
    essentials: bool,

    /// Print statistics as comments after the solution
    #[arg(short = 's', long = "summary")]
    summary: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// Expand `\n`, `\t`, `\r`, `\s` and `\\`
fn parse_escaped(text: &str) -> Result<String, String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('s') => result.push(' '),
            Some('\\') => result.push('\\'),
            Some(other) => return Err(format!("unknown escape sequence \\{}", other)),
            None => return Err("trailing backslash".to_string()),
        }
    }
    Ok(result)
}

fn parse_terminator(text: &str) -> Result<char, String> {
    let text = parse_escaped(text)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("{:?} is not a single ASCII character", text)),
    }
}

fn read(path: Option<&Path>, format: &CubeFormat) -> Result<Cover, Box<dyn Error>> {
    let cover = match path {
        Some(path) => Cover::from_cube_reader(BufReader::new(File::open(path)?), format)
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        None => Cover::from_cube_reader(io::stdin().lock(), format)
            .map_err(|e| format!("<stdin>: {}", e))?,
    };
    Ok(cover)
}

fn write_stats(out: &mut dyn Write, stats: &MinimizeStats) -> Result<(), Box<dyn Error>> {
    let lines = [
        format!("prime implicants: {}", stats.prime_implicants),
        format!("essential prime implicants: {}", stats.essential_implicants),
        format!(
            "solution: {} cubes, {} input literals, {} output literals",
            stats.solution_size, stats.input_literals, stats.output_literals
        ),
        format!("maximum branching depth: {}", stats.max_branching_depth),
    ];
    for line in &lines {
        mcboole_logic::format::write_comment(&mut *out, line)?;
    }
    if stats.heuristic {
        mcboole_logic::format::write_comment(
            &mut *out,
            "branching depth limit reached, the solution may not be minimum",
        )?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<i32, Box<dyn Error>> {
    let format = CubeFormat {
        input_terminator: args.read_input_terminator,
        output_terminator: args.read_output_terminator,
        print_input_terminator: args.print_input_terminator.clone(),
        print_output_terminator: args.print_output_terminator.clone(),
    };
    let cover = read(args.input.as_deref(), &format)?;

    let mut out: Box<dyn Write> = match &args.output_file {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let write_cover = |out: &mut dyn Write, cover: &Cover| mcboole_logic::format::write_cover(cover, out, &format);

    let mut code = 0;
    match args.command {
        Command::Minimize => {
            let config = MinimizeConfig {
                disjoint_required: args.disjoint,
                minimize_literals: args.min_literals,
                branch_depth_limit: usize::from(args.depth),
            };
            let result = minimize(&cover, &config)?;
            if args.essentials {
                mcboole_logic::format::write_comment(&mut out, "essential prime implicants")?;
                write_cover(&mut *out, &result.essentials)?;
                mcboole_logic::format::write_comment(&mut out, "solution")?;
            }
            write_cover(&mut *out, &result.cover)?;
            if args.summary {
                write_stats(&mut *out, &result.stats)?;
            }
        }
        Command::Verify => {
            let Some(against) = args.against.as_deref() else {
                return Err("--do verify needs a cover to compare with (--against FILE)".into());
            };
            let other = read(Some(against), &format)?;
            let comparison = verify::compare(&cover, &other)?;
            if comparison.is_equivalent() {
                mcboole_logic::format::write_comment(&mut out, "the covers are equivalent")?;
            } else {
                mcboole_logic::format::write_comment(&mut out, "cubes of the input not covered")?;
                write_cover(&mut *out, &comparison.uncovered_in_a)?;
                mcboole_logic::format::write_comment(&mut out, "cubes of the other cover not covered")?;
                write_cover(&mut *out, &comparison.uncovered_in_b)?;
                code = 1;
            }
        }
        Command::Echo => write_cover(&mut *out, &cover)?,
        Command::Stats => {
            let layout = cover.layout();
            let (inputs, outputs) = cover.cubes().iter().fold((0, 0), |(i, o), cube| {
                (i + layout.input_cost(cube), o + layout.output_cost(cube))
            });
            let lines = [
                format!("inputs: {}", cover.num_inputs()),
                format!("outputs: {}", cover.num_outputs()),
                format!("cubes: {}", cover.num_cubes()),
                format!("input literals: {}", inputs),
                format!("output literals: {}", outputs),
            ];
            for line in &lines {
                mcboole_logic::format::write_comment(&mut out, line)?;
            }
        }
    }
    out.flush()?;
    Ok(code)
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("mcboole: {}", e);
            process::exit(1);
        }
    }
}
