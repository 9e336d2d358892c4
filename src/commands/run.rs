use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

use crate::cli_util::{finished_notice, print_reader_error, Palette};
use crate::io::{Input, Output, StreamInput, StreamOutput, TerminalInput};
use crate::{config, exit_codes, logging, BrainfuckError, BrainfuckReader, RuntimeFault};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Program source file
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Take `,` input from PATH instead of the terminal/stdin
    #[arg(long = "stdin", value_name = "PATH")]
    pub stdin: Option<PathBuf>,

    /// Write program output to PATH instead of stdout
    #[arg(long = "stdout", value_name = "PATH")]
    pub stdout: Option<PathBuf>,

    /// Loop-nesting ceiling (fallback BF_MAX_DEPTH, then bf.toml; default 100)
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// Disable colored diagnostics
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Suppress the completion notice
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, exit_codes::OK);
    }

    let RunArgs {
        file,
        stdin,
        stdout,
        max_depth,
        no_color,
        quiet,
        debug,
        ..
    } = args;

    let Some(file) = file else {
        usage_and_exit(program, exit_codes::USAGE);
    };

    logging::init(debug);

    // Resolve settings: flags -> env -> config file -> defaults
    let cfg = match config::default_path().map(|p| config::load(&p)).transpose() {
        Ok(cfg) => cfg.unwrap_or_default(),
        Err(e) => {
            eprintln!("{program}: ConfigError: {e}");
            let _ = io::stderr().flush();
            return exit_codes::CONFIG;
        }
    };
    let env_depth = std::env::var("BF_MAX_DEPTH").ok();
    let max_depth = config::resolve_max_depth(max_depth, env_depth.as_deref(), &cfg);

    let color = !no_color && std::env::var_os("NO_COLOR").is_none();
    let palette = Palette {
        colors: cfg.colors(),
        diagnostics: color && io::stderr().is_terminal(),
        notice: color && io::stdout().is_terminal(),
    };

    let reader = match BrainfuckReader::from_path(&file) {
        Ok(r) => r.with_max_depth(max_depth),
        Err(err) => {
            print_reader_error(Some(program), "", &err, &palette);
            return err.exit_code();
        }
    };

    let mut input: Box<dyn Input> = match stdin {
        Some(path) => match File::open(&path) {
            Ok(f) => Box::new(StreamInput::new(BufReader::new(f))),
            Err(source) => {
                let err = BrainfuckError::SourceRead { path, source };
                print_reader_error(Some(program), "", &err, &palette);
                return err.exit_code();
            }
        },
        None if io::stdin().is_terminal() => Box::new(TerminalInput::new()),
        None => Box::new(StreamInput::new(io::stdin().lock())),
    };

    let mut output: Box<dyn Output> = match stdout {
        Some(path) => match File::create(&path) {
            Ok(f) => Box::new(StreamOutput::new(BufWriter::new(f))),
            Err(source) => {
                let err = BrainfuckError::from(RuntimeFault::OpenOutput { path, source });
                print_reader_error(Some(program), "", &err, &palette);
                return err.exit_code();
            }
        },
        None => Box::new(StreamOutput::new(io::stdout())),
    };

    // Flush and leave raw mode on ctrl+c so the shell is usable again
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(exit_codes::INTERRUPTED);
    }) {
        tracing::warn!(error = %e, "failed to set ctrl+c handler");
    }

    let result = reader.run_with_io(input.as_mut(), output.as_mut());
    drop(output);

    match result {
        Ok(_) => {
            if !quiet && cfg.run.finished_notice {
                println!("\n{}", finished_notice(&palette));
            }
            let _ = io::stdout().flush();
            exit_codes::OK
        }
        Err(err) => {
            print_reader_error(Some(program), &reader.filtered(), &err, &palette);
            err.exit_code()
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] <FILE>

Options:
  --stdin  <PATH>  Take `,` input from PATH instead of the terminal/stdin
  --stdout <PATH>  Write program output to PATH instead of stdout
  --max-depth <N>  Loop-nesting ceiling (fallback BF_MAX_DEPTH, then bf.toml; default 100)
  --no-color       Disable colored diagnostics (NO_COLOR is honored too)
  --quiet,  -q     Suppress the "(Finished execution)" notice
  --debug,  -d     Enable debug logging on stderr (RUST_LOG takes precedence)
  --help,   -h     Show this help

Notes:
- Characters outside of ><+-.,[] are comments and are ignored.
- The tape has 256 cells holding values 0..=127; both pointer and cells wrap.
- `>` and `<` both move the pointer one cell forward.
- A loop repeats while the cell it started on is non-zero.
- Input (`,`) reads one character (a raw keystroke from a terminal, or one
  UTF-8 character from a file/pipe) and stores its code point mod 128.
  Running out of input or malformed UTF-8 is a runtime error.

Examples:
- Run a program:
    {0} ./hello.bf
- Feed input from a file and capture output:
    {0} --stdin input.txt --stdout out.txt ./cat.bf
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
