use clap::{Parser, Subcommand};
use std::process::{Command, ExitStatus};
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for kodct")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    /// Build the library with `--no-default-features`
    #[command(name = "no-std")]
    NoStd,
    Test,
    Clippy,
    Fmt,
    Analyze,
    Bench,
    #[command(name = "update-bench-readme")]
    UpdateBenchReadme,
    /// Time one forward transform of `0..N`
    Timing {
        /// Sequence length (defaults to 8192)
        len: Option<usize>,
    },
}

fn run(mut cmd: Command) -> anyhow::Result<ExitStatus> {
    Ok(cmd.status()?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config()?;

    let status = match cli.command {
        Commands::Build => run(build_command(&cfg))?,
        Commands::NoStd => run(no_std_command())?,
        Commands::Test => run(test_command(&cfg))?,
        Commands::Clippy => run(clippy_command())?,
        Commands::Fmt => run(fmt_command())?,
        Commands::Analyze => {
            let fmt = run(fmt_command())?;
            if !fmt.success() {
                fmt
            } else {
                run(clippy_command())?
            }
        }
        Commands::Bench => run(bench_command(&cfg))?,
        Commands::UpdateBenchReadme => run(update_bench_readme_command())?,
        Commands::Timing { len } => run(timing_command(&cfg, len))?,
    };

    std::process::exit(status.code().unwrap_or(1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timing_command() {
        let cli = Cli::parse_from(["xtask", "timing", "4096"]);
        match cli.command {
            Commands::Timing { len } => assert_eq!(len, Some(4096)),
            _ => panic!("parsed wrong command"),
        }
        let cli = Cli::parse_from(["xtask", "no-std"]);
        assert!(matches!(cli.command, Commands::NoStd));
    }
}
