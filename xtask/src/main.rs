use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for canvaswalk")]
struct Cli {
    /// Task to run
    #[arg(value_enum)]
    task: Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Task {
    /// fmt, clippy, test and doc in sequence
    Check,
    /// cargo fmt --check on all crates
    Fmt,
    /// Clippy with warnings denied
    Clippy,
    /// All workspace tests
    Test,
    /// Rustdoc for the workspace
    Doc,
    /// Headless demo: walk right for ten frames, then print the last frame
    Demo,
}

impl Task {
    fn cargo_args(self) -> Vec<Vec<&'static str>> {
        match self {
            Self::Check => [Self::Fmt, Self::Clippy, Self::Test, Self::Doc]
                .into_iter()
                .flat_map(Self::cargo_args)
                .collect(),
            Self::Fmt => vec![vec!["fmt", "--all", "--", "--check"]],
            Self::Clippy => vec![vec![
                "clippy",
                "--workspace",
                "--all-targets",
                "--",
                "-D",
                "warnings",
            ]],
            Self::Test => vec![vec!["test", "--workspace"]],
            Self::Doc => vec![vec!["doc", "--workspace", "--no-deps"]],
            Self::Demo => vec![vec![
                "run",
                "-p",
                "canvaswalk-cli",
                "--",
                "run",
                "--frames",
                "12",
                "--hold",
                "right:1-10",
                "--grid",
            ]],
        }
    }
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("cargo {} failed", args[0]);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for args in cli.task.cargo_args() {
        cargo(&args)?;
    }
    Ok(())
}
