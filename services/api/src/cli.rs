use crate::demo::{run_demo, run_rank, run_score, DemoArgs, RankArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use skill_affinity::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Skill Affinity",
    about = "Score and rank candidates against an organization's desired traits",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one candidate profile against a set of requirements
    Score(ScoreArgs),
    /// Rank a CSV export of candidates against a set of requirements
    Rank(RankArgs),
    /// Walk through representative scoring scenarios
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Rank(args) => run_rank(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["skill-affinity-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_accepts_repeated_entries() {
        let cli = Cli::try_parse_from([
            "skill-affinity-api",
            "score",
            "--require",
            "rust=3",
            "--require",
            "sql=2",
            "--offer",
            "rust=2",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.require, vec!["rust=3", "sql=2"]);
                assert_eq!(args.offer, vec!["rust=2"]);
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn rank_parses_recommendation_level() {
        let cli = Cli::try_parse_from([
            "skill-affinity-api",
            "rank",
            "--require",
            "rust=3",
            "--candidates",
            "pool.csv",
            "--recommend-at",
            "very-high",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(
                    args.recommend_at,
                    Some(skill_affinity::AffinityLevel::VeryHigh)
                );
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }
}
