//! Command-line surface for the `citegraph-worker` binary. Exactly
//! one of `--fresh`/`--resume`/`--export` is required; positional seed
//! ids are only meaningful with `--fresh` and are silently unused
//! otherwise.

use std::path::PathBuf;

use citegraph_common::PaperId;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "citegraph-worker", about = "Distributed citation-graph crawler worker")]
#[command(group(clap::ArgGroup::new("mode").required(true).args(["fresh", "resume", "export"])))]
pub struct Cli {
    /// Wipe the advisory stores and frontier, then seed it from SEEDS.
    #[arg(long)]
    pub fresh: bool,

    /// Continue from whatever is already sitting in the shared frontier.
    #[arg(long)]
    pub resume: bool,

    /// Write citations.csv and processed_papers.csv into DIR for the
    /// downstream PageRank collaborator, then exit without crawling.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Seed paper ids. Only meaningful with --fresh.
    #[arg(value_name = "SEEDS")]
    pub seeds: Vec<String>,
}

impl Cli {
    pub fn seed_ids(&self) -> Vec<PaperId> {
        self.seeds.iter().map(|s| PaperId::from(s.as_str())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fresh_and_resume_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["citegraph-worker", "--fresh", "--resume"]).is_err());
    }

    #[test]
    fn one_of_fresh_resume_or_export_is_required() {
        assert!(Cli::try_parse_from(["citegraph-worker"]).is_err());
    }

    #[test]
    fn export_is_mutually_exclusive_with_fresh() {
        assert!(Cli::try_parse_from(["citegraph-worker", "--fresh", "--export", "out"]).is_err());
    }

    #[test]
    fn export_takes_a_directory_argument() {
        let cli = Cli::try_parse_from(["citegraph-worker", "--export", "out/dir"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out/dir")));
    }

    #[test]
    fn fresh_collects_positional_seeds() {
        let cli = Cli::try_parse_from(["citegraph-worker", "--fresh", "P1", "P2"]).unwrap();
        assert_eq!(cli.seed_ids(), vec![PaperId::from("P1"), PaperId::from("P2")]);
    }

    #[test]
    fn resume_ignores_positional_seeds() {
        let cli = Cli::try_parse_from(["citegraph-worker", "--resume", "P1"]).unwrap();
        assert!(cli.resume);
        assert_eq!(cli.seed_ids(), vec![PaperId::from("P1")]);
    }
}
