//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vaultscan::IssueType;

#[derive(Parser, Debug)]
#[command(name = "vaultscan")]
#[command(author, version, about = "Scan and query Obsidian-style markdown vaults", long_about = None)]
pub struct Cli {
    /// Path to the vault (overrides config default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Config file (default: ~/.config/vaultscan.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log filter for the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes in the vault
    List(ListArgs),

    /// Links and embeds in a note
    Links(LinksArgs),

    /// Tags in a note, or across the vault
    Tags(TagsArgs),

    /// Headings in a note
    Headings(HeadingsArgs),

    /// Block anchors in a note
    Blocks(NoteArgs),

    /// Frontmatter and inline properties of a note
    Properties(PropertiesArgs),

    /// Tasks in a note or across the vault
    Tasks(TasksArgs),

    /// Format a task line from a description and metadata
    #[command(name = "format-task")]
    FormatTask(FormatTaskArgs),

    /// Search notes with the query language
    Search(SearchArgs),

    /// Check vault health: broken links, orphans, duplicates, ...
    Lint(LintArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Filter to notes matching glob pattern
    #[arg(long)]
    pub glob: Option<String>,
}

#[derive(Parser, Debug)]
pub struct NoteArgs {
    /// Note path, name or alias
    pub note: String,
}

#[derive(Parser, Debug)]
pub struct LinksArgs {
    /// Note path, name or alias
    pub note: String,

    /// Only embeds (![[...]])
    #[arg(long, conflicts_with = "no_embeds")]
    pub embeds_only: bool,

    /// Exclude embeds
    #[arg(long)]
    pub no_embeds: bool,

    /// Links pointing at the note instead of out of it
    #[arg(long)]
    pub incoming: bool,
}

#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Note path (omit for vault-wide)
    pub note: Option<String>,

    /// Include usage counts (vault-wide only)
    #[arg(long)]
    pub counts: bool,

    /// Filter to notes matching glob pattern (vault-wide only)
    #[arg(long)]
    pub glob: Option<String>,

    /// Drop repeated tags (note only)
    #[arg(long, requires = "note")]
    pub unique: bool,

    /// Group tags under their root segment (note only)
    #[arg(long, requires = "note")]
    pub group: bool,
}

#[derive(Parser, Debug)]
pub struct PropertiesArgs {
    /// Note path, name or alias
    pub note: String,

    /// Group inline properties by key
    #[arg(long)]
    pub grouped: bool,
}

#[derive(Parser, Debug)]
pub struct HeadingsArgs {
    /// Note path, name or alias
    pub note: String,

    /// Return as nested hierarchy
    #[arg(long)]
    pub nested: bool,

    /// Shallowest heading level to include
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub min_level: u8,

    /// Deepest heading level to include
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub max_level: u8,
}

#[derive(Parser, Debug)]
pub struct TasksArgs {
    /// Only tasks in this note
    #[arg(long, conflicts_with = "glob")]
    pub note: Option<String>,

    /// Only tasks in notes matching glob
    #[arg(long)]
    pub glob: Option<String>,

    /// Flat list instead of trees
    #[arg(long)]
    pub flat: bool,

    /// Filter by task symbol (repeatable, e.g. --symbol "[ ]" --symbol "[x]")
    #[arg(long)]
    pub symbol: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct FormatTaskArgs {
    /// Task description
    pub desc: String,

    /// Task symbol
    #[arg(long, default_value = "[ ]")]
    pub symbol: String,

    /// Metadata field in KEY=VALUE form (repeatable); dates accept today, +3d, ...
    #[arg(long = "field")]
    pub fields: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query, e.g. 'tag:project -path:archive'
    pub query: String,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only search notes matching glob pattern
    #[arg(long)]
    pub glob: Option<String>,
}

#[derive(Parser, Debug)]
pub struct LintArgs {
    /// Only check this issue type (repeatable)
    #[arg(long)]
    pub only: Vec<IssueType>,

    /// Skip this issue type (repeatable)
    #[arg(long)]
    pub ignore: Vec<IssueType>,

    /// Only report issues in notes matching glob pattern
    #[arg(long)]
    pub glob: Option<String>,

    /// Exit with code 10 if an issue of this type is found (repeatable)
    #[arg(long)]
    pub fail_on: Vec<IssueType>,

    /// Print GitHub Actions annotations instead of structured output
    #[arg(long)]
    pub github: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::parse_from(["vaultscan", "-vv", "list"]);
        assert_eq!(cli.log_level(), "debug");
        let cli = Cli::parse_from(["vaultscan", "-q", "list"]);
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_lint_issue_types() {
        let cli = Cli::parse_from([
            "vaultscan",
            "lint",
            "--only",
            "orphans",
            "--fail-on",
            "broken-links",
        ]);
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint command");
        };
        assert_eq!(args.only, vec![IssueType::Orphans]);
        assert_eq!(args.fail_on, vec![IssueType::BrokenLinks]);
        assert!(Cli::try_parse_from(["vaultscan", "lint", "--only", "typos"]).is_err());
    }

    #[test]
    fn test_output_format() {
        let cli = Cli::parse_from(["vaultscan", "list", "--yaml"]);
        assert_eq!(cli.output_format(), OutputFormat::Yaml);
        assert!(Cli::try_parse_from(["vaultscan", "--json", "--toml", "list"]).is_err());
    }
}
