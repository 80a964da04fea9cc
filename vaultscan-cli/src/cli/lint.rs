//! Lint command: vault health checks.

use crate::cli::args::LintArgs;
use crate::cli::output::Output;
use serde::Serialize;
use vaultscan::health::{compute_summary, format_github_actions};
use vaultscan::{HealthChecker, Issue, LintSummary, Result, Vault, VaultError};

#[derive(Debug, Serialize)]
pub struct LintOutput {
    pub issues: Vec<Issue>,
    pub summary: LintSummary,
}

/// Issues are printed first; a `--fail-on` hit then turns into exit code 10.
pub fn run(vault: &Vault, args: &LintArgs, output: &Output) -> Result<()> {
    let mut checker = HealthChecker::new(vault).ignore(args.ignore.iter().copied());
    if !args.only.is_empty() {
        checker = checker.only(args.only.iter().copied());
    }
    if let Some(pattern) = &args.glob {
        checker = checker.glob(pattern);
    }

    let issues = checker.run()?;
    let failing = issues
        .iter()
        .filter(|issue| args.fail_on.contains(&issue.issue_type))
        .count();

    if args.github {
        print!("{}", format_github_actions(&issues));
    } else {
        let summary = compute_summary(&issues);
        output.print(&LintOutput { issues, summary })?;
    }

    if failing > 0 {
        return Err(VaultError::LintIssues(failing));
    }
    Ok(())
}
