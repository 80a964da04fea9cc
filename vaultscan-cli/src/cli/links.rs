//! Link-related CLI commands.

use crate::cli::args::LinksArgs;
use crate::cli::output::Output;
use serde::Serialize;
use vaultscan::{IncomingLink, Link, LinkGraph, Result, Vault};

#[derive(Debug, Serialize)]
pub struct LinksOutput {
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct IncomingOutput {
    pub incoming: Vec<IncomingLink>,
}

pub fn run(vault: &Vault, args: &LinksArgs, output: &Output) -> Result<()> {
    let path = vault.resolve_note(&args.note)?;

    if args.incoming {
        let graph = LinkGraph::build(vault)?;
        let incoming = graph
            .incoming(&path)
            .iter()
            .filter(|incoming| keep(args, &incoming.link))
            .cloned()
            .collect();
        return output.print(&IncomingOutput { incoming });
    }

    let links = vault
        .load_note(&path)?
        .links()
        .into_iter()
        .filter(|link| keep(args, link))
        .collect();

    output.print(&LinksOutput { links })
}

fn keep(args: &LinksArgs, link: &Link) -> bool {
    if args.embeds_only {
        link.embed
    } else if args.no_embeds {
        !link.embed
    } else {
        true
    }
}
