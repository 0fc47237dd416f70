//! Command-line console for the library catalog.
//!
//! Each invocation builds a [`SyncController`], runs one command against the
//! catalog API and prints the resulting tables and notices.

pub mod cli;
mod render;

use anyhow::{Context, Result, bail};
use biblio_sync::{
    Author, Book, ClientConfig, Collection, EntityKind, Publisher, RecordId, SyncController,
};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub use cli::{Cli, Command};
use cli::{Assignments, AuthorAction, BookAction, PublisherAction};

/// One collection command, independent of the entity type.
enum Operation {
    List,
    Add(Assignments),
    Update(RecordId, Assignments),
    Delete { id: RecordId, confirmed: bool },
}

impl From<AuthorAction> for Operation {
    fn from(action: AuthorAction) -> Self {
        match action {
            AuthorAction::List => Operation::List,
            AuthorAction::Add(fields) => Operation::Add(fields.assignments()),
            AuthorAction::Update { id, fields } => {
                Operation::Update(RecordId::new(id), fields.assignments())
            }
            AuthorAction::Delete(args) => Operation::Delete {
                id: RecordId::new(args.id),
                confirmed: args.yes,
            },
        }
    }
}

impl From<PublisherAction> for Operation {
    fn from(action: PublisherAction) -> Self {
        match action {
            PublisherAction::List => Operation::List,
            PublisherAction::Add(fields) => Operation::Add(fields.assignments()),
            PublisherAction::Update { id, fields } => {
                Operation::Update(RecordId::new(id), fields.assignments())
            }
            PublisherAction::Delete(args) => Operation::Delete {
                id: RecordId::new(args.id),
                confirmed: args.yes,
            },
        }
    }
}

/// Builds the client configuration from the global flags.
pub fn config(cli: &Cli) -> ClientConfig {
    ClientConfig {
        request_timeout_secs: cli.timeout,
        ..ClientConfig::with_base_url(cli.api_url.clone())
    }
}

/// Runs one parsed command, writing tables and notices to `out`.
pub async fn execute<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = config(&cli);
    let mut ctl = SyncController::connect(&config).context("failed to create API client")?;
    info!("using catalog API at {}", config.api_root());

    let result = dispatch(&mut ctl, cli.command, out).await;
    let notices = ctl.notices().active(Instant::now()).to_vec();
    render::notices(out, &notices)?;
    result
}

async fn dispatch<W: Write>(ctl: &mut SyncController, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Authors { action } => run::<Author, W>(ctl, action.into(), out).await,
        Command::Publishers { action } => run::<Publisher, W>(ctl, action.into(), out).await,
        Command::Books { action } => match action {
            BookAction::List(filter) => {
                ctl.activate().await;
                if !ctl.books().is_loaded() {
                    bail!("could not load books");
                }
                ctl.set_filter(filter.criteria())
                    .await
                    .context("book filter failed")?;
                render::books(out, &ctl.book_rows())?;
                Ok(())
            }
            BookAction::Add(fields) => {
                run::<Book, W>(ctl, Operation::Add(fields.assignments()), out).await
            }
            BookAction::Update { id, fields } => {
                let op = Operation::Update(RecordId::new(id), fields.assignments());
                run::<Book, W>(ctl, op, out).await
            }
            BookAction::Delete(args) => {
                let op = Operation::Delete {
                    id: RecordId::new(args.id),
                    confirmed: args.yes,
                };
                run::<Book, W>(ctl, op, out).await
            }
        },
        Command::Report { output } => download_report(ctl, &output, out).await,
    }
}

async fn run<E: Collection, W: Write>(
    ctl: &mut SyncController,
    op: Operation,
    out: &mut W,
) -> Result<()> {
    match op {
        Operation::List => {
            ctl.activate().await;
            if !ctl.store::<E>().is_loaded() {
                bail!("could not load {}", E::KIND.plural());
            }
            list(ctl, E::KIND, out)
        }
        Operation::Add(fields) => {
            ctl.start_create::<E>();
            fill::<E>(ctl, fields)?;
            ctl.submit::<E>()
                .await
                .with_context(|| format!("could not add {}", E::KIND))?;
            Ok(())
        }
        Operation::Update(id, fields) => {
            ctl.reload::<E>()
                .await
                .with_context(|| format!("could not load {}", E::KIND.plural()))?;
            ctl.start_edit::<E>(&id)?;
            fill::<E>(ctl, fields)?;
            ctl.submit::<E>()
                .await
                .with_context(|| format!("could not update {} {id}", E::KIND))?;
            Ok(())
        }
        Operation::Delete { id, confirmed } => {
            if !confirmed {
                bail!("refusing to delete {} {id} without --yes", E::KIND);
            }
            ctl.delete::<E>(&id)
                .await
                .with_context(|| format!("could not delete {} {id}", E::KIND))?;
            Ok(())
        }
    }
}

fn fill<E: Collection>(ctl: &mut SyncController, fields: Assignments) -> Result<()> {
    for (name, value) in fields {
        ctl.update_field::<E>(name, value)?;
    }
    Ok(())
}

fn list<W: Write>(ctl: &SyncController, kind: EntityKind, out: &mut W) -> Result<()> {
    match kind {
        EntityKind::Author => render::authors(out, ctl.authors())?,
        EntityKind::Publisher => render::publishers(out, ctl.publishers())?,
        EntityKind::Book => render::books(out, &ctl.book_rows())?,
    }
    Ok(())
}

async fn download_report<W: Write>(
    ctl: &mut SyncController,
    output: &Path,
    out: &mut W,
) -> Result<()> {
    let bytes = ctl.download_report().await?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    writeln!(out, "Report saved to {}", output.display())?;
    Ok(())
}
