//! Command-line arguments.

use biblio_sync::{Availability, DEFAULT_API_URL, FieldValue, FilterCriteria};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "biblio")]
#[command(about = "Library catalog console")]
#[command(version)]
pub struct Cli {
    /// Base URL of the catalog API
    #[arg(long, global = true, env = "BIBLIO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    pub timeout: u64,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage authors
    Authors {
        #[command(subcommand)]
        action: AuthorAction,
    },
    /// Manage publishers
    Publishers {
        #[command(subcommand)]
        action: PublisherAction,
    },
    /// Manage and search books
    Books {
        #[command(subcommand)]
        action: BookAction,
    },
    /// Download the catalog report
    Report {
        /// File the report is written to
        #[arg(short, long, default_value = "informe.pdf")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthorAction {
    /// List all authors
    List,
    /// Add an author
    Add(AuthorFields),
    /// Change an existing author
    Update {
        id: String,
        #[command(flatten)]
        fields: AuthorFields,
    },
    /// Delete an author
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug)]
pub enum PublisherAction {
    /// List all publishers
    List,
    /// Add a publisher
    Add(PublisherFields),
    /// Change an existing publisher
    Update {
        id: String,
        #[command(flatten)]
        fields: PublisherFields,
    },
    /// Delete a publisher
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug)]
pub enum BookAction {
    /// List books, optionally filtered
    List(BookFilter),
    /// Add a book
    Add(BookFields),
    /// Change an existing book
    Update {
        id: String,
        #[command(flatten)]
        fields: BookFields,
    },
    /// Delete a book
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: String,

    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug, Default)]
pub struct AuthorFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub nationality: Option<String>,
    /// Birth date as YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct PublisherFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    /// Founding year
    #[arg(long)]
    pub founded: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct BookFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    /// true or false
    #[arg(long)]
    pub available: Option<bool>,
    /// Author id, or an empty string for none
    #[arg(long)]
    pub author: Option<String>,
    /// Publisher id, or an empty string for none
    #[arg(long)]
    pub publisher: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct BookFilter {
    /// Title contains
    #[arg(long)]
    pub title: Option<String>,
    /// Category contains
    #[arg(long)]
    pub category: Option<String>,
    /// Only available books
    #[arg(long, conflicts_with = "unavailable")]
    pub available: bool,
    /// Only lent-out books
    #[arg(long)]
    pub unavailable: bool,
}

/// Form field assignments collected from the command line.
pub type Assignments = Vec<(&'static str, FieldValue)>;

fn push_text(out: &mut Assignments, name: &'static str, value: &Option<String>) {
    if let Some(value) = value {
        out.push((name, FieldValue::from(value.as_str())));
    }
}

impl AuthorFields {
    pub fn assignments(&self) -> Assignments {
        let mut out = Vec::new();
        push_text(&mut out, "nombre", &self.name);
        push_text(&mut out, "nacionalidad", &self.nationality);
        push_text(&mut out, "fechaNacimiento", &self.birth_date);
        out
    }
}

impl PublisherFields {
    pub fn assignments(&self) -> Assignments {
        let mut out = Vec::new();
        push_text(&mut out, "nombre", &self.name);
        push_text(&mut out, "pais", &self.country);
        push_text(&mut out, "anioFundacion", &self.founded);
        out
    }
}

impl BookFields {
    pub fn assignments(&self) -> Assignments {
        let mut out = Vec::new();
        push_text(&mut out, "titulo", &self.title);
        push_text(&mut out, "categoria", &self.category);
        push_text(&mut out, "anio", &self.year);
        if let Some(flag) = self.available {
            out.push(("disponible", FieldValue::from(flag)));
        }
        push_text(&mut out, "autor", &self.author);
        push_text(&mut out, "editorial", &self.publisher);
        out
    }
}

impl BookFilter {
    pub fn criteria(&self) -> FilterCriteria {
        let availability = match (self.available, self.unavailable) {
            (true, _) => Availability::Available,
            (false, true) => Availability::Unavailable,
            (false, false) => Availability::Any,
        };
        FilterCriteria::default()
            .with_title(self.title.clone().unwrap_or_default())
            .with_category(self.category.clone().unwrap_or_default())
            .with_availability(availability)
    }
}
