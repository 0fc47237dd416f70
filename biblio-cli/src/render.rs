//! Plain-text tables for the terminal.

use biblio_sync::{Author, BookRow, EntityStore, Notice, NoticeLevel, Publisher};
use biblio_types::calendar_date;
use std::io::{self, Write};

pub fn authors<W: Write>(out: &mut W, store: &EntityStore<Author>) -> io::Result<()> {
    if store.is_empty() {
        return writeln!(out, "No authors.");
    }
    writeln!(out, "{:<26} {:<28} {:<16} BORN", "ID", "NAME", "NATIONALITY")?;
    for author in store.iter() {
        writeln!(
            out,
            "{:<26} {:<28} {:<16} {}",
            author.id,
            author.name,
            author.nationality.as_deref().unwrap_or("-"),
            author.birth_date.as_deref().map_or("-", calendar_date),
        )?;
    }
    Ok(())
}

pub fn publishers<W: Write>(out: &mut W, store: &EntityStore<Publisher>) -> io::Result<()> {
    if store.is_empty() {
        return writeln!(out, "No publishers.");
    }
    writeln!(out, "{:<26} {:<28} {:<16} FOUNDED", "ID", "NAME", "COUNTRY")?;
    for publisher in store.iter() {
        writeln!(
            out,
            "{:<26} {:<28} {:<16} {}",
            publisher.id,
            publisher.name,
            publisher.country.as_deref().unwrap_or("-"),
            publisher
                .founded
                .map_or_else(|| "-".to_string(), |y| y.to_string()),
        )?;
    }
    Ok(())
}

pub fn books<W: Write>(out: &mut W, rows: &[BookRow]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No books.");
    }
    writeln!(
        out,
        "{:<26} {:<30} {:<18} {:<6} {:<10} {:<24} PUBLISHER",
        "ID", "TITLE", "CATEGORY", "YEAR", "STATUS", "AUTHOR"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<26} {:<30} {:<18} {:<6} {:<10} {:<24} {}",
            row.id,
            row.title,
            row.category.as_deref().unwrap_or("-"),
            row.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
            if row.available { "available" } else { "lent" },
            row.author.as_deref().unwrap_or("-"),
            row.publisher.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

pub fn notices<W: Write>(out: &mut W, notices: &[Notice]) -> io::Result<()> {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        if notice.text.is_empty() {
            writeln!(out, "[{tag}] {}", notice.title)?;
        } else {
            writeln!(out, "[{tag}] {}: {}", notice.title, notice.text)?;
        }
    }
    Ok(())
}
