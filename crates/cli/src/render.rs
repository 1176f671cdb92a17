//! Plain-text rendering of the views.

use std::fmt::Write;

use engine::{HistoryItem, Profile, Tab, Transaction};

const EMPTY: &str = "-";

fn or_dash(value: &str) -> &str {
    if value.is_empty() { EMPTY } else { value }
}

fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Borrow => "Borrowed",
        Tab::Lent => "Lent",
    }
}

pub fn dashboard(tab: Tab, rows: &[&Transaction], page: usize, page_count: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (page {page} of {page_count})", tab_label(tab));
    if rows.is_empty() {
        let _ = writeln!(out, "No entries.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<26} {:>12} {:<18} {:<12} {:<12} {}",
        "ID", "AMOUNT", "PERSON", "DATE", "RETURN BY", "RETURNED"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<26} {:>12} {:<18} {:<12} {:<12} {}",
            row.id,
            or_dash(&row.amount),
            or_dash(&row.person),
            or_dash(&row.due_date),
            or_dash(&row.return_date),
            if row.returned { "yes" } else { "no" }
        );
    }
    out
}

pub fn history(rows: &[HistoryItem], page: usize, page_count: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "History (page {page} of {page_count})");
    if rows.is_empty() {
        let _ = writeln!(out, "No archived entries.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<26} {:<8} {:>12} {:<18} {:<12} {}",
        "ID", "TYPE", "AMOUNT", "PERSON", "RETURNED", "ARCHIVED"
    );
    for row in rows {
        let record = &row.record;
        let _ = writeln!(
            out,
            "{:<26} {:<8} {:>12} {:<18} {:<12} {}",
            record.id,
            record.category.as_str(),
            or_dash(&record.amount),
            or_dash(&record.person),
            or_dash(&record.return_date),
            or_dash(&row.archived_at)
        );
    }
    out
}

pub fn profile(profile: &Profile) -> String {
    format!(
        "Name:  {}\nEmail: {}\nPhone: {}\n",
        profile.name,
        profile.email,
        or_dash(&profile.phone)
    )
}
