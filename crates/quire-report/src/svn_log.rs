//! Tabular view of `svn log --xml` output.
//!
//! The command prints a document of this shape:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <log>
//! <logentry revision="3273">
//! <author>ann</author>
//! <date>2015-01-22T01:48:58.267943Z</date>
//! <msg>fix: save old format</msg>
//! </logentry>
//! ...
//! </log>
//! ```
//!
//! [`present_svn_log`] turns each `logentry` into one [`LogEntry`] row,
//! reading the tree through its accessors only.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quire_dom::Node;
use quire_markup::MarkupError;

use crate::{ReportError, Result};

/// Column titles, in row order.
pub const HEADERS: [&str; 4] = ["#", "author", "date", "commentaries"];

/// One commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
    /// Revision number, as written in the log.
    pub revision: String,
    /// Committer name.
    pub author: String,
    /// Commit date as `YYYY-MM-DD hh:mm:ss`.
    pub date: String,
    /// Commit message.
    pub message: String,
}

impl LogEntry {
    /// The fields in [`HEADERS`] order.
    #[must_use]
    pub fn fields(&self) -> [&str; 4] {
        [
            self.revision.as_str(),
            self.author.as_str(),
            self.date.as_str(),
            self.message.as_str(),
        ]
    }
}

/// Number of commits in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCount {
    /// The month as `YYYY-MM`.
    pub month: String,
    /// Commits dated in that month.
    pub commits: usize,
}

/// The rows of an svn log, in document order (newest first for svn).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogTable {
    entries: Vec<LogEntry>,
}

/// Strip the sub-second part and time zone from an svn timestamp.
///
/// `2016-03-21T01:25:43.949240Z` becomes `2016-03-21 01:25:43`. The UTC
/// time is kept as is. Shorter input is returned with only the `T`
/// replaced.
#[must_use]
pub fn clean_date_format(date: &str) -> String {
    let mut cleaned: String = date.chars().take(19).collect();
    if cleaned.get(10..11) == Some("T") {
        cleaned.replace_range(10..11, " ");
    }
    cleaned
}

/// Project every `logentry` child of `log` into a row.
///
/// Missing attributes or elements leave their field empty.
#[must_use]
pub fn present_svn_log(log: &Node) -> LogTable {
    let entries = log
        .children_named("logentry")
        .map(|entry| LogEntry {
            revision: entry.attribute("revision").unwrap_or_default().to_string(),
            author: child_text(entry, "author").to_string(),
            date: clean_date_format(child_text(entry, "date")),
            message: child_text(entry, "msg").to_string(),
        })
        .collect();
    LogTable { entries }
}

/// Text of the first child element called `name`, empty if absent.
fn child_text<'a>(entry: &'a Node, name: &str) -> &'a str {
    entry.child_named(name).and_then(Node::text).unwrap_or_default()
}

impl LogTable {
    /// Rows in document order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the log held no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a row.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Write the table as CSV, header line first.
    ///
    /// A field containing the delimiter, a line break or a double quote is
    /// wrapped in double quotes, with inner quotes doubled.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Write`] if the destination fails.
    pub fn write_csv<W: Write>(&self, out: &mut W, delimiter: char) -> Result<()> {
        write_csv_line(out, HEADERS, delimiter)?;
        for entry in &self.entries {
            write_csv_line(out, entry.fields(), delimiter)?;
        }
        out.flush().map_err(ReportError::Write)
    }

    /// Write the table as CSV into a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Markup`] wrapping [`MarkupError::Create`] if
    /// the file cannot be created, otherwise as [`LogTable::write_csv`].
    pub fn write_csv_file(&self, path: impl AsRef<Path>, delimiter: char) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| MarkupError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_csv(&mut BufWriter::new(file), delimiter)
    }

    /// Distinct authors, in order of first appearance.
    #[must_use]
    pub fn authors(&self) -> Vec<&str> {
        let mut authors: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !authors.contains(&entry.author.as_str()) {
                authors.push(&entry.author);
            }
        }
        authors
    }

    /// Number of distinct authors.
    #[must_use]
    pub fn author_count(&self) -> usize {
        self.authors().len()
    }

    /// Rows whose date does not start with `YYYY-MM`. They are left out of
    /// every monthly count.
    pub fn undated(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|entry| month_number(&entry.date).is_none())
    }

    /// Commits per month, newest month first.
    ///
    /// Every month between the newest and the oldest commit appears, with
    /// a zero count if nothing was committed in it. Rows listed by
    /// [`LogTable::undated`] are skipped.
    #[must_use]
    pub fn count_by_month(&self) -> Vec<MonthCount> {
        let dated = self.dated();
        month_span(&dated)
            .map(|month| MonthCount {
                month: month_label(month),
                commits: dated.iter().filter(|(m, _)| *m == month).count(),
            })
            .collect()
    }

    /// Commits per month and per author, newest month first.
    ///
    /// Months are zero-filled as in [`LogTable::count_by_month`]. Columns
    /// follow [`LogTable::authors`] order, restricted to authors with at
    /// least one dated commit.
    #[must_use]
    pub fn count_by_month_and_author(&self) -> AuthorActivity {
        let dated = self.dated();
        let mut authors: Vec<String> = Vec::new();
        for (_, entry) in &dated {
            if !authors.contains(&entry.author) {
                authors.push(entry.author.clone());
            }
        }

        let months = month_span(&dated)
            .map(|month| {
                let mut commits = vec![0; authors.len()];
                for (_, entry) in dated.iter().filter(|(m, _)| *m == month) {
                    if let Some(column) = authors.iter().position(|a| *a == entry.author) {
                        commits[column] += 1;
                    }
                }
                MonthAuthorCount {
                    month: month_label(month),
                    total: commits.iter().sum(),
                    commits,
                }
            })
            .collect();

        AuthorActivity { authors, months }
    }

    fn dated(&self) -> Vec<(u32, &LogEntry)> {
        self.entries
            .iter()
            .filter_map(|entry| Some((month_number(&entry.date)?, entry)))
            .collect()
    }
}

/// Commits per author in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthAuthorCount {
    /// The month as `YYYY-MM`.
    pub month: String,
    /// Commits per author, in [`AuthorActivity::authors`] order.
    pub commits: Vec<usize>,
    /// Sum of `commits`.
    pub total: usize,
}

/// Result of [`LogTable::count_by_month_and_author`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorActivity {
    /// One column per author.
    pub authors: Vec<String>,
    /// One row per month, newest first.
    pub months: Vec<MonthAuthorCount>,
}

impl AuthorActivity {
    /// Column titles: `month`, every author, then `total`.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.authors.len() + 2);
        headers.push("month".to_string());
        headers.extend(self.authors.iter().cloned());
        headers.push("total".to_string());
        headers
    }

    /// The rows as text fields in [`AuthorActivity::headers`] order.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.months
            .iter()
            .map(|row| {
                let mut fields = Vec::with_capacity(row.commits.len() + 2);
                fields.push(row.month.clone());
                fields.extend(row.commits.iter().map(usize::to_string));
                fields.push(row.total.to_string());
                fields
            })
            .collect()
    }
}

/// Every month from the newest to the oldest in `dated`, inclusive.
fn month_span(dated: &[(u32, &LogEntry)]) -> impl Iterator<Item = u32> + use<> {
    let newest = dated.iter().map(|(m, _)| *m).max();
    let oldest = dated.iter().map(|(m, _)| *m).min();
    newest
        .zip(oldest)
        .into_iter()
        .flat_map(|(newest, oldest)| (oldest..=newest).rev())
}

fn month_label(month: u32) -> String {
    format!("{:04}-{:02}", month / 12, month % 12 + 1)
}

/// `YYYY-MM...` as a month count since year zero.
fn month_number(date: &str) -> Option<u32> {
    let year: u32 = date.get(0..4)?.parse().ok()?;
    if date.get(4..5)? != "-" {
        return None;
    }
    let month: u32 = date.get(5..7)?.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(year * 12 + month - 1)
}

fn write_csv_line<'a, W: Write>(
    out: &mut W,
    fields: impl IntoIterator<Item = &'a str>,
    delimiter: char,
) -> Result<()> {
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(delimiter);
        }
        if field.contains([delimiter, '\n', '\r', '"']) {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }
    line.push('\n');
    out.write_all(line.as_bytes()).map_err(ReportError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("2016-03-21 01:25:43"), Some(2016 * 12 + 2));
        assert_eq!(month_number("2016-13-01"), None);
        assert_eq!(month_number("2016/03"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn test_csv_line_quoting() {
        let mut out = Vec::new();
        write_csv_line(&mut out, ["1", "a;b", "say \"hi\"", "two\nlines"], ';').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1;\"a;b\";\"say \"\"hi\"\"\";\"two\nlines\"\n"
        );
    }
}
