//! Quire CLI
//!
//! Inspect, reformat, and convert documents in the Quire markup dialect, and
//! turn `svn log --xml` output into CSV tables or HTML reports.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use quire_common::warning::{clear_warnings, set_quiet, warn_once};
use quire_dom::Node;
use quire_markup::{Serializer, SerializerConfig, TreeBuilder};
use quire_report::svn_log::HEADERS;
use quire_report::{HtmlPage, HtmlTable, ListBuilder, LogEntry, LogTable, present_svn_log};

/// Deepest tree `quire json` will encode; serde nests one call per level.
const JSON_MAX_DEPTH: usize = 512;

/// Quire: a small, permissive markup toolkit
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the element outline of a document
    quire tree page.html

    # Normalize layout with two-space indentation
    quire format page.html -o clean.html --indent 2

    # Dump the tree as JSON
    quire json data.xml

    # Convert an svn log to CSV
    svn log --xml > log.xml && quire svn-log log.xml -o log.csv

    # Build an HTML commit report
    quire report log.xml -o www/commits.html
"#)]
struct Cli {
    /// Reject malformed markup instead of recovering from it
    #[arg(long, global = true)]
    strict: bool,

    /// Do not print recovery warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the document tree as an outline
    Tree {
        /// Documents to print
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Re-serialize a document with normalized layout
    Format {
        /// Document to format
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write here instead of standard output
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Spaces per indentation level
        #[arg(long, default_value = "4")]
        indent: usize,
    },

    /// Dump the document tree as JSON
    Json {
        /// Document to dump
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Convert `svn log --xml` output to CSV
    SvnLog {
        /// Output of `svn log --xml`
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// CSV file to create
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Field separator
        #[arg(long, default_value = ";")]
        delimiter: char,
    },

    /// Build an HTML commit report from `svn log --xml` output
    Report {
        /// Output of `svn log --xml`
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// HTML file to create
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Page title
        #[arg(long, default_value = "Commit report")]
        title: String,

        /// Stylesheet to link from the page
        #[arg(long, value_name = "URL")]
        stylesheet: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);

    match &cli.command {
        Command::Tree { files } => {
            for (i, file) in files.iter().enumerate() {
                if i > 0 {
                    println!();
                    clear_warnings();
                }
                let root = load(file, cli.strict)?;
                println!("{}", format!("=== {} ===", file.display()).bold());
                print_tree(&root);
            }
        }

        Command::Format {
            file,
            output,
            indent,
        } => {
            let root = load(file, cli.strict)?;
            let serializer = Serializer::with_config(SerializerConfig::with_indent_width(*indent));
            match output {
                Some(path) => {
                    quire_markup::write_file_with(path, &root, &serializer)?;
                    print_saved(path);
                }
                None => serializer.write(&root, &mut io::stdout().lock())?,
            }
        }

        Command::Json { file } => {
            let root = load(file, cli.strict)?;
            let depth = root.depth();
            if depth > JSON_MAX_DEPTH {
                bail!(
                    "{} is {depth} levels deep; JSON output stops at {JSON_MAX_DEPTH}",
                    file.display()
                );
            }
            let json = serde_json::to_string_pretty(&root).context("cannot encode tree as JSON")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }

        Command::SvnLog {
            file,
            output,
            delimiter,
        } => {
            let table = load_log(file, cli.strict)?;
            table.write_csv_file(output, *delimiter)?;
            print_saved(output);
            println!("  {} commits", table.len());
        }

        Command::Report {
            file,
            output,
            title,
            stylesheet,
        } => {
            let table = load_log(file, cli.strict)?;
            let mut page = HtmlPage::new(title);
            if let Some(href) = stylesheet {
                page.add_stylesheet(href);
            }
            page.add_title_with_hr(1, title)?;
            page.add_paragraph(&format!(
                "{} commits by {} authors in {}",
                table.len(),
                table.author_count(),
                file.display()
            ));
            page.add_date(SystemTime::now());

            page.add_title(2, "Commits per month")?;
            let months = table
                .count_by_month()
                .into_iter()
                .fold(ListBuilder::new(), |list, count| {
                    list.item(&format!("{}: {}", count.month, count.commits))
                });
            page.add_list(months);

            page.add_title(2, "Commits per month and author")?;
            let activity = table.count_by_month_and_author();
            page.add_table(HtmlTable::from_rows(activity.headers(), activity.rows()));

            page.add_title(2, "Commits")?;
            page.add_table(HtmlTable::from_rows(
                HEADERS,
                table.entries().iter().map(LogEntry::fields),
            ));

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create {}", parent.display()))?;
            }
            page.write_to_file(output)?;
            print_saved(output);
        }
    }

    Ok(())
}

/// Parse `path`, printing every problem that was recovered from.
fn load(path: &Path, strict: bool) -> Result<Node> {
    let mut builder = TreeBuilder::from_file(path)?;
    if strict {
        builder = builder.with_strict_mode();
    }
    let (root, issues) = builder
        .run_with_issues()
        .with_context(|| format!("cannot parse {}", path.display()))?;

    for issue in &issues {
        warn_once("Markup Builder", &format!("{}: {issue}", path.display()));
    }
    if !issues.is_empty() {
        eprintln!(
            "{} {} recovered from {} problem(s); rerun with --strict to reject it",
            "warning:".yellow().bold(),
            path.display(),
            issues.len()
        );
    }
    Ok(root)
}

/// Parse an svn log and project it, warning about rows without a date.
fn load_log(path: &Path, strict: bool) -> Result<LogTable> {
    let table = present_svn_log(&load(path, strict)?);
    for entry in table.undated() {
        warn_once(
            "Svn Log",
            &format!("revision {} has no usable date", entry.revision),
        );
    }
    Ok(table)
}

fn print_saved(path: &Path) {
    println!("{} {}", "Saved".green().bold(), path.display());
}

enum Line<'a> {
    Element(&'a Node, usize),
    PostText(&'a str, usize),
}

/// Print an indented outline: elements with their attributes, text runs
/// quoted with spaces shown as `·`, post text after the element it follows.
fn print_tree(root: &Node) {
    if let Some(header) = root.header() {
        println!("{}", header.dimmed());
    }

    let mut pending = vec![Line::Element(root, 0)];
    while let Some(line) = pending.pop() {
        match line {
            Line::Element(node, depth) => {
                let prefix = "  ".repeat(depth);
                let attrs: String = node
                    .attributes()
                    .iter()
                    .map(|a| {
                        if a.value.is_empty() {
                            format!(" {}", a.key)
                        } else {
                            format!(" {}=\"{}\"", a.key, a.value)
                        }
                    })
                    .collect();
                let close = if node.is_self_closing() { "/>" } else { ">" };
                println!("{prefix}<{}{}{close}", node.name().cyan(), attrs.yellow());

                if let Some(text) = node.text() {
                    println!("{prefix}  {}", display_text(text).green());
                }
                if let Some(post_text) = node.post_text() {
                    pending.push(Line::PostText(post_text, depth));
                }
                pending.extend(
                    node.children()
                        .iter()
                        .rev()
                        .map(|child| Line::Element(child, depth + 1)),
                );
            }
            Line::PostText(text, depth) => {
                println!("{}{}", "  ".repeat(depth), display_text(text).green());
            }
        }
    }
}

fn display_text(text: &str) -> String {
    let display = text.replace('\n', "\\n").replace(' ', "\u{00B7}");
    format!("\"{display}\"")
}
