//! HTML pages assembled from [`Node`] constructors.
//!
//! Nothing here formats markup by hand: pages, lists and tables are plain
//! trees handed to the serializer of `quire-markup`.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use quire_dom::Node;

use crate::{ReportError, Result};

/// Prologue written at the top of every page.
pub const HTML5_DOCTYPE: &str = "<!DOCTYPE html>";

fn void_element(name: &str) -> Node {
    let mut node = Node::new(name);
    node.set_self_closing(true);
    node
}

fn link(text: &str, href: &str) -> Node {
    Node::new("a").with_attribute("href", href).with_text(text)
}

fn image(src: &str) -> Node {
    let mut img = void_element("img");
    img.add_attribute("src", src);
    img
}

/// A point in time as `YYYY-MM-DD hh:mm:ss`, in UTC.
///
/// This is the layout [`crate::clean_date_format`] gives svn dates, so
/// generated and logged dates read alike.
#[must_use]
pub fn format_date(time: SystemTime) -> String {
    let seconds = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    };
    let (year, month, day) = civil_from_days(seconds.div_euclid(86_400));
    let second_of_day = seconds.rem_euclid(86_400);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02}",
        second_of_day / 3600,
        second_of_day % 3600 / 60,
        second_of_day % 60
    )
}

/// Proleptic Gregorian date of a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    // Shift the epoch to 0000-03-01 so leap days end each 400-year era.
    let shifted = days + 719_468;
    let era = shifted.div_euclid(146_097);
    let day_of_era = shifted.rem_euclid(146_097);
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let march_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * march_month + 2) / 5 + 1;
    let month = if march_month < 10 {
        march_month + 3
    } else {
        march_month - 9
    };
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// An HTML page under construction.
///
/// Content is appended to the end of `<body>` in call order; stylesheets go
/// to `<head>`.
///
/// ```
/// use quire_report::{HtmlPage, ListBuilder};
///
/// let mut page = HtmlPage::new("Build status");
/// page.add_title(1, "Build status").unwrap();
/// page.add_list(ListBuilder::new().item("compile: ok").item("tests: ok"));
/// let html = quire_markup::to_markup(&page.into_document()).unwrap();
/// assert!(html.starts_with("<!DOCTYPE html>\n<html>"));
/// ```
#[derive(Debug, Clone)]
pub struct HtmlPage {
    head: Node,
    body: Node,
}

impl HtmlPage {
    /// A page with `title` in its head and an empty body.
    #[must_use]
    pub fn new(title: &str) -> Self {
        let head = Node::new("head")
            .with_child(Node::new("title").with_text(title))
            .with_child(void_element("meta").with_attribute("charset", "utf-8"));
        Self {
            head,
            body: Node::new("body"),
        }
    }

    /// Link a stylesheet from the page head.
    pub fn add_stylesheet(&mut self, href: &str) {
        self.head.add_child(
            void_element("link")
                .with_attribute("rel", "stylesheet")
                .with_attribute("href", href),
        );
    }

    /// Append an `<h1>`..`<h6>` heading.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidHeadingLevel`] for levels outside
    /// `1..=6`.
    pub fn add_title(&mut self, level: u8, title: &str) -> Result<()> {
        if !(1..=6).contains(&level) {
            return Err(ReportError::InvalidHeadingLevel(level));
        }
        self.body
            .add_child(Node::new(format!("h{level}")).with_text(title));
        Ok(())
    }

    /// Append a heading followed by a horizontal rule.
    ///
    /// # Errors
    ///
    /// Same as [`HtmlPage::add_title`].
    pub fn add_title_with_hr(&mut self, level: u8, title: &str) -> Result<()> {
        self.add_title(level, title)?;
        self.body.add_child(void_element("hr"));
        Ok(())
    }

    /// Append a paragraph of text.
    pub fn add_paragraph(&mut self, text: &str) {
        self.body.add_child(Node::new("p").with_text(text));
    }

    /// Append a paragraph holding `time` as formatted by [`format_date`].
    pub fn add_date(&mut self, time: SystemTime) {
        self.add_paragraph(&format_date(time));
    }

    /// Append a hyperlink.
    pub fn add_link(&mut self, text: &str, href: &str) {
        self.body.add_child(link(text, href));
    }

    /// Append an image.
    pub fn add_image(&mut self, src: &str) {
        self.body.add_child(image(src));
    }

    /// Append a bulleted list.
    pub fn add_list(&mut self, list: ListBuilder) {
        self.body.add_child(list.list);
    }

    /// Append an arbitrary subtree.
    pub fn add_node(&mut self, node: Node) {
        self.body.add_child(node);
    }

    /// Append a table.
    pub fn add_table(&mut self, table: HtmlTable) {
        self.body.add_child(table.into_node());
    }

    /// The finished document: doctype, then `<html>` holding head and body.
    #[must_use]
    pub fn into_document(self) -> Node {
        Node::new("html")
            .with_header(HTML5_DOCTYPE)
            .with_child(self.head)
            .with_child(self.body)
    }

    /// Serialize the finished document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Markup`] if the file cannot be created or
    /// written.
    pub fn write_to_file(self, path: impl AsRef<Path>) -> Result<()> {
        quire_markup::write_file(path, &self.into_document())?;
        Ok(())
    }
}

/// Builds a `<ul>` one item at a time.
#[derive(Debug, Clone)]
pub struct ListBuilder {
    list: Node,
}

impl Default for ListBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ListBuilder {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: Node::new("ul"),
        }
    }

    /// Add a text item.
    #[must_use]
    pub fn item(mut self, text: &str) -> Self {
        self.list.add_child(Node::new("li").with_text(text));
        self
    }

    /// Add an item holding a hyperlink.
    #[must_use]
    pub fn link_item(mut self, text: &str, href: &str) -> Self {
        self.list.add_child(Node::new("li").with_child(link(text, href)));
        self
    }

    /// Number of items so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.children().len()
    }

    /// True if no item was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.children().is_empty()
    }
}

/// A table with a header row and a fixed grid of body cells.
///
/// Cells are addressed as `(col, line)`, both zero-based; `line` counts
/// body rows only.
#[derive(Debug, Clone)]
pub struct HtmlTable {
    headers: Vec<String>,
    lines: Vec<Vec<Node>>,
}

impl HtmlTable {
    /// A table with one column per header and `lines` empty body rows.
    #[must_use]
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>, lines: usize) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let columns = headers.len();
        Self {
            headers,
            lines: (0..lines)
                .map(|_| (0..columns).map(|_| Node::new("td")).collect())
                .collect(),
        }
    }

    /// A table filled with text rows. Short rows leave their trailing cells
    /// empty; extra fields are dropped.
    #[must_use]
    pub fn from_rows<S, R, F>(headers: impl IntoIterator<Item = S>, rows: R) -> Self
    where
        S: Into<String>,
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let mut table = Self::new(headers, 0);
        let columns = table.columns();
        for row in rows {
            let mut cells: Vec<Node> = row
                .into_iter()
                .take(columns)
                .map(|field| Node::new("td").with_text(field.as_ref()))
                .collect();
            cells.resize_with(columns, || Node::new("td"));
            table.lines.push(cells);
        }
        table
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.headers.len()
    }

    /// Number of body rows.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines.len()
    }

    /// The cell at `(col, line)`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::CellOutOfRange`] outside the grid.
    pub fn cell_mut(&mut self, col: usize, line: usize) -> Result<&mut Node> {
        self.lines
            .get_mut(line)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(ReportError::CellOutOfRange { col, line })
    }

    /// Replace the text of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::CellOutOfRange`] outside the grid.
    pub fn set_text(&mut self, col: usize, line: usize, text: &str) -> Result<()> {
        self.cell_mut(col, line)?.set_text(text);
        Ok(())
    }

    /// Replace the text of a cell with `time` as formatted by
    /// [`format_date`].
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::CellOutOfRange`] outside the grid.
    pub fn set_date(&mut self, col: usize, line: usize, time: SystemTime) -> Result<()> {
        self.set_text(col, line, &format_date(time))
    }

    /// Add a hyperlink to a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::CellOutOfRange`] outside the grid.
    pub fn add_link(&mut self, col: usize, line: usize, text: &str, href: &str) -> Result<()> {
        self.cell_mut(col, line)?.add_child(link(text, href));
        Ok(())
    }

    /// Add an image to a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::CellOutOfRange`] outside the grid.
    pub fn add_image(&mut self, col: usize, line: usize, src: &str) -> Result<()> {
        self.cell_mut(col, line)?.add_child(image(src));
        Ok(())
    }

    /// Add an image with explicit pixel dimensions to a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::CellOutOfRange`] outside the grid.
    pub fn add_image_with_size(
        &mut self,
        col: usize,
        line: usize,
        src: &str,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let img = image(src)
            .with_attribute("width", width.to_string())
            .with_attribute("height", height.to_string());
        self.cell_mut(col, line)?.add_child(img);
        Ok(())
    }

    /// The `<table>` element: a `<thead>` row of `<th>` then a `<tbody>`.
    #[must_use]
    pub fn into_node(self) -> Node {
        let header_row = self
            .headers
            .into_iter()
            .fold(Node::new("tr"), |row, header| {
                row.with_child(Node::new("th").with_text(header))
            });

        let mut body = Node::new("tbody");
        for cells in self.lines {
            let mut row = Node::new("tr");
            for cell in cells {
                row.add_child(cell);
            }
            body.add_child(row);
        }

        Node::new("table")
            .with_child(Node::new("thead").with_child(header_row))
            .with_child(body)
    }
}
