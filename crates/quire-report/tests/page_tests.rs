//! Integration tests for HTML page assembly.

use std::time::{Duration, UNIX_EPOCH};

use quire_markup::{Node, parse_str, to_markup};
use quire_report::{HtmlPage, HtmlTable, ListBuilder, ReportError, format_date};

/// Helper to render a finished page
fn render(page: HtmlPage) -> String {
    to_markup(&page.into_document()).unwrap()
}

/// Helper to find the body of a finished page
fn body(document: &Node) -> &Node {
    document.child_named("body").unwrap()
}

#[test]
fn test_new_page_skeleton() {
    let document = HtmlPage::new("Status").into_document();
    assert_eq!(document.header(), Some("<!DOCTYPE html>"));
    assert_eq!(document.name(), "html");

    let head = document.child_named("head").unwrap();
    assert_eq!(head.child_named("title").and_then(Node::text), Some("Status"));
    assert_eq!(head.child_named("meta").and_then(|m| m.attribute("charset")), Some("utf-8"));
    assert!(body(&document).children().is_empty());
}

#[test]
fn test_body_content_in_call_order() {
    let mut page = HtmlPage::new("Status");
    page.add_stylesheet("style/style.css");
    page.add_title_with_hr(2, "Tasks").unwrap();
    page.add_paragraph("All green.");
    page.add_link("console", "log/build_console");
    page.add_image("icons/ok.png");
    page.add_node(Node::new("div").with_attribute("id", "footer"));

    let document = page.into_document();
    let names: Vec<&str> = body(&document).children().iter().map(Node::name).collect();
    assert_eq!(names, ["h2", "hr", "p", "a", "img", "div"]);

    let link = document.child_named("head").unwrap().child_named("link").unwrap();
    assert_eq!(link.attribute("rel"), Some("stylesheet"));
    assert_eq!(link.attribute("href"), Some("style/style.css"));
}

#[test]
fn test_heading_levels() {
    let mut page = HtmlPage::new("t");
    assert!(page.add_title(1, "one").is_ok());
    assert!(page.add_title(6, "six").is_ok());
    assert!(matches!(page.add_title(0, "zero"), Err(ReportError::InvalidHeadingLevel(0))));
    assert!(matches!(
        page.add_title_with_hr(7, "seven"),
        Err(ReportError::InvalidHeadingLevel(7))
    ));
    assert_eq!(body(&page.into_document()).children().len(), 2);
}

#[test]
fn test_list_items() {
    let list = ListBuilder::new()
        .item("compile")
        .link_item("tests", "tests.html");
    assert_eq!(list.len(), 2);
    assert!(ListBuilder::default().is_empty());

    let mut page = HtmlPage::new("t");
    page.add_list(list);
    let html = render(page);
    assert!(html.contains(
        "        <ul>\n            <li>compile</li>\n            <li>\n                \
         <a href=\"tests.html\">tests</a>\n            </li>\n        </ul>\n"
    ));
}

#[test]
fn test_table_cells() {
    let mut table = HtmlTable::new(["Result", "Task"], 2);
    assert_eq!(table.columns(), 2);
    assert_eq!(table.lines(), 2);

    table.add_image_with_size(0, 0, "icons/ok.png", 32, 32).unwrap();
    table.set_text(1, 0, "compile").unwrap();
    table.add_image(0, 1, "icons/fail.png").unwrap();
    table.add_link(1, 1, "tests", "log/tests_console").unwrap();

    let node = table.into_node();
    let rows: Vec<&Node> = node.child_named("tbody").unwrap().children().iter().collect();
    assert_eq!(rows.len(), 2);

    let icon = rows[0].children()[0].child_named("img").unwrap();
    assert_eq!(icon.attribute("width"), Some("32"));
    assert!(icon.is_self_closing());
    assert_eq!(rows[0].children()[1].text(), Some("compile"));
    assert_eq!(
        rows[1].children()[1].child_named("a").and_then(|a| a.attribute("href")),
        Some("log/tests_console")
    );

    let headers: Vec<&str> = node
        .child_named("thead")
        .unwrap()
        .descendants()
        .filter(|n| n.name() == "th")
        .filter_map(Node::text)
        .collect();
    assert_eq!(headers, ["Result", "Task"]);
}

#[test]
fn test_table_out_of_range() {
    let mut table = HtmlTable::new(["a", "b"], 1);
    assert!(matches!(
        table.set_text(2, 0, "x"),
        Err(ReportError::CellOutOfRange { col: 2, line: 0 })
    ));
    assert!(matches!(
        table.add_link(0, 1, "x", "y"),
        Err(ReportError::CellOutOfRange { col: 0, line: 1 })
    ));
    let err = table.add_image(5, 5, "x.png").unwrap_err();
    assert_eq!(err.to_string(), "cell (5, 5) is outside the table");
}

#[test]
fn test_table_from_rows() {
    let rows = vec![vec!["1", "ann", "extra"], vec!["2"]];
    let table = HtmlTable::from_rows(["#", "author"], rows);
    assert_eq!(table.lines(), 2);

    let node = table.into_node();
    let body = node.child_named("tbody").unwrap();
    assert_eq!(body.children()[0].children().len(), 2);
    assert_eq!(body.children()[0].children()[1].text(), Some("ann"));
    assert_eq!(body.children()[1].children()[1].text(), None);
}

#[test]
fn test_rendered_page_parses_back() {
    let mut page = HtmlPage::new("Report");
    page.add_title(1, "Report").unwrap();
    let mut table = HtmlTable::new(["x"], 1);
    table.set_text(0, 0, "1").unwrap();
    page.add_table(table);

    let document = page.clone().into_document();
    let reparsed = parse_str(&render(page)).unwrap();
    assert_eq!(reparsed, document);
}

#[test]
fn test_write_to_file() {
    let path = std::env::temp_dir().join(format!("quire_page_{}.html", std::process::id()));
    let mut page = HtmlPage::new("File");
    page.add_paragraph("saved");
    page.write_to_file(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>\n<html>\n    <head>\n        <title>File</title>\n"));
    assert!(written.contains("<meta charset=\"utf-8\"/>"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_format_date() {
    assert_eq!(format_date(UNIX_EPOCH), "1970-01-01 00:00:00");
    assert_eq!(
        format_date(UNIX_EPOCH + Duration::from_secs(1_458_523_543)),
        "2016-03-21 01:25:43"
    );
    assert_eq!(
        format_date(UNIX_EPOCH + Duration::from_secs(951_825_600)),
        "2000-02-29 12:00:00"
    );
    assert_eq!(
        format_date(UNIX_EPOCH - Duration::from_secs(1)),
        "1969-12-31 23:59:59"
    );
}

#[test]
fn test_dates_in_page_and_table() {
    let when = UNIX_EPOCH + Duration::from_secs(1_458_523_543);
    let mut page = HtmlPage::new("Dates");
    page.add_date(when);
    let mut table = HtmlTable::new(["date"], 1);
    table.set_date(0, 0, when).unwrap();
    assert!(matches!(
        table.set_date(1, 0, when),
        Err(ReportError::CellOutOfRange { col: 1, line: 0 })
    ));
    page.add_table(table);

    let document = page.into_document();
    let body = body(&document);
    assert_eq!(body.children()[0].text(), Some("2016-03-21 01:25:43"));
    let cell = &body.children()[1].child_named("tbody").unwrap().children()[0].children()[0];
    assert_eq!(cell.text(), Some("2016-03-21 01:25:43"));
}
