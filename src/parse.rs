use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::{profile::ProfileRecord, Error, Result};

const EMAIL_LABEL: &str = "Email address";
const LAST_ACCESS_LABEL: &str = "Last access to site";

/// Parses a fetched page off the async runtime, `Html` is not `Send`.
pub async fn parse_profile(html: String, id: u64, url: String) -> Result<Option<ProfileRecord>> {
    spawn_blocking(move || extract_profile(&html, id, &url)).await?
}

/// Extracts one record from raw page markup.
///
/// `Ok(None)` means the page carries no profile tree (hidden, deleted or
/// never-existing account) and the ID should be skipped. A profile tree with
/// a required field missing fails the whole record, so partially populated
/// rows never reach the output.
pub fn extract_profile(html: &str, id: u64, url: &str) -> Result<Option<ProfileRecord>> {
    let doc = Html::parse_document(html);

    let section_sel = create_selector("#region-main div.profile_tree > section")?;
    let sections: Vec<ElementRef> = doc.select(&section_sel).collect();
    if sections.is_empty() {
        return Ok(None);
    }

    let name_sel = create_selector("#page-header .page-header-headings h1")?;
    let name = doc
        .select(&name_sel)
        .next()
        .map(element_text)
        .ok_or(Error::MissingField("name heading"))?;

    let anchor_sel = create_selector("a")?;
    let email = extract_email(&sections, &anchor_sel);

    let dl_sel = create_selector("dl")?;
    let dt_sel = create_selector("dt")?;
    let dd_sel = create_selector("dd")?;
    let last_access = doc
        .select(&dl_sel)
        .find(|dl| {
            dl.select(&dt_sel)
                .any(|dt| element_text(dt) == LAST_ACCESS_LABEL)
        })
        .and_then(|dl| dl.select(&dd_sel).next())
        .map(element_text)
        .ok_or(Error::MissingField("last access field"))?;

    let course_sel = create_selector("ul > li > dl > dd > ul > li")?;
    let mut courses = String::new();
    for item in doc.select(&course_sel) {
        courses.push_str(&element_text(item));
        courses.push('\n');
    }

    Ok(Some(ProfileRecord {
        id,
        url: url.to_owned(),
        name,
        email,
        last_access,
        courses,
    }))
}

/// Email from the first detail section labeled `Email address`: a single
/// anchor is taken unconditionally, otherwise the first `mailto:` anchor
/// wins. A labeled section without a mailto link yields an empty string;
/// no labeled section at all yields the `NA` sentinel.
fn extract_email(sections: &[ElementRef], anchor_sel: &Selector) -> String {
    let labeled = sections
        .iter()
        .find(|s| s.text().collect::<String>().contains(EMAIL_LABEL));
    let Some(section) = labeled else {
        return "NA".to_owned();
    };

    let links: Vec<ElementRef> = section.select(anchor_sel).collect();
    match links.as_slice() {
        [only] => element_text(*only),
        _ => links
            .iter()
            .copied()
            .find(|a| {
                a.value()
                    .attr("href")
                    .is_some_and(|href| href.starts_with("mailto:"))
            })
            .map(element_text)
            .unwrap_or_default(),
    }
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_owned()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://127.0.0.1:3000/user/profile.php?id=7&showallcourses=1";

    fn page(header: &str, tree: &str) -> String {
        format!(
            r#"<html><body>
            <div id="page-header">{header}</div>
            <div id="region-main"><div><div>
              <div class="profile_tree">{tree}</div>
            </div></div></div>
            </body></html>"#
        )
    }

    fn name_heading(name: &str) -> String {
        format!(r#"<div class="page-header-headings"><h1>{name}</h1></div>"#)
    }

    const EMAIL_SECTION: &str = r#"<section><ul><li><dl>
        <dt>Email address</dt>
        <dd><a href="mailto:jane@example.edu">jane@example.edu</a></dd>
    </dl></li></ul></section>"#;

    const ACTIVITY_SECTION: &str = r#"<section><ul><li><dl>
        <dt>Last access to site</dt>
        <dd>Monday, 1 January 2024, 9:00 AM</dd>
    </dl></li></ul></section>"#;

    const COURSES_SECTION: &str = r#"<section><ul><li><dl>
        <dt>Course profiles</dt>
        <dd><ul><li>Course A</li><li>Course B</li></ul></dd>
    </dl></li></ul></section>"#;

    #[test]
    fn full_profile_extracts_every_field() {
        let tree = format!("{EMAIL_SECTION}{COURSES_SECTION}{ACTIVITY_SECTION}");
        let html = page(&name_heading("Jane Doe"), &tree);

        let record = extract_profile(&html, 7, URL).unwrap().unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.url, URL);
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.email, "jane@example.edu");
        assert_eq!(record.last_access, "Monday, 1 January 2024, 9:00 AM");
        assert_eq!(record.courses, "Course A\nCourse B\n");
    }

    #[test]
    fn page_without_profile_tree_is_empty() {
        let html = r#"<html><body>
            <div id="page-header"><h1>Notice</h1></div>
            <div id="region-main"><p>The details of this user are not available to you</p></div>
        </body></html>"#;
        assert_eq!(extract_profile(html, 999, URL).unwrap(), None);
    }

    #[test]
    fn empty_document_is_empty_not_an_error() {
        assert_eq!(extract_profile("", 1, URL).unwrap(), None);
    }

    #[test]
    fn mailto_anchor_wins_among_several_links() {
        let email_section = r#"<section><ul><li><dl>
            <dt>Email address</dt>
            <dd>
              <a href="/message/index.php?id=7">Message</a>
              <a href="mailto:jane@example.edu">jane@example.edu</a>
              <a href="https://example.edu/jane">Homepage</a>
            </dd>
        </dl></li></ul></section>"#;
        let tree = format!("{email_section}{ACTIVITY_SECTION}");
        let html = page(&name_heading("Jane Doe"), &tree);

        let record = extract_profile(&html, 7, URL).unwrap().unwrap();
        assert_eq!(record.email, "jane@example.edu");
    }

    #[test]
    fn missing_email_section_falls_back_to_sentinel() {
        let tree = format!("{COURSES_SECTION}{ACTIVITY_SECTION}");
        let html = page(&name_heading("Jane Doe"), &tree);

        let record = extract_profile(&html, 7, URL).unwrap().unwrap();
        assert_eq!(record.email, "NA");
        assert_eq!(record.courses, "Course A\nCourse B\n");
    }

    #[test]
    fn profile_without_courses_has_empty_courses_text() {
        let tree = format!("{EMAIL_SECTION}{ACTIVITY_SECTION}");
        let html = page(&name_heading("Jane Doe"), &tree);

        let record = extract_profile(&html, 7, URL).unwrap().unwrap();
        assert_eq!(record.courses, "");
    }

    #[test]
    fn missing_name_heading_fails_the_whole_record() {
        let tree = format!("{EMAIL_SECTION}{ACTIVITY_SECTION}");
        let html = page("<h1>Wrong place</h1>", &tree);

        let res = extract_profile(&html, 7, URL);
        assert!(matches!(res, Err(Error::MissingField("name heading"))));
    }

    #[test]
    fn missing_last_access_fails_the_whole_record() {
        let tree = format!("{EMAIL_SECTION}{COURSES_SECTION}");
        let html = page(&name_heading("Jane Doe"), &tree);

        let res = extract_profile(&html, 7, URL);
        assert!(matches!(res, Err(Error::MissingField("last access field"))));
    }

    #[test]
    fn reparsing_the_same_page_is_byte_identical() {
        let tree = format!("{EMAIL_SECTION}{COURSES_SECTION}{ACTIVITY_SECTION}");
        let html = page(&name_heading("Jane Doe"), &tree);

        let first = extract_profile(&html, 7, URL).unwrap().unwrap();
        let second = extract_profile(&html, 7, URL).unwrap().unwrap();
        assert_eq!(first, second);
    }
}
