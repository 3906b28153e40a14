// Program listing: scrape the programs management page for links to each
// program's main page and turn them into the slugs `--program` expects.

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use reqwest::Url;
use scraper::Html;

use crate::forms::selector;
use crate::session::Session;
use crate::transport::Transport;

pub const PROGRAMS_PATH: &str = "manage/programs/";
const MAIN_SUFFIX: &str = "/main";

/// Fetch the programs page and return slugs, newest first.
pub fn list_programs<T: Transport>(session: &Session<T>) -> Result<Vec<String>> {
    let url = session.site().url(PROGRAMS_PATH);
    let page = session
        .get(&url)
        .with_context(|| format!("Failed to fetch program list from {}", url))?;
    program_slugs(&page.text(), &page.url)
}

/// Slugs of every `<a href=".../main">` on the page, in reverse document
/// order (the page lists the oldest programs first). Links are resolved
/// against `page_url` before their path is looked at.
pub fn program_slugs(html: &str, page_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(page_url).with_context(|| format!("Invalid page URL {}", page_url))?;
    let document = Html::parse_document(html);
    let anchors = selector("a[href]")?;
    let mut slugs: Vec<String> = document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| slug_from_href(&base, href))
        .collect();
    slugs.reverse();
    Ok(slugs)
}

/// `/manage/Splash/2012/main` -> `Splash/2012`. Only the path counts;
/// the management segment and the `/main` suffix are dropped from it.
pub fn slug_from_href(base: &Url, href: &str) -> Option<String> {
    let url = base.join(href.trim()).ok()?;
    let path = url.path().strip_suffix(MAIN_SUFFIX)?;
    let (_, slug) = path.trim_start_matches('/').split_once('/')?;
    (!slug.is_empty()).then(|| slug.to_string())
}

pub fn render_program_list(slugs: &[String]) -> String {
    slugs
        .iter()
        .map(|slug| format!(" - {}", slug))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_programs(slugs: &[String]) {
    println!("{}", "List of available programs to pick from:".bold());
    println!("{}", "=".repeat(40));
    println!("{}", render_program_list(slugs));
}
