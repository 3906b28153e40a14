// HTML form handling: find a form on a page and collect the name/value
// pairs a browser would submit for it.

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

/// A form lifted out of a page, ready to be filled in and posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlForm {
    pub name: Option<String>,
    pub action: Option<String>,
    /// Successful controls, in document order.
    pub fields: Vec<(String, String)>,
}

impl HtmlForm {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrite the first field called `name`, or append it.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some(field) => field.1 = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    /// Submission target: `action` resolved against the page it came
    /// from, or the page itself when the form has no action.
    pub fn action_url(&self, page_url: &str) -> Result<String> {
        let base = Url::parse(page_url).with_context(|| format!("Invalid page URL {}", page_url))?;
        match self.action.as_deref().map(str::trim) {
            None | Some("") => Ok(base.to_string()),
            Some(action) => Ok(base
                .join(action)
                .with_context(|| format!("Invalid form action {:?}", action))?
                .to_string()),
        }
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {:?}: {}", css, e))
}

/// The form called `name`, or the first form on the page when `name` is
/// `None`.
pub fn find_form(html: &str, name: Option<&str>) -> Result<Option<HtmlForm>> {
    let document = Html::parse_document(html);
    let forms = selector("form")?;

    let found = document
        .select(&forms)
        .find(|form| name.is_none() || form.value().attr("name") == name);

    match found {
        Some(form) => Ok(Some(read_form(form)?)),
        None => Ok(None),
    }
}

fn read_form(form: ElementRef<'_>) -> Result<HtmlForm> {
    let controls = selector("input, select, textarea")?;
    let options = selector("option")?;
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut submit_taken = false;

    for control in form.select(&controls) {
        let element = control.value();
        let Some(name) = element.attr("name") else {
            continue;
        };
        if element.attr("disabled").is_some() {
            continue;
        }

        match element.name() {
            "input" => {
                let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                let value = element.attr("value");
                match kind.as_str() {
                    "submit" => {
                        // Only the button that was "clicked" is sent.
                        if !submit_taken {
                            submit_taken = true;
                            fields.push((name.to_string(), value.unwrap_or_default().to_string()));
                        }
                    }
                    "checkbox" | "radio" => {
                        if element.attr("checked").is_some() {
                            fields.push((name.to_string(), value.unwrap_or("on").to_string()));
                        }
                    }
                    "button" | "reset" | "image" | "file" => {}
                    _ => fields.push((name.to_string(), value.unwrap_or_default().to_string())),
                }
            }
            "select" => {
                let all: Vec<ElementRef<'_>> = control.select(&options).collect();
                let selected: Vec<&ElementRef<'_>> = all
                    .iter()
                    .filter(|option| option.value().attr("selected").is_some())
                    .collect();
                let chosen = if selected.is_empty() && element.attr("multiple").is_none() {
                    all.first().into_iter().collect()
                } else {
                    selected
                };
                for option in chosen {
                    let value = match option.value().attr("value") {
                        Some(value) => value.to_string(),
                        None => option.text().collect::<String>().trim().to_string(),
                    };
                    fields.push((name.to_string(), value));
                }
            }
            "textarea" => fields.push((name.to_string(), control.text().collect())),
            _ => {}
        }
    }

    Ok(HtmlForm {
        name: form.value().attr("name").map(str::to_string),
        action: form.value().attr("action").map(str::to_string),
        fields,
    })
}
