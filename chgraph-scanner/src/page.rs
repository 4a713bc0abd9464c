//! Field extraction for the three Companies House page layouts the tool reads.
//!
//! Everything here is pure: HTML text in, records out. The element ids are
//! those of the register's current markup; when the markup changes these
//! functions report `ParseError` rather than guessing.

use crate::classify::{COMPANIES_HOUSE_ORIGIN, COMPANY_NUMBER_PATTERN, company_url};
use crate::error::{Result, ScanError};
use crate::record::{EntityKind, PageRecords, Record, RelationStatus, SearchState};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Listing pages show at most this many officers or appointments.
pub const DEFAULT_MAX_LISTED: usize = 35;

static LEADING_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("count pattern is valid"));

static APPOINTMENT_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"appointments\s+(\d+)").expect("count pattern is valid"));

static NAME_AND_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(.*?)\s*\(({})\)\s*$", COMPANY_NUMBER_PATTERN))
        .expect("appointment name pattern is valid")
});

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScanError::ParseError(format!("invalid selector `{}`: {}", css, e)))
}

fn text_of(document: &Html, css: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string()))
}

fn required_text(document: &Html, css: &str, url: &str) -> Result<String> {
    text_of(document, css)?.ok_or_else(|| ScanError::missing(css, url))
}

fn parse_count(pattern: &Regex, text: &str, css: &str, url: &str) -> Result<usize> {
    pattern
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
        .ok_or_else(|| {
            ScanError::ParseError(format!(
                "could not read a count from `{}` on {}: {:?}",
                css, url, text
            ))
        })
}

fn absolute(href: &str) -> Option<String> {
    let origin = Url::parse(COMPANIES_HOUSE_ORIGIN).ok()?;
    origin.join(href.trim()).ok().map(|url| url.to_string())
}

/// Read the head record of a company detail page.
pub fn parse_company_head(html: &str, url: &str) -> Result<Record> {
    let document = Html::parse_document(html);

    let name = required_text(&document, "#company-name", url)?;
    let number = required_text(&document, "#company-number strong", url)?;

    Ok(Record::new(name, EntityKind::Company)
        .with_search_state(SearchState::PrimaryOnly)
        .with_primary_url(url)
        .with_attribute(format!("Company Number: {}", number)))
}

/// Read the officers listed on a company's `/officers` page.
pub fn parse_company_officers(html: &str, url: &str, max_listed: usize) -> Result<Vec<Record>> {
    let document = Html::parse_document(html);

    let count_text = required_text(&document, "#company-appointments", url)?;
    let count = parse_count(&LEADING_COUNT, &count_text, "#company-appointments", url)?;
    let count = count.min(max_listed);
    debug!("{} lists {} officers", url, count);

    let mut officers = Vec::with_capacity(count);
    for i in 1..=count {
        let name_css = format!("#officer-name-{}", i);
        let name = required_text(&document, &name_css, url)?;

        let link_css = format!("{} a[href]", name_css);
        let link_selector = selector(&link_css)?;
        let link = document
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(absolute)
            .ok_or_else(|| ScanError::missing(&link_css, url))?;

        let status_text = required_text(&document, &format!("#officer-status-tag-{}", i), url)?;

        officers.push(
            Record::new(name, EntityKind::Officer)
                .with_secondary_url(link)
                .with_status(RelationStatus::from_text(&status_text))
                .with_attribute(format!("Officer status: {}", status_text)),
        );
    }

    Ok(officers)
}

/// Read an officer's appointments page: the officer itself and every company
/// it is appointed to.
pub fn parse_officer_appointments(html: &str, url: &str, max_listed: usize) -> Result<PageRecords> {
    let document = Html::parse_document(html);

    let name = required_text(&document, "#officer-name", url)?;

    // Only natural persons have a date of birth on the register.
    let is_person = text_of(&document, "#officer-date-of-birth-value")?
        .is_some_and(|dob| !dob.is_empty());
    let (kind, search_state) = if is_person {
        (EntityKind::Person, SearchState::Complete)
    } else {
        (EntityKind::Company, SearchState::SecondaryOnly)
    };
    let head = Record::new(name, kind)
        .with_search_state(search_state)
        .with_secondary_url(url);

    let count_text = required_text(&document, "#personal-appointments", url)?;
    let count = parse_count(&APPOINTMENT_COUNT, &count_text, "#personal-appointments", url)?;
    let count = count.min(max_listed);
    debug!("{} lists {} appointments", url, count);

    let mut related = Vec::with_capacity(count);
    for i in 1..=count {
        let name_css = format!("#company-name-{}", i);
        let text = required_text(&document, &name_css, url)?;
        let captures = NAME_AND_NUMBER.captures(&text).ok_or_else(|| {
            ScanError::ParseError(format!(
                "`{}` on {} is not of the form `NAME (NUMBER)`: {:?}",
                name_css, url, text
            ))
        })?;
        let company_name = captures[1].to_string();
        let number = captures[2].to_uppercase();

        let company_status = required_text(&document, &format!("#company-status-value-{}", i), url)?;
        let appointment_status =
            required_text(&document, &format!("#appointment-status-tag-{}", i), url)?;

        related.push(
            Record::new(company_name, EntityKind::Company)
                .with_primary_url(company_url(&number))
                .with_status(RelationStatus::from_text(&appointment_status))
                .with_attribute(format!("Appointment status: {}", appointment_status))
                .with_attribute(format!("Company status: {}", company_status)),
        );
    }

    Ok(PageRecords { head, related })
}
