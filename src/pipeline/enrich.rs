use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::config::Config;
use crate::error::EnrichError;
use crate::types::segment::{LeaderboardEntry, RawSegment, SegmentPage};

/// Supplementary segment data from a source without a schema contract.
#[async_trait]
pub trait DetailEnricher: Send + Sync {
    async fn enrich(&self, segment: &RawSegment) -> Result<SegmentPage, EnrichError>;
}

/// Scrapes the public segment page.
#[derive(Clone)]
pub struct PageEnricher {
    http: reqwest::Client,
    base_url: String,
}

impl PageEnricher {
    pub fn new(config: &Config) -> Result<Self, EnrichError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| EnrichError::Fetch(format!("Failed to build HTTP client: {}", err)))?;

        Ok(Self {
            http,
            base_url: config.strava_web_url.clone(),
        })
    }
}

#[async_trait]
impl DetailEnricher for PageEnricher {
    async fn enrich(&self, segment: &RawSegment) -> Result<SegmentPage, EnrichError> {
        let url = format!("{}/segments/{}", self.base_url, segment.id);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(EnrichError::Status(response.status().as_u16()));
        }

        let html = response.text().await?;
        Ok(parse_segment_page(&html))
    }
}

/// Extracts what it can; missing markup leaves the field empty.
pub fn parse_segment_page(html: &str) -> SegmentPage {
    let doc = Html::parse_document(html);
    let mut page = SegmentPage::default();

    if let Some(name) = first_text(&doc, "h1#js-full-name")
        .or_else(|| first_text(&doc, ".segment-heading h1"))
        .or_else(|| first_text(&doc, "h1"))
    {
        page.name = name;
    }

    if let Some(stat_sel) = selector(".inline-stats li") {
        let value_sel = selector("strong");
        let label_sel = selector(".label");

        for item in doc.select(&stat_sel) {
            let Some(label) = label_sel
                .as_ref()
                .and_then(|sel| item.select(sel).next())
                .map(element_text)
            else {
                continue;
            };
            let value = value_sel
                .as_ref()
                .and_then(|sel| item.select(sel).next())
                .map(element_text)
                .unwrap_or_default();

            apply_stat(&mut page, &label.to_lowercase(), &value);
        }
    }

    page.leader = parse_leader(&doc);
    page
}

fn apply_stat(page: &mut SegmentPage, label: &str, value: &str) {
    match label {
        "distance" => page.distance = parse_length(value),
        "avg grade" | "average grade" => page.average_grade = leading_number(value),
        "max grade" | "maximum grade" => page.maximum_grade = leading_number(value),
        "lowest elev" | "lowest elevation" => page.elevation_low = parse_length(value),
        "highest elev" | "highest elevation" => page.elevation_high = parse_length(value),
        "elev difference" | "elevation difference" | "elev gain" | "elevation gain" => {
            page.elevation_gain = parse_length(value)
        }
        "climb category" | "category" => page.climb_category = parse_climb_category(value),
        "attempts" | "athletes" | "efforts" => page.attempts = leading_number(value).map(|n| n as u64),
        _ => {}
    }
}

fn parse_leader(doc: &Html) -> Option<LeaderboardEntry> {
    let table_sel = selector("table.table-leaderboard, table.leaderboard")?;
    let header_sel = selector("thead th")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;

    let table = doc.select(&table_sel).next()?;
    let headers: Vec<String> = table
        .select(&header_sel)
        .map(|th| element_text(th).to_lowercase())
        .collect();
    let row = table.select(&row_sel).next()?;
    let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
    if cells.is_empty() {
        return None;
    }

    let column = |names: &[&str]| column_value(&headers, &cells, names);

    let time = column(&["time"]).unwrap_or_default();
    Some(LeaderboardEntry {
        rank: column(&["rank"])
            .and_then(|rank| leading_number(&rank))
            .map(|rank| rank as u32),
        name: column(&["name", "athlete"]).unwrap_or_default(),
        speed: column(&["speed", "pace"]).unwrap_or_default(),
        power: column(&["power"]).unwrap_or_default(),
        vam: column(&["vam"]).and_then(|vam| leading_number(&vam)),
        time_seconds: parse_duration(&time),
        time,
    })
}

fn column_value(headers: &[String], cells: &[String], names: &[&str]) -> Option<String> {
    let index = headers
        .iter()
        .position(|header| names.iter().any(|name| header.contains(name)))?;
    cells.get(index).cloned()
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    doc.select(&sel)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First number in `text`, ignoring thousands separators.
pub fn leading_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let bytes = cleaned.as_bytes();
    let start = (0..bytes.len()).find(|&i| {
        bytes[i].is_ascii_digit()
            || (bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    })?;
    let end = (start + 1..bytes.len())
        .find(|&i| !(bytes[i].is_ascii_digit() || bytes[i] == b'.'))
        .unwrap_or(bytes.len());
    cleaned[start..end].parse().ok()
}

/// Length in meters from text such as `1.2km`, `3,281 ft` or `450 m`.
pub fn parse_length(text: &str) -> Option<f64> {
    let value = leading_number(text)?;
    let unit = text.to_lowercase();
    let factor = if unit.contains("km") {
        1000.0
    } else if unit.contains("mi") {
        1609.344
    } else if unit.contains("ft") {
        0.3048
    } else {
        1.0
    };
    Some(value * factor)
}

/// Seconds from `h:mm:ss`, `mm:ss` or `45s`.
pub fn parse_duration(text: &str) -> Option<u64> {
    let trimmed = text.trim().trim_end_matches('s');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.split(':').try_fold(0u64, |total, part| {
        part.trim().parse::<u64>().ok().map(|n| total * 60 + n)
    })
}

/// Page shows `HC` or `Cat 1`..`Cat 4`; the API scale puts HC at 5 and Cat 4 at 1.
fn parse_climb_category(text: &str) -> Option<u8> {
    if text.to_lowercase().contains("hc") {
        return Some(5);
    }
    match leading_number(text)? as u8 {
        n @ 1..=4 => Some(5 - n),
        _ => None,
    }
}
