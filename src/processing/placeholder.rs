//! Placeholder substitution for `{INSERT_*}` tokens.
//!
//! Campaign names are resolved strictly: every token must be bound, otherwise
//! the name cannot be built. Row cells are resolved leniently: each pass only
//! replaces the tokens it knows and leaves anything else untouched.

use crate::error::CampaignSheetError;
use crate::schema::column::*;
use crate::spreadsheet::Cell;
use crate::spreadsheet::Row;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const INSERT_COUNTRY: &str = "{INSERT_COUNTRY}";
pub const INSERT_STATION_FROM: &str = "{INSERT_STATION_FROM}";
pub const INSERT_STATION_TO: &str = "{INSERT_STATION_TO}";
pub const INSERT_CRITERION_TYPE: &str = "{INSERT_CRITERION_TYPE}";
pub const INSERT_LANGUAGE_CODE: &str = "{INSERT_LANGUAGE_CODE}";
pub const INSERT_CATEGORY: &str = "{INSERT_CATEGORY}";
pub const INSERT_TICKET_PRICE: &str = "{INSERT_TICKET_PRICE}";
pub const INSERT_TARGET_LOCATION: &str = "{INSERT_TARGET_LOCATION}";

/// Target location used when a new campaign names no included location.
pub const WORLDWIDE: &str = "Worldwide";

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("Hardcode regex pattern"));

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("Unknown placeholder '{{{token}}}' in campaign name '{template}'")]
    UnboundToken { token: String, template: String },
}

/// Values bound to the campaign name tokens of one new campaign row.
#[derive(Clone, Debug)]
pub struct CampaignNameBindings {
    pub country: String,
    pub station_from: String,
    pub station_to: String,
    pub category: String,
    pub language_code: String,
    pub target_location: String,
}

impl CampaignNameBindings {
    /// Binds the new campaign row; `include_locations` are the row's `Include Location` columns.
    pub fn new(row: Row<'_>, include_locations: &[&str]) -> Self {
        Self {
            country: row.text(COUNTRY),
            station_from: row.text(STATION_FROM),
            station_to: row.text(STATION_TO),
            category: row.text(CATEGORY),
            language_code: row.text(LANGUAGE_CODE).to_uppercase(),
            target_location: target_location(row, include_locations),
        }
    }

    /// Same bindings with the language code of the matched template row.
    pub fn with_language(&self, language_code: &str) -> Self {
        Self {
            language_code: language_code.to_uppercase(),
            ..self.clone()
        }
    }

    fn resolve(&self, token: &str) -> Option<&str> {
        match token {
            "INSERT_COUNTRY" => Some(&self.country),
            "INSERT_STATION_FROM" => Some(&self.station_from),
            "INSERT_STATION_TO" => Some(&self.station_to),
            "INSERT_CATEGORY" => Some(&self.category),
            "INSERT_LANGUAGE_CODE" => Some(&self.language_code),
            "INSERT_TARGET_LOCATION" => Some(&self.target_location),
            _ => None,
        }
    }

    /// Resolves every `{TOKEN}` of a campaign name template.
    /// `{{` and `}}` stand for literal braces.
    pub fn format(&self, template: &str) -> Result<String, CampaignSheetError> {
        for captures in TOKEN_PATTERN.captures_iter(template) {
            if let Some(token) = captures.get(1) {
                if self.resolve(token.as_str()).is_none() {
                    Err(PlaceholderError::UnboundToken {
                        token: token.as_str().to_owned(),
                        template: template.to_owned(),
                    })?;
                }
            }
        }
        let resolved = TOKEN_PATTERN.replace_all(template, |captures: &regex::Captures| match captures.get(1) {
            Some(token) => self.resolve(token.as_str()).unwrap_or_default().to_owned(),
            None => captures[0][..1].to_owned(),
        });
        Ok(resolved.into_owned())
    }
}

/// Joins the non-blank `Include Location` values with `-`, or `Worldwide` if there are none.
pub fn target_location(row: Row<'_>, include_locations: &[&str]) -> String {
    let locations: Vec<String> = include_locations
        .iter()
        .map(|column| row.get(column))
        .filter(|cell| !cell.is_blank())
        .map(|cell| cell.to_string())
        .collect();
    if locations.is_empty() {
        WORLDWIDE.to_owned()
    } else {
        locations.join("-")
    }
}

/// One direction of travel for a station pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Direction {
    pub station_from: String,
    pub station_to: String,
    /// Landing page for this direction (ads only)
    pub final_url: Cell,
}

impl Direction {
    /// The route as entered and its reverse, each with its own final URL.
    pub fn both(row: Row<'_>) -> [Direction; 2] {
        let station_from = row.text(STATION_FROM);
        let station_to = row.text(STATION_TO);
        [
            Direction {
                station_from: station_from.clone(),
                station_to: station_to.clone(),
                final_url: row.get(FINAL_URL_FROM).clone(),
            },
            Direction {
                station_from: station_to,
                station_to: station_from,
                final_url: row.get(FINAL_URL_TO).clone(),
            },
        ]
    }
}

/// Replaces `token` with `value` inside a text cell.
pub fn replace_token(cell: &mut Cell, token: &str, value: &str) {
    if let Cell::Text(text) = cell {
        if text.contains(token) {
            *text = text.replace(token, value);
        }
    }
}

/// Replaces the station tokens of the given cells with the stations of `direction`.
pub fn substitute_stations(cells: &mut [Cell], indexes: &[usize], direction: &Direction) {
    for index in indexes {
        replace_token(&mut cells[*index], INSERT_STATION_FROM, &direction.station_from);
        replace_token(&mut cells[*index], INSERT_STATION_TO, &direction.station_to);
    }
}

/// Row-wide values substituted into every text cell of an expanded row.
#[derive(Clone, Debug)]
pub struct RowBindings<'a> {
    pub country: &'a str,
    pub direction: &'a Direction,
    /// None when the new campaign has no ticket price
    pub ticket_price: Option<&'a str>,
}

/// Substitutes country, station, criterion type and ticket price tokens across the whole row,
/// in that order. `match_type` is the position of the row's `Match Type` cell, if any.
///
/// Without a ticket price, a cell mentioning the ticket price token is blanked as a whole.
pub fn substitute_row(cells: &mut [Cell], match_type: Option<usize>, bindings: &RowBindings<'_>) {
    for cell in cells.iter_mut() {
        replace_token(cell, INSERT_COUNTRY, bindings.country);
        replace_token(cell, INSERT_STATION_FROM, &bindings.direction.station_from);
        replace_token(cell, INSERT_STATION_TO, &bindings.direction.station_to);
    }
    if let Some(index) = match_type {
        let criterion = cells[index].to_string();
        for cell in cells.iter_mut() {
            replace_token(cell, INSERT_CRITERION_TYPE, &criterion);
        }
    }
    for cell in cells.iter_mut() {
        match bindings.ticket_price {
            Some(price) => replace_token(cell, INSERT_TICKET_PRICE, price),
            None => {
                if cell.as_text().map(|text| text.contains(INSERT_TICKET_PRICE)).unwrap_or(false) {
                    *cell = Cell::text("");
                }
            }
        }
    }
}

/// Replaces `token` in every text cell of the row.
pub fn substitute_all(cells: &mut [Cell], token: &str, value: &str) {
    for cell in cells.iter_mut() {
        replace_token(cell, token, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::Sheet;

    fn new_campaign(columns: &[&str], values: &[&str]) -> Sheet {
        Sheet::from_values(vec![
            columns.iter().map(|value| Cell::text(*value)).collect(),
            values.iter().map(|value| Cell::text(*value)).collect(),
        ])
        .unwrap()
    }

    #[test]
    fn campaign_name_format() {
        let sheet = new_campaign(
            &["Country", "Station From", "Station To", "Category", "Language Code", "Include Location 1", "Include Location 2"],
            &["India", "Delhi", "Mumbai", "Bus", "en", "Delhi", "Agra"],
        );
        let bindings = CampaignNameBindings::new(sheet.row(0).unwrap(), &["Include Location 1", "Include Location 2"]);
        let name = bindings
            .format("{INSERT_COUNTRY} - {INSERT_STATION_FROM} - {INSERT_STATION_TO} | {INSERT_CATEGORY} | {INSERT_LANGUAGE_CODE} | {INSERT_TARGET_LOCATION}")
            .unwrap();
        assert_eq!(name, "India - Delhi - Mumbai | Bus | EN | Delhi-Agra");
        assert_eq!(bindings.with_language("de").format("{INSERT_LANGUAGE_CODE}").unwrap(), "DE");
    }

    #[test]
    fn campaign_name_unbound_token() {
        let sheet = new_campaign(&["Country"], &["India"]);
        let bindings = CampaignNameBindings::new(sheet.row(0).unwrap(), &[]);
        let error = bindings.format("{INSERT_COUNTRY} {INSERT_CRITERION_TYPE}").unwrap_err();
        assert!(error.to_string().contains("{INSERT_CRITERION_TYPE}"));
    }

    #[test]
    fn campaign_name_doubled_braces_are_literal() {
        let sheet = new_campaign(&["Country"], &["India"]);
        let bindings = CampaignNameBindings::new(sheet.row(0).unwrap(), &[]);
        assert_eq!(
            bindings.format("{{INSERT_COUNTRY}} {INSERT_COUNTRY}").unwrap(),
            "{INSERT_COUNTRY} India"
        );
        assert_eq!(bindings.format("{{{INSERT_COUNTRY}}}").unwrap(), "{India}");
        assert_eq!(bindings.format("{{UNKNOWN}}").unwrap(), "{UNKNOWN}");
    }

    #[test]
    fn target_location_defaults_to_worldwide() {
        let sheet = new_campaign(&["Include Location 1", "Include Location 2"], &["", ""]);
        assert_eq!(target_location(sheet.row(0).unwrap(), &["Include Location 1", "Include Location 2"]), WORLDWIDE);
        assert_eq!(target_location(sheet.row(0).unwrap(), &[]), WORLDWIDE);
    }

    #[test]
    fn directions_swap_stations_and_urls() {
        let sheet = new_campaign(
            &["Station From", "Station To", "Final Url From", "Final Url To"],
            &["A", "B", "https://a", "https://b"],
        );
        let [forward, backward] = Direction::both(sheet.row(0).unwrap());
        assert_eq!((forward.station_from.as_str(), forward.station_to.as_str()), ("A", "B"));
        assert_eq!((backward.station_from.as_str(), backward.station_to.as_str()), ("B", "A"));
        assert_eq!(forward.final_url, Cell::text("https://a"));
        assert_eq!(backward.final_url, Cell::text("https://b"));
    }

    #[test]
    fn row_substitution() {
        let direction = Direction {
            station_from: "B".to_owned(),
            station_to: "A".to_owned(),
            final_url: Cell::Empty,
        };
        let mut cells = vec![
            Cell::text("{INSERT_STATION_FROM} - {INSERT_STATION_TO}"),
            Cell::text("Exact"),
            Cell::text("{INSERT_COUNTRY} {INSERT_CRITERION_TYPE}"),
            Cell::text("From {INSERT_TICKET_PRICE} EUR"),
            Cell::Number(1.0),
            Cell::text("{INSERT_UNKNOWN}"),
        ];
        let bindings = RowBindings {
            country: "India",
            direction: &direction,
            ticket_price: Some("10.5"),
        };
        substitute_row(&mut cells, Some(1), &bindings);
        assert_eq!(
            cells,
            vec![
                Cell::text("B - A"),
                Cell::text("Exact"),
                Cell::text("India Exact"),
                Cell::text("From 10.5 EUR"),
                Cell::Number(1.0),
                Cell::text("{INSERT_UNKNOWN}"),
            ]
        );
    }

    #[test]
    fn row_substitution_blanks_ticket_price_cells() {
        let direction = Direction {
            station_from: "A".to_owned(),
            station_to: "B".to_owned(),
            final_url: Cell::Empty,
        };
        let mut cells = vec![Cell::text("Tickets from {INSERT_TICKET_PRICE}!"), Cell::text("Book now")];
        let bindings = RowBindings {
            country: "India",
            direction: &direction,
            ticket_price: None,
        };
        substitute_row(&mut cells, None, &bindings);
        assert_eq!(cells, vec![Cell::text(""), Cell::text("Book now")]);
    }
}
