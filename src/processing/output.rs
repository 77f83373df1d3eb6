//! Output quality checks. Problems never fail the request; they are collected per row
//! into a leading `Issues` column, which is left out when no row has any.

use crate::processing::TargetResource;
use crate::schema::column::*;
use crate::schema::ColumnFamily;
use crate::spreadsheet::Cell;
use crate::spreadsheet::Row;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::ValidationLimits;
use std::collections::HashSet;

const HEADLINE: &str = "Headline";
const DESCRIPTION: &str = "Description";
const SITELINK: &str = "Sitelink";
const TEXT: &str = "Text";

/// Annotates `sheet` with the issues found for `resource`.
/// Keyword output has no checks and is returned unchanged.
pub fn validate_output(mut sheet: Sheet, resource: TargetResource, limits: &ValidationLimits) -> Sheet {
    let issues: Vec<String> = match resource {
        TargetResource::Ad => {
            let headlines = ColumnFamily::containing(HEADLINE).resolve(&sheet);
            let descriptions = ColumnFamily::containing(DESCRIPTION).resolve(&sheet);
            sheet
                .rows()
                .map(|row| ad_issues(row, &headlines, &descriptions, limits))
                .collect()
        }
        TargetResource::Campaign => {
            let texts = ColumnFamily::between(SITELINK, TEXT).resolve(&sheet);
            sheet.rows().map(|row| sitelink_issues(row, &texts, limits)).collect()
        }
        TargetResource::Keyword => return sheet,
    };

    let flagged = issues.iter().filter(|issue| !issue.is_empty()).count();
    if flagged > 0 {
        tracing::info!(resource = resource.as_str(), rows = flagged, "output rows with issues");
        sheet.insert_column(0, ISSUES, issues.into_iter().map(Cell::Text).collect());
    }
    sheet
}

/// Non-blank values of the given columns, rendered as text.
fn filled(row: Row<'_>, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .map(|column| row.get(column))
        .filter(|cell| !cell.is_blank())
        .map(|cell| cell.to_string())
        .collect()
}

fn has_duplicates(values: &[String]) -> bool {
    values.iter().collect::<HashSet<_>>().len() != values.len()
}

fn count_issue(kind: &str, count: usize, min: usize, max: usize) -> Option<String> {
    if count < min {
        Some(format!("Minimum {min} {kind} are required, found {count}.\n"))
    } else if count > max {
        Some(format!("Maximum {max} {kind} are allowed, found {count}.\n"))
    } else {
        None
    }
}

fn ad_issues(row: Row<'_>, headlines: &[&str], descriptions: &[&str], limits: &ValidationLimits) -> String {
    let mut issues = String::new();
    let headline_values = filled(row, headlines);
    let description_values = filled(row, descriptions);

    if has_duplicates(&headline_values) {
        issues.push_str("Duplicate headlines found.\n");
    }
    if has_duplicates(&description_values) {
        issues.push_str("Duplicate descriptions found.\n");
    }
    let counts = [
        count_issue("headlines", headline_values.len(), limits.min_headlines, limits.max_headlines),
        count_issue("descriptions", description_values.len(), limits.min_descriptions, limits.max_descriptions),
    ];
    counts.into_iter().flatten().for_each(|issue| issues.push_str(&issue));

    for column in headlines {
        let length = row.get(column).char_len();
        if length > limits.max_headline_length {
            issues.push_str(&format!(
                "Headline length should be less than {} characters, found {length} in column {column}.\n",
                limits.max_headline_length
            ));
        }
    }
    for column in descriptions {
        let length = row.get(column).char_len();
        if length > limits.max_description_length {
            issues.push_str(&format!(
                "Description length should be less than {} characters, found {length} in column {column}.\n",
                limits.max_description_length
            ));
        }
    }
    for column in [PATH_1, PATH_2] {
        let length = row.get(column).char_len();
        if length > limits.max_path_length {
            issues.push_str(&format!(
                "{column} length should be less than {} characters, found {length}.\n",
                limits.max_path_length
            ));
        }
    }
    if row.get(FINAL_URL).is_blank() {
        issues.push_str("Final URL is missing.\n");
    }
    issues
}

fn sitelink_issues(row: Row<'_>, texts: &[&str], limits: &ValidationLimits) -> String {
    let mut issues = String::new();
    for column in texts {
        let text = row.get(column);
        if text.is_blank() {
            continue;
        }
        let final_url = column.replace(TEXT, FINAL_URL);
        if row.get(&final_url).is_blank() {
            issues.push_str(&format!("{final_url} is missing.\n"));
        }
        if text.char_len() > limits.max_sitelink_text_length {
            issues.push_str(&format!(
                "Sitelink text length should be less than {} characters, found {} in column {column}.\n",
                limits.max_sitelink_text_length,
                text.char_len()
            ));
        }
        let description = column.replace(TEXT, DESCRIPTION);
        for line in 1..=2 {
            let length = row.get(&format!("{description} {line}")).char_len();
            if length > limits.max_sitelink_description_length {
                issues.push_str(&format!(
                    "Sitelink description length should be less than {} characters, found {length} in column {description} {line}.\n",
                    limits.max_sitelink_description_length
                ));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    const AD_COLUMNS: [&str; 9] = [
        "Campaign Name",
        "Final URL",
        "Headline 1",
        "Headline 2",
        "Headline 3",
        "Description Line 1",
        "Description Line 2",
        "Path 1",
        "Path 2",
    ];

    fn sheet(columns: &[&str], rows: &[&[&str]]) -> Sheet {
        let mut values = vec![columns.iter().map(|column| Cell::text(*column)).collect::<Vec<_>>()];
        values.extend(rows.iter().map(|row| row.iter().map(|value| Cell::text(*value)).collect()));
        Sheet::from_values(values).unwrap()
    }

    fn ad(headline_1: &str) -> [&str; 9] {
        [
            "c",
            "https://www.example.com",
            headline_1,
            "Headline 2",
            "Headline 3",
            "Description Line 1",
            "Description Line 2",
            "Path 1",
            "Path 2",
        ]
    }

    #[test]
    fn compliant_ads_have_no_issues_column() {
        let ads = sheet(&AD_COLUMNS, &[&ad("Headline 1")]);
        let validated = validate_output(ads.clone(), TargetResource::Ad, &ValidationLimits::default());
        assert_eq!(validated, ads);
        assert!(!validated.has_column("Issues"));
    }

    #[test]
    fn long_headline_is_reported() {
        let long = "H".repeat(31);
        let ads = sheet(&AD_COLUMNS, &[&ad(&long), &ad("Headline 1")]);
        let validated = validate_output(ads, TargetResource::Ad, &ValidationLimits::default());

        assert_eq!(validated.columns()[0], "Issues");
        assert_eq!(
            validated.row(0).unwrap().text("Issues"),
            "Headline length should be less than 30 characters, found 31 in column Headline 1.\n"
        );
        assert_eq!(validated.get(1, "Issues"), Some(&Cell::text("")));
    }

    #[test]
    fn ad_issues_accumulate() {
        let ads = sheet(
            &AD_COLUMNS,
            &[&["c", "", "Same", "Same", "", "One", "", "A very long path 1", "Path 2"]],
        );
        let validated = validate_output(ads, TargetResource::Ad, &ValidationLimits::default());
        assert_eq!(
            validated.row(0).unwrap().text("Issues"),
            "Duplicate headlines found.\n\
             Minimum 3 headlines are required, found 2.\n\
             Minimum 2 descriptions are required, found 1.\n\
             Path 1 length should be less than 15 characters, found 18.\n\
             Final URL is missing.\n"
        );
    }

    #[test]
    fn ad_limits_come_from_criteria() {
        let limits = ValidationLimits {
            max_headlines: 2,
            max_description_length: 5,
            ..ValidationLimits::default()
        };
        let ads = sheet(&AD_COLUMNS, &[&ad("Headline 1")]);
        let validated = validate_output(ads, TargetResource::Ad, &limits);
        assert_eq!(
            validated.row(0).unwrap().text("Issues"),
            "Maximum 2 headlines are allowed, found 3.\n\
             Description length should be less than 5 characters, found 18 in column Description Line 1.\n\
             Description length should be less than 5 characters, found 18 in column Description Line 2.\n"
        );
    }

    #[test]
    fn duplicate_and_excess_descriptions_are_reported() {
        let columns = [
            "Campaign Name",
            "Final URL",
            "Headline 1",
            "Headline 2",
            "Headline 3",
            "Description Line 1",
            "Description Line 2",
            "Description Line 3",
            "Description Line 4",
            "Description Line 5",
        ];
        let ads = sheet(
            &columns,
            &[&["c", "https://www.example.com", "H1", "H2", "H3", "Same", "Same", "D3", "D4", "D5"]],
        );
        let validated = validate_output(ads, TargetResource::Ad, &ValidationLimits::default());
        assert_eq!(
            validated.row(0).unwrap().text("Issues"),
            "Duplicate descriptions found.\n\
             Maximum 4 descriptions are allowed, found 5.\n"
        );
    }

    #[test]
    fn sitelink_issues_are_reported() {
        let columns = [
            "Campaign Name",
            "Sitelink 1 Text",
            "Sitelink 1 Final URL",
            "Sitelink 1 Description 1",
            "Sitelink 1 Description 2",
            "Sitelink 2 Text",
        ];
        let long_description = "D".repeat(36);
        let campaigns = sheet(
            &columns,
            &[
                &["c1", "Book your trip today with us", "", long_description.as_str(), "short", ""],
                &["c2", "Book", "https://www.example.com", "", "", ""],
                &["c3", "", "", "", "", "Timetable"],
            ],
        );
        let validated = validate_output(campaigns, TargetResource::Campaign, &ValidationLimits::default());
        let issues: Vec<String> = validated.rows().map(|row| row.text("Issues")).collect();
        assert_eq!(
            issues,
            vec![
                "Sitelink 1 Final URL is missing.\n\
                 Sitelink text length should be less than 25 characters, found 28 in column Sitelink 1 Text.\n\
                 Sitelink description length should be less than 35 characters, found 36 in column Sitelink 1 Description 1.\n"
                    .to_owned(),
                String::new(),
                "Sitelink 2 Final URL is missing.\n".to_owned(),
            ]
        );
    }

    #[test]
    fn valid_campaigns_are_unchanged() {
        let campaigns = sheet(
            &["Campaign Name", "Sitelink 1 Text", "Sitelink 1 Final URL"],
            &[&["c1", "Book", "https://www.example.com"]],
        );
        let validated = validate_output(campaigns.clone(), TargetResource::Campaign, &ValidationLimits::default());
        assert_eq!(validated, campaigns);
    }

    #[test]
    fn keywords_are_not_validated() {
        let keywords = sheet(&["Keyword", "Final URL"], &[&["k", ""]]);
        let validated = validate_output(keywords.clone(), TargetResource::Keyword, &ValidationLimits::default());
        assert_eq!(validated, keywords);
    }
}
