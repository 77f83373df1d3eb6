use crate::error::CampaignSheetError;
use crate::helpers::string::quoted_list;
use crate::processing::ProcessingError;
use crate::schema::column::LANGUAGE_CODE;
use crate::spreadsheet::Sheet;
use std::collections::HashSet;

/// Checks a sheet for repeated column names and missing mandatory columns.
/// Returns an empty string when the sheet is usable, otherwise one paragraph per problem
/// naming the table role.
pub fn validate_input<S: AsRef<str>>(sheet: &Sheet, mandatory_columns: &[S], name: &str) -> String {
    let mut message = String::new();
    if !sheet.duplicate_columns().is_empty() {
        message.push_str(&format!(
            "Duplicate columns found in the {name} data.\nPlease provide unique column names.\n"
        ));
    }
    if !mandatory_columns.iter().all(|column| sheet.has_column(column.as_ref())) {
        message.push_str(&format!(
            "Mandatory columns missing in the {name} data.\nPlease provide the following columns: {}\n",
            quoted_list(mandatory_columns)
        ));
    }
    message
}

/// Fails when the new campaign sheet uses a language code the template sheet has no rows for.
/// Both sheets must already carry uppercased codes.
pub fn validate_language_codes(new_campaign: &Sheet, template: &Sheet, table_name: &str) -> Result<(), CampaignSheetError> {
    let valid: HashSet<String> = template.rows().map(|row| row.text(LANGUAGE_CODE)).collect();
    let mut missing = Vec::<String>::new();
    for row in new_campaign.rows() {
        let code = row.text(LANGUAGE_CODE);
        if !valid.contains(&code) && !missing.contains(&code) {
            missing.push(code);
        }
    }
    if !missing.is_empty() {
        tracing::warn!(table = table_name, codes = ?missing, "language codes without template rows");
        Err(ProcessingError::MissingLanguageCodes {
            table: table_name.to_owned(),
            codes: quoted_list(&missing),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::Cell;

    const MANDATORY: [&str; 3] = ["Country", "Station From", "Station To"];

    fn sheet(values: &[&[&str]]) -> Sheet {
        Sheet::from_values(
            values
                .iter()
                .map(|row| row.iter().map(|value| Cell::text(*value)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn validate_input_accepts_complete_sheet() {
        let sheet = sheet(&[&["Country", "Station From", "Station To"], &["USA", "A", "B"], &["USA", "B", "A"]]);
        assert_eq!(validate_input(&sheet, &MANDATORY, "name"), "");
    }

    #[test]
    fn validate_input_reports_missing_columns() {
        let sheet = sheet(&[&["Country", "Station From"], &["USA", "A"]]);
        assert_eq!(
            validate_input(&sheet, &MANDATORY, "name"),
            "Mandatory columns missing in the name data.\nPlease provide the following columns: ['Country', 'Station From', 'Station To']\n"
        );
    }

    #[test]
    fn validate_input_reports_duplicate_columns() {
        let sheet = sheet(&[&["Country", "Station From", "Station To", "Station To"], &["USA", "A", "B", "B"]]);
        assert_eq!(
            validate_input(&sheet, &MANDATORY, "name"),
            "Duplicate columns found in the name data.\nPlease provide unique column names.\n"
        );
    }

    #[test]
    fn validate_input_concatenates_problems() {
        let sheet = sheet(&[&["Country", "Country"], &["USA", "USA"]]);
        let message = validate_input(&sheet, &MANDATORY, "new campaign");
        assert!(message.starts_with("Duplicate columns found in the new campaign data.\n"));
        assert!(message.contains("\nMandatory columns missing in the new campaign data.\n"));
        assert!(message.ends_with('\n'));
    }

    #[test]
    fn validate_language_codes_lists_missing_codes() {
        let template = sheet(&[&["Language Code"], &["EN"], &["DE"]]);
        let new_campaign = sheet(&[&["Language Code"], &["EN"], &["FR"], &["FR"], &["IT"]]);
        let error = validate_language_codes(&new_campaign, &template, "ad").unwrap_err();
        let message = error.to_string();
        assert!(message.contains("'ad'"));
        assert!(message.contains("['FR', 'IT']"));

        let new_campaign = sheet(&[&["Language Code"], &["DE"]]);
        assert!(validate_language_codes(&new_campaign, &template, "ad").is_ok());
    }
}
