//! Campaign expansion: one campaign row per (new campaign row, campaign template row)
//! pair sharing a language code.

use crate::error::CampaignSheetError;
use crate::processing::input::validate_language_codes;
use crate::processing::placeholder::CampaignNameBindings;
use crate::schema::column::*;
use crate::schema::family::resolve_any;
use crate::schema::ColumnFamily;
use crate::spreadsheet::Cell;
use crate::spreadsheet::Criteria;
use crate::spreadsheet::Sheet;

const INCLUDE_LOCATION: &str = "Include Location";

/// Builds the campaign sheet from campaign templates and new campaign rows.
///
/// The output has the template columns followed by the new campaign columns matching
/// the copy prefixes (locations, languages, sitelinks), copied verbatim.
pub fn expand_campaigns(template: &Sheet, new_campaign: &Sheet, criteria: &Criteria) -> Result<Sheet, CampaignSheetError> {
    let mut template = template.clone();
    let mut new_campaign = new_campaign.clone();
    template.uppercase_column(LANGUAGE_CODE);
    new_campaign.uppercase_column(LANGUAGE_CODE);
    validate_language_codes(&new_campaign, &template, "Campaigns")?;

    let include_locations = ColumnFamily::prefix(INCLUDE_LOCATION).resolve(&new_campaign);
    let copied = resolve_any(&criteria.copy_families(), &new_campaign);
    let mut columns = template.columns().to_vec();
    let mut copies = Vec::<(usize, usize)>::new();
    for (source, column) in new_campaign.columns().iter().enumerate() {
        if !copied.contains(&column.as_str()) {
            continue;
        }
        let target = match columns.iter().position(|name| name == column) {
            Some(target) => target,
            None => {
                columns.push(column.clone());
                columns.len() - 1
            }
        };
        copies.push((source, target));
    }
    let coerced: Vec<(usize, &str, _)> = criteria
        .coerced_columns
        .iter()
        .filter_map(|coerced| {
            columns
                .iter()
                .position(|name| *name == coerced.column)
                .map(|index| (index, coerced.column.as_str(), coerced.kind))
        })
        .collect();
    let name_index = columns.iter().position(|name| name == CAMPAIGN_NAME);

    let mut campaigns = Sheet::new(columns);
    for new_row in new_campaign.rows() {
        let bindings = CampaignNameBindings::new(new_row, &include_locations);
        for template_row in template.rows() {
            if template_row.get(LANGUAGE_CODE) != new_row.get(LANGUAGE_CODE) {
                continue;
            }
            let mut cells = template_row.cells().to_vec();
            cells.resize(campaigns.columns().len(), Cell::Empty);
            for (source, target) in &copies {
                cells[*target] = new_row.cells()[*source].clone();
            }
            if let Some(index) = name_index {
                let bindings = bindings.with_language(&template_row.text(LANGUAGE_CODE));
                cells[index] = Cell::Text(bindings.format(&cells[index].to_string())?);
            }
            for (index, column, kind) in &coerced {
                cells[*index] = kind.coerce(column, &cells[*index])?;
            }
            campaigns.push_row(cells)?;
        }
    }
    tracing::info!(rows = campaigns.len(), "expanded campaigns");
    Ok(campaigns)
}

/// Applies the configured type coercions to a whole campaign sheet.
/// Coercing an already coerced sheet leaves it unchanged.
pub fn coerce_columns(sheet: &mut Sheet, criteria: &Criteria) -> Result<(), CampaignSheetError> {
    for coerced in &criteria.coerced_columns {
        sheet.map_column(&coerced.column, |cell| coerced.kind.coerce(&coerced.column, cell))?;
    }
    Ok(())
}
