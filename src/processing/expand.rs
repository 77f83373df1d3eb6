//! Ad and keyword expansion: every new campaign row is matched against the scaffold rows
//! merged with the resource template, and each match yields one row per travel direction.

use crate::error::CampaignSheetError;
use crate::processing::input::validate_language_codes;
use crate::processing::placeholder::*;
use crate::processing::TargetResource;
use crate::schema::column::*;
use crate::schema::ColumnFamily;
use crate::spreadsheet::Cell;
use crate::spreadsheet::Criteria;
use crate::spreadsheet::Row;
use crate::spreadsheet::Sheet;

const HEADLINE: &str = "Headline";
const INCLUDE_LOCATION: &str = "Include Location";
const EXACT: &str = "Exact";
const CAMPAIGN_LEVEL: &str = "Campaign";

/// Positions of the columns the expansion reads or overrides in a merged row.
struct Layout {
    campaign_name: Option<usize>,
    ad_group_name: Option<usize>,
    match_type: Option<usize>,
    keyword: Option<usize>,
    keyword_match_type: Option<usize>,
    negative: Option<usize>,
    level: Option<usize>,
    target_category: Option<usize>,
    final_url: Option<usize>,
    headlines: Vec<usize>,
}

impl Layout {
    fn of(sheet: &Sheet) -> Self {
        Self {
            campaign_name: sheet.column_index(CAMPAIGN_NAME),
            ad_group_name: sheet.column_index(AD_GROUP_NAME),
            match_type: sheet.column_index(MATCH_TYPE),
            keyword: sheet.column_index(KEYWORD),
            keyword_match_type: sheet.column_index(KEYWORD_MATCH_TYPE),
            negative: sheet.column_index(NEGATIVE),
            level: sheet.column_index(LEVEL),
            target_category: sheet.column_index(TARGET_CATEGORY),
            final_url: sheet.column_index(FINAL_URL),
            headlines: ColumnFamily::prefix(HEADLINE)
                .resolve(sheet)
                .into_iter()
                .filter_map(|column| sheet.column_index(column))
                .collect(),
        }
    }
}

/// Expands new campaign rows into ad or keyword rows.
///
/// The scaffold (campaigns joined with ad groups) is merged with the template on
/// `Language Code`, plus `Match Type` for ads when both sides carry it. The result has
/// helper columns removed, duplicates dropped, and is sorted by campaign and ad group name.
pub fn expand_rows(
    scaffold: &Sheet,
    template: &Sheet,
    new_campaign: &Sheet,
    resource: TargetResource,
    criteria: &Criteria,
) -> Result<Sheet, CampaignSheetError> {
    let mut scaffold = scaffold.clone();
    let mut template = template.clone();
    let mut new_campaign = new_campaign.clone();
    scaffold.uppercase_column(LANGUAGE_CODE);
    template.uppercase_column(LANGUAGE_CODE);
    new_campaign.uppercase_column(LANGUAGE_CODE);

    let mut on = vec![LANGUAGE_CODE];
    if resource == TargetResource::Ad && scaffold.has_column(MATCH_TYPE) && template.has_column(MATCH_TYPE) {
        on.push(MATCH_TYPE);
    }
    let mut merged = scaffold.inner_join(&template, &on)?;
    // Rows whose category can never match are gone before coverage is checked.
    merged.retain_rows(fits_real_category);
    validate_language_codes(&new_campaign, &merged, resource.as_str())?;
    if resource == TargetResource::Ad {
        merged.ensure_column(FINAL_URL, Cell::Empty);
    }

    let layout = Layout::of(&merged);
    let include_locations = ColumnFamily::prefix(INCLUDE_LOCATION).resolve(&new_campaign);
    let mut expanded = Sheet::new(merged.columns().to_vec());
    let mut filtered = 0usize;
    let mut dropped = 0usize;

    for new_row in new_campaign.rows() {
        let bindings = CampaignNameBindings::new(new_row, &include_locations);
        let directions = Direction::both(new_row);
        let country = new_row.text(COUNTRY);
        let ticket_price = Some(new_row.get(TICKET_PRICE))
            .filter(|price| !price.is_blank())
            .map(|price| price.to_string());
        let category = new_row.text(CATEGORY);

        for row in merged.rows() {
            if row.get(LANGUAGE_CODE) != new_row.get(LANGUAGE_CODE) {
                continue;
            }
            let resolved = resolved_category(row, &category);
            if !matches_ad_group_category(row, &category) || !category_applies(row.get(CATEGORY), &resolved) {
                filtered += 1;
                continue;
            }
            if resource == TargetResource::Keyword && is_mismatched_keyword(row) {
                dropped += 1;
                tracing::debug!(keyword = %row.get(KEYWORD), "dropped keyword with mismatched match type");
                continue;
            }

            let campaign_name = match row.get(CAMPAIGN_NAME).as_text() {
                Some(template_name) => Some(
                    bindings
                        .with_language(&row.text(LANGUAGE_CODE))
                        .format(template_name)?,
                ),
                None => None,
            };
            let keeps_original = criteria.keeps_original_direction(&row.text(CATEGORY));

            for direction in &directions {
                let mut cells = row.cells().to_vec();
                if let (Some(index), Some(name)) = (layout.campaign_name, &campaign_name) {
                    cells[index] = Cell::text(name.as_str());
                }
                // Runs before the row pass so the canonical stations win in headlines.
                if keeps_original {
                    substitute_stations(&mut cells, &layout.headlines, &directions[0]);
                }
                let row_bindings = RowBindings {
                    country: &country,
                    direction,
                    ticket_price: ticket_price.as_deref(),
                };
                substitute_row(&mut cells, layout.match_type, &row_bindings);
                match resource {
                    TargetResource::Ad => {
                        if let Some(index) = layout.final_url {
                            cells[index] = direction.final_url.clone();
                        }
                    }
                    TargetResource::Keyword => finalize_keyword(&mut cells, &layout),
                    TargetResource::Campaign => {}
                }
                substitute_all(&mut cells, INSERT_CATEGORY, &resolved);
                expanded.push_row(cells)?;
            }
        }
    }
    tracing::debug!(filtered, dropped, "rows skipped during expansion");

    expanded.dedup_rows();
    let mut helpers: Vec<&str> = criteria.helper_columns.iter().map(String::as_str).collect();
    if resource == TargetResource::Keyword {
        helpers.push(KEYWORD_MATCH_TYPE);
    }
    expanded.drop_columns(&helpers);
    expanded.dedup_rows();
    expanded.sort_by_columns(&[CAMPAIGN_NAME, AD_GROUP_NAME]);
    tracing::info!(resource = resource.as_str(), rows = expanded.len(), "expanded rows");
    Ok(expanded)
}

/// Category the row is built for: the scaffold's `Real Category` when set,
/// otherwise the category of the new campaign row.
fn resolved_category(row: Row<'_>, category: &str) -> String {
    let real = row.get(REAL_CATEGORY);
    if real.is_blank() {
        category.to_owned()
    } else {
        real.to_string()
    }
}

/// Template rows with a category only fit scaffold rows of the same `Real Category`.
/// A blank `Real Category` defers the decision to the new campaign row.
fn fits_real_category(row: Row<'_>) -> bool {
    let real = row.get(REAL_CATEGORY);
    real.is_blank() || category_applies(row.get(CATEGORY), &real.to_string())
}

/// Scaffold rows bound to an ad group category only serve new campaigns of that category.
fn matches_ad_group_category(row: Row<'_>, category: &str) -> bool {
    let ad_group_category = row.get(AD_GROUP_CATEGORY);
    ad_group_category.is_blank() || ad_group_category.to_string().eq_ignore_ascii_case(category)
}

/// A blank template category applies to every category.
fn category_applies(template_category: &Cell, category: &str) -> bool {
    template_category.is_blank() || template_category.to_string().eq_ignore_ascii_case(category)
}

/// Positive keywords must use the match type of the ad group they land in.
fn is_mismatched_keyword(row: Row<'_>) -> bool {
    row.get(NEGATIVE).to_flag() == Some(false) && row.get(KEYWORD_MATCH_TYPE) != row.get(MATCH_TYPE)
}

fn finalize_keyword(cells: &mut [Cell], layout: &Layout) {
    let flag = |index: Option<usize>| index.and_then(|index| cells[index].to_flag());
    let is_negative = flag(layout.negative) == Some(true);
    let targets_category = flag(layout.target_category);

    if is_negative {
        if let (Some(match_type), Some(keyword_match_type)) = (layout.match_type, layout.keyword_match_type) {
            cells[match_type] = cells[keyword_match_type].clone();
        }
        let campaign_level = layout
            .level
            .map(|index| cells[index].to_string().contains(CAMPAIGN_LEVEL))
            .unwrap_or(false);
        if campaign_level {
            if let Some(index) = layout.ad_group_name {
                cells[index] = Cell::Empty;
            }
        }
    } else if targets_category == Some(false) {
        let is_exact = layout
            .match_type
            .map(|index| cells[index].as_text() == Some(EXACT))
            .unwrap_or(false);
        if let (true, Some(index)) = (is_exact, layout.keyword) {
            let keyword = cells[index]
                .as_text()
                .map(|keyword| keyword.replace(INSERT_CATEGORY, "").trim().to_owned());
            if let Some(keyword) = keyword {
                cells[index] = Cell::Text(keyword);
            }
        }
    }
}
