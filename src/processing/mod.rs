//! # Processing Module
//!
//! Request-level operations of the campaign builder: input validation, campaign,
//! ad and keyword expansion, and output quality checks. Every operation works on
//! fully loaded sheets and is deterministic for identical inputs.
use crate::error::CampaignSheetError;
use crate::error::ResultMessage;
use crate::schema::column::*;
use crate::spreadsheet::Criteria;
use crate::spreadsheet::MandatoryColumns;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::SheetValues;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub mod campaign;
pub mod expand;
pub mod input;
pub mod output;
pub mod placeholder;

/// Errors that stop a request before any output is produced.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// A sheet lacks a header row or any data row
    #[error("Both template and new campaign data should have at least two rows (header and data).")]
    NotEnoughRows,

    /// The campaigns × ad groups scaffold lacks a header row or any data row
    #[error("Campaigns and ad groups scaffold should have at least two rows (header and data).")]
    EmptyScaffold,

    /// Schema problems reported by input validation
    #[error("{0}")]
    InvalidInput(String),

    /// New campaign rows reference language codes the templates do not cover
    #[error(
        "Table: '{table}' currently does NOT have any data for the following language codes: {codes}. \
         Please provide data for the above language codes or choose a different language code."
    )]
    MissingLanguageCodes { table: String, codes: String },

    /// Unrecognized target resource name
    #[error("Unknown target resource '{0}', expected one of 'campaign', 'ad', 'keyword'")]
    UnknownResource(String),
}

/// The kind of table being built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetResource {
    Campaign,
    Ad,
    Keyword,
}

impl TargetResource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetResource::Campaign => "campaign",
            TargetResource::Ad => "ad",
            TargetResource::Keyword => "keyword",
        }
    }
}

impl Display for TargetResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetResource {
    type Err = CampaignSheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "campaign" => Ok(TargetResource::Campaign),
            "ad" => Ok(TargetResource::Ad),
            "keyword" => Ok(TargetResource::Keyword),
            _ => Err(ProcessingError::UnknownResource(s.to_owned()).into()),
        }
    }
}

/// Builds the campaign table from a campaign template and a new campaign table.
pub fn process_campaign_data(
    template_values: &SheetValues,
    new_campaign_values: &SheetValues,
    criteria: &Criteria,
) -> Result<SheetValues, CampaignSheetError> {
    let (template, new_campaign) = load_inputs(
        template_values,
        new_campaign_values,
        &criteria.campaign,
        TargetResource::Campaign,
    )?;
    let campaigns = campaign::expand_campaigns(&template, &new_campaign, criteria)?;
    let validated = output::validate_output(campaigns, TargetResource::Campaign, &criteria.limits);
    Ok(SheetValues::from(&validated))
}

/// Builds the ad or keyword table from a resource template, a new campaign table and the
/// campaigns × ad groups scaffold (see [`build_scaffold`]). Campaign requests ignore the scaffold.
pub fn process_data(
    template_values: &SheetValues,
    new_campaign_values: &SheetValues,
    scaffold_values: &SheetValues,
    resource: TargetResource,
    criteria: &Criteria,
) -> Result<SheetValues, CampaignSheetError> {
    if resource == TargetResource::Campaign {
        return process_campaign_data(template_values, new_campaign_values, criteria);
    }
    let (template, new_campaign) = load_inputs(
        template_values,
        new_campaign_values,
        criteria.mandatory_columns(resource),
        resource,
    )?;
    if scaffold_values.len() < 2 {
        Err(ProcessingError::EmptyScaffold)?;
    }
    let scaffold = Sheet::from_values(scaffold_values.values.clone()).with_prefix("scaffold")?;
    let expanded = expand::expand_rows(&scaffold, &template, &new_campaign, resource, criteria)?;
    let validated = output::validate_output(expanded, resource, &criteria.limits);
    Ok(SheetValues::from(&validated))
}

/// Joins the campaign name templates with the ad group templates of the same language.
///
/// Only `Campaign Name` is taken from the campaigns template; every ad group column is kept.
pub fn build_scaffold(campaigns_template: &Sheet, ad_groups_template: &Sheet) -> Result<Sheet, CampaignSheetError> {
    for (sheet, name) in [(campaigns_template, "campaigns template"), (ad_groups_template, "ad groups template")] {
        let message = input::validate_input(sheet, &[LANGUAGE_CODE], name);
        if !message.is_empty() {
            Err(ProcessingError::InvalidInput(message))?;
        }
    }
    let mut campaigns = Sheet::new(vec![CAMPAIGN_NAME.to_owned(), LANGUAGE_CODE.to_owned()]);
    for row in campaigns_template.rows() {
        campaigns.push_row(vec![row.get(CAMPAIGN_NAME).clone(), row.get(LANGUAGE_CODE).clone()])?;
    }
    let mut ad_groups = ad_groups_template.clone();
    ad_groups.drop_columns(&[CAMPAIGN_NAME]);
    campaigns.uppercase_column(LANGUAGE_CODE);
    ad_groups.uppercase_column(LANGUAGE_CODE);

    let scaffold = campaigns.inner_join(&ad_groups, &[LANGUAGE_CODE])?;
    tracing::debug!(rows = scaffold.len(), "built campaigns and ad groups scaffold");
    Ok(scaffold)
}

/// Checks row counts, builds both sheets and runs input validation on them.
fn load_inputs(
    template_values: &SheetValues,
    new_campaign_values: &SheetValues,
    mandatory: &MandatoryColumns,
    resource: TargetResource,
) -> Result<(Sheet, Sheet), CampaignSheetError> {
    if template_values.len() < 2 || new_campaign_values.len() < 2 {
        Err(ProcessingError::NotEnoughRows)?;
    }
    let template_role = format!("{resource} template");
    let template = Sheet::from_values(template_values.values.clone()).with_prefix(&template_role)?;
    let new_campaign = Sheet::from_values(new_campaign_values.values.clone()).with_prefix("new campaign")?;

    let mut message = input::validate_input(&template, &mandatory.template, &template_role);
    message.push_str(&input::validate_input(&new_campaign, &mandatory.new_campaign, "new campaign"));
    if !message.is_empty() {
        tracing::warn!(resource = resource.as_str(), "input validation failed");
        Err(ProcessingError::InvalidInput(message))?;
    }
    Ok((template, new_campaign))
}
