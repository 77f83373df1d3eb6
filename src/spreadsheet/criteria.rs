use crate::error::CampaignSheetError;
use crate::processing::TargetResource;
use crate::schema::column::*;
use crate::schema::ColumnFamily;
use crate::schema::ColumnType;
use serde::Deserialize;

/// Columns a table role must carry before processing may start.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MandatoryColumns {
    /// Required in the new campaign sheet
    pub new_campaign: Vec<String>,
    /// Required in the template sheet
    pub template: Vec<String>,
}

impl MandatoryColumns {
    fn of(new_campaign: &[&str], template: &[&str]) -> Self {
        Self {
            new_campaign: new_campaign.iter().map(|column| column.to_string()).collect(),
            template: template.iter().map(|column| column.to_string()).collect(),
        }
    }
}

/// A column converted to a fixed type after campaign expansion.
#[derive(Clone, Debug, Deserialize)]
pub struct CoercedColumn {
    pub column: String,
    pub kind: ColumnType,
}

/// Bounds enforced by output validation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub min_headlines: usize,
    pub max_headlines: usize,
    pub min_descriptions: usize,
    pub max_descriptions: usize,
    pub max_headline_length: usize,
    pub max_description_length: usize,
    pub max_path_length: usize,
    pub max_sitelink_text_length: usize,
    pub max_sitelink_description_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_headlines: 3,
            max_headlines: 15,
            min_descriptions: 2,
            max_descriptions: 4,
            max_headline_length: 30,
            max_description_length: 90,
            max_path_length: 15,
            max_sitelink_text_length: 25,
            max_sitelink_description_length: 35,
        }
    }
}

/// Vocabulary and limits that drive processing.
/// Every field has a default, so a configuration file only lists what it overrides.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Criteria {
    /// Mandatory columns when building campaigns
    pub campaign: MandatoryColumns,
    /// Mandatory columns when building ads
    pub ad: MandatoryColumns,
    /// Mandatory columns when building keywords
    pub keyword: MandatoryColumns,
    /// New campaign column prefixes copied verbatim onto campaign rows
    pub copy_prefixes: Vec<String>,
    /// Template categories whose headlines always use the original route direction
    pub original_direction_categories: Vec<String>,
    /// Join and filter columns removed from ad and keyword output
    pub helper_columns: Vec<String>,
    /// Campaign columns converted to a fixed type
    pub coerced_columns: Vec<CoercedColumn>,
    /// Output validation bounds
    pub limits: ValidationLimits,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            campaign: MandatoryColumns::of(
                &[COUNTRY, STATION_FROM, STATION_TO, LANGUAGE_CODE],
                &[CAMPAIGN_NAME, LANGUAGE_CODE],
            ),
            ad: MandatoryColumns::of(
                &[COUNTRY, STATION_FROM, STATION_TO, FINAL_URL_FROM, FINAL_URL_TO, LANGUAGE_CODE, CATEGORY],
                &[
                    LANGUAGE_CODE, CATEGORY,
                    "Headline 1", "Headline 2", "Headline 3",
                    "Description Line 1", "Description Line 2",
                    PATH_1, PATH_2,
                ],
            ),
            keyword: MandatoryColumns::of(
                &[COUNTRY, STATION_FROM, STATION_TO, LANGUAGE_CODE, CATEGORY],
                &[KEYWORD, KEYWORD_MATCH_TYPE, LEVEL, NEGATIVE, LANGUAGE_CODE, CATEGORY],
            ),
            copy_prefixes: ["Exclude Location", "Include Location", "Include Language", "Exclude Language", "Sitelink"]
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            original_direction_categories: vec!["Transfer".to_owned()],
            helper_columns: [LANGUAGE_CODE, CATEGORY, TARGET_CATEGORY, AD_GROUP_CATEGORY, REAL_CATEGORY]
                .iter()
                .map(|column| column.to_string())
                .collect(),
            coerced_columns: vec![
                CoercedColumn { column: SEARCH_NETWORK.to_owned(), kind: ColumnType::Boolean },
                CoercedColumn { column: GOOGLE_SEARCH_NETWORK.to_owned(), kind: ColumnType::Boolean },
                CoercedColumn { column: DEFAULT_MAX_CPC.to_owned(), kind: ColumnType::Double },
            ],
            limits: ValidationLimits::default(),
        }
    }
}

impl Criteria {
    /// Parses criteria from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, CampaignSheetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Mandatory columns for the given target resource.
    pub fn mandatory_columns(&self, resource: TargetResource) -> &MandatoryColumns {
        match resource {
            TargetResource::Campaign => &self.campaign,
            TargetResource::Ad => &self.ad,
            TargetResource::Keyword => &self.keyword,
        }
    }

    /// Column families copied from the new campaign row onto campaign rows.
    pub fn copy_families(&self) -> Vec<ColumnFamily> {
        self.copy_prefixes.iter().map(|prefix| ColumnFamily::prefix(prefix)).collect()
    }

    /// Returns true if headlines of rows in this template category keep the original direction.
    pub fn keeps_original_direction(&self, category: &str) -> bool {
        self.original_direction_categories
            .iter()
            .any(|kept| kept.eq_ignore_ascii_case(category))
    }
}
