//! # Campaign Sheet
//!
//! A rule-based expansion engine that turns a small "new campaign" table of
//! origin/destination station pairs plus reusable templates into fully expanded
//! advertising campaign, ad and keyword tables.
//!
//! ## Features
//!
//! - **Placeholder substitution**: `{INSERT_COUNTRY}`, `{INSERT_STATION_FROM}`,
//!   `{INSERT_TICKET_PRICE}` and friends resolved per row and per travel direction
//! - **Bidirectional expansion**: every station pair yields rows for both directions
//! - **Category and language matching**: templates apply only to the new campaigns they fit
//! - **Input validation**: duplicate and missing mandatory columns reported per table role
//! - **Output validation**: headline, description, path and sitelink rules collected
//!   into a leading `Issues` column
//! - **Configurable vocabulary**: mandatory columns, copied prefixes and limits live in
//!   [`Criteria`], loadable from JSON
//!
//! ## Operations
//!
//! - [`process_campaign_data`]: build campaigns from a campaign template
//! - [`process_data`]: build ads or keywords from a template and a campaigns × ad groups scaffold
//! - [`build_scaffold`]: join campaign and ad group templates into that scaffold
mod error;
mod helpers;
pub mod processing;
pub mod schema;
pub mod spreadsheet;

pub use error::CampaignSheetError;
pub use processing::build_scaffold;
pub use processing::process_campaign_data;
pub use processing::process_data;
pub use processing::ProcessingError;
pub use processing::TargetResource;
pub use spreadsheet::Cell;
pub use spreadsheet::Criteria;
pub use spreadsheet::Sheet;
pub use spreadsheet::SheetValues;
