use thiserror::Error;

/// Main error type for the campaign sheet processor.
/// Aggregates errors from dependencies and internal modules.
#[derive(Error, Debug)]
pub enum CampaignSheetError {
    #[error("{0}")]
    WithContextError(String),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Schema module errors
    #[error("{0}")]
    ColumnError(#[from] crate::schema::ColumnError),

    // Processing module errors
    #[error("{0}")]
    PlaceholderError(#[from] crate::processing::placeholder::PlaceholderError),

    #[error("{0}")]
    ProcessingError(#[from] crate::processing::ProcessingError),
}

impl CampaignSheetError {
    /// Returns true if the failure stems from the caller's input rather than from this crate.
    /// Every current failure is caused by the supplied sheets or configuration.
    pub fn is_client_error(&self) -> bool {
        match self {
            CampaignSheetError::WithContextError(_)
            | CampaignSheetError::JsonError(_)
            | CampaignSheetError::SpreadsheetError(_)
            | CampaignSheetError::ColumnError(_)
            | CampaignSheetError::PlaceholderError(_)
            | CampaignSheetError::ProcessingError(_) => true,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, CampaignSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| CampaignSheetError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::SpreadsheetError;

    #[test]
    fn error_with_prefix() {
        let result: Result<(), CampaignSheetError> = Err(SpreadsheetError::MissingHeaderRow.into());
        let error = result.with_prefix("new campaign").unwrap_err();
        assert_eq!(error.to_string(), "new campaign: Missing header row");
        assert!(error.is_client_error());
    }
}
