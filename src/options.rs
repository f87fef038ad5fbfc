//! User-editable panel options.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopologyError};

/// Options edited by the dashboard user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    /// Character splitting series names into path segments.
    pub separator: String,
    /// Show the legend column.
    pub show_legend: bool,
    /// Separator-joined column headers; empty for no header row.
    pub headers: String,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            separator: "|".to_string(),
            show_legend: true,
            headers: String::new(),
        }
    }
}

impl PanelOptions {
    /// Decode and validate options from the host's JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.separator_char()?;
        Ok(options)
    }

    /// The separator as a single character.
    pub fn separator_char(&self) -> Result<char> {
        let mut chars = self.separator.chars();
        match (chars.next(), chars.next()) {
            (Some(separator), None) => Ok(separator),
            _ => Err(TopologyError::InvalidSeparator(self.separator.clone())),
        }
    }

    /// Header labels, or `None` when no header row should be drawn.
    pub fn header_labels(&self) -> Option<Vec<String>> {
        if self.headers.is_empty() {
            return None;
        }
        let separator = self.separator_char().ok()?;
        Some(self.headers.split(separator).map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let options = PanelOptions::from_json(r#"{"show_legend": false}"#).unwrap();
        assert_eq!(options.separator, "|");
        assert!(!options.show_legend);
        assert_eq!(options.header_labels(), None);
    }

    #[test]
    fn headers_split_on_separator() {
        let options = PanelOptions::from_json(r#"{"separator": "/", "headers": "Site/Rack/Host"}"#)
            .unwrap();
        assert_eq!(
            options.header_labels().unwrap(),
            ["Site", "Rack", "Host"].map(String::from)
        );
    }

    #[test]
    fn rejects_multi_character_separator() {
        let err = PanelOptions::from_json(r#"{"separator": "::"}"#).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidSeparator(_)));
        assert!(PanelOptions::from_json("{").is_err());
    }
}
