use serde::{Deserialize, Serialize};

const DEFAULT_INDENTATION_WIDTH: f32 = 50.;

fn default_indentation_width() -> f32 {
    DEFAULT_INDENTATION_WIDTH
}

/// Non-positive or non-finite widths fall back to the default.
pub(crate) fn checked_indentation_width(indentation_width: f32) -> f32 {
    if indentation_width.is_finite() && indentation_width > 0. {
        indentation_width
    } else {
        DEFAULT_INDENTATION_WIDTH
    }
}

/// Presentation and editing options shared by the drag session and the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    /// Pixels per depth level. Also converts horizontal drag distance into depth.
    #[serde(default = "default_indentation_width")]
    pub indentation_width: f32,
    /// Rows with children get a collapse toggle.
    #[serde(default)]
    pub collapsible: bool,
    #[serde(default)]
    pub removable: bool,
    #[serde(default)]
    pub show_drop_indicator: bool,
    #[serde(default)]
    pub allow_nested_item_addition: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            indentation_width: DEFAULT_INDENTATION_WIDTH,
            collapsible: false,
            removable: false,
            show_drop_indicator: false,
            allow_nested_item_addition: false,
        }
    }
}

impl TreeConfig {
    /// Non-positive or non-finite widths fall back to the default.
    pub fn indentation_width(mut self, indentation_width: f32) -> Self {
        self.indentation_width = checked_indentation_width(indentation_width);
        self
    }

    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    pub fn removable(mut self, removable: bool) -> Self {
        self.removable = removable;
        self
    }

    pub fn show_drop_indicator(mut self, show_drop_indicator: bool) -> Self {
        self.show_drop_indicator = show_drop_indicator;
        self
    }

    pub fn allow_nested_item_addition(mut self, allow: bool) -> Self {
        self.allow_nested_item_addition = allow;
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
