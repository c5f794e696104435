// Regional focus: explicit region, explicit global scope, or neither.
//
// Evaluated once per document after region tagging. Any region label makes
// the document regional. Otherwise the literal "global" anywhere in the
// lower-cased text marks it as global, which is excluded from both the
// regional and the unclear counters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionalFocus {
    Regional,
    Global,
    Unclear,
}

/// Decide the focus of one document from its region labels and text.
pub fn determine(regions_found: &[String], text: &str) -> RegionalFocus {
    if !regions_found.is_empty() {
        RegionalFocus::Regional
    } else if text.to_lowercase().contains("global") {
        RegionalFocus::Global
    } else {
        RegionalFocus::Unclear
    }
}

/// Run-wide focus counters. Global documents are counted separately and
/// never feed `regional` or `unclear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FocusTally {
    pub regional: u32,
    pub unclear: u32,
    pub global: u32,
}

impl FocusTally {
    pub fn record(&mut self, focus: RegionalFocus) {
        match focus {
            RegionalFocus::Regional => self.regional += 1,
            RegionalFocus::Global => self.global += 1,
            RegionalFocus::Unclear => self.unclear += 1,
        }
    }
}
