use serde::{Deserialize, Serialize};

/// One cleaned cost row. `value` is always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub planning_group: String,
    pub superintendence: String,
    pub value: f64,
    /// Display text of every source cell, in header order.
    pub cells: Vec<String>,
}

/// A raw cell as read from a workbook or CSV, before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Dates, durations and spreadsheet error values, kept as display text.
    Other(String),
}

impl RawCell {
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) | Self::Other(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

/// Names of the three columns the pipeline needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    #[serde(default = "default_planning_group")]
    pub planning_group: String,
    #[serde(default = "default_superintendence")]
    pub superintendence: String,
    #[serde(default = "default_value")]
    pub value: String,
}

fn default_planning_group() -> String {
    "Grp.planej.manutenç.".to_string()
}

fn default_superintendence() -> String {
    "Superintendência".to_string()
}

fn default_value() -> String {
    "Valor".to_string()
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            planning_group: default_planning_group(),
            superintendence: default_superintendence(),
            value: default_value(),
        }
    }
}
