//! Supply report kinds and output naming.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which supply report sheet a submission converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyKind {
    /// Summary sheet ("갑지"): headed table keyed by the receiving pharmacy.
    Gapji,
    /// Detail sheet ("을지"): headerless line items.
    Eulji,
}

impl SupplyKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Gapji => "갑지",
            Self::Eulji => "을지",
        }
    }

    /// Number of lines preceding the data in a pasted report.
    ///
    /// The 갑지 header row is the line right after its preamble.
    pub const fn preamble_lines(&self) -> usize {
        match self {
            Self::Gapji => 2,
            Self::Eulji => 3,
        }
    }
}

impl fmt::Display for SupplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shipment or return, selected by the supply kind code column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyDirection {
    /// Code "1" ("출고").
    Outbound,
    /// Code "2" ("반품").
    Return,
}

impl SupplyDirection {
    pub const ALL: [SupplyDirection; 2] = [Self::Outbound, Self::Return];

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Outbound => "1",
            Self::Return => "2",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Outbound => "출고",
            Self::Return => "반품",
        }
    }

    /// Map a supply kind code cell to a direction.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Outbound),
            "2" => Some(Self::Return),
            _ => None,
        }
    }
}

impl fmt::Display for SupplyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// File name of a generated supply workbook, e.g.
/// `20240131_S01_공급내역보고_갑지_S001-출고.xlsx`.
pub fn supply_output_name(report_date: &str, kind: SupplyKind, direction: SupplyDirection) -> String {
    format!(
        "{report_date}_S01_공급내역보고_{}_S001-{}.xlsx",
        kind.label(),
        direction.label()
    )
}

/// File name of the template workbook for a supply report.
pub fn supply_template_name(kind: SupplyKind, direction: SupplyDirection) -> String {
    format!(
        "공급내역보고_{}_S001-{}.xlsx",
        kind.label(),
        direction.label()
    )
}
