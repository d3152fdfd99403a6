//! 갑지/을지 supply report conversion.
//!
//! A pasted report is cleaned, ordered by its serial column and split by the
//! supply kind code into a shipment report and a return report. A direction
//! without rows produces no report.

use chrono::{NaiveDate, TimeDelta};
use pharm_ingest::{DelimitedOptions, column_values, has_column, headerless_column_name, read_delimited};
use pharm_model::columns::{
    SUPPLY_BUSINESS_NUMBER, SUPPLY_COLUMN_ALIASES, SUPPLY_INSTITUTION_CODE, SUPPLY_KIND,
    SUPPLY_SERIAL,
};
use pharm_model::{
    CellValue, SupplyDirection, SupplyKind, parse_f64, supply_output_name, supply_template_name,
};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result, TableRole};
use crate::frame_ops::{stable_order, take_rows};
use crate::registry::PharmacyRegistry;

/// Columns that must be present in 갑지 data.
const GAPJI_REQUIRED: [&str; 4] = [
    SUPPLY_BUSINESS_NUMBER,
    SUPPLY_INSTITUTION_CODE,
    SUPPLY_SERIAL,
    SUPPLY_KIND,
];

/// 을지 column positions (0-based).
const EULJI_SERIAL: usize = 0;
const EULJI_QUANTITY: usize = 4;
const EULJI_KIND: usize = 5;

/// One output workbook's worth of rows.
///
/// Text columns are nullable strings; 을지 numeric columns are `Float64`.
#[derive(Debug, Clone)]
pub struct SupplyReport {
    pub kind: SupplyKind,
    pub direction: SupplyDirection,
    pub file_name: String,
    pub frame: DataFrame,
}

impl SupplyReport {
    /// Template workbook this report takes its header row from.
    pub fn template_name(&self) -> String {
        supply_template_name(self.kind, self.direction)
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Report date stamp (`YYYYMMDD`): `offset_days` before `today`.
pub fn report_date(today: NaiveDate, offset_days: i64) -> String {
    (today - TimeDelta::days(offset_days))
        .format("%Y%m%d")
        .to_string()
}

fn require_lines(text: &str, kind: SupplyKind) -> Result<()> {
    let required = kind.preamble_lines() + 1;
    let found = text.lines().count();
    if found < required {
        return Err(CoreError::InsufficientLines {
            kind,
            required,
            found,
        });
    }
    Ok(())
}

fn apply_aliases(df: &mut DataFrame) -> Result<()> {
    for (alias, canonical) in SUPPLY_COLUMN_ALIASES {
        if has_column(df, alias) && !has_column(df, canonical) {
            df.rename(alias, canonical.into())?;
            debug!(alias, canonical, "renamed supply column");
        }
    }
    Ok(())
}

fn replace_institution_codes(df: &mut DataFrame, registry: &PharmacyRegistry) -> Result<()> {
    let numbers = column_values(df, SUPPLY_BUSINESS_NUMBER).unwrap_or_default();
    let codes = column_values(df, SUPPLY_INSTITUTION_CODE).unwrap_or_default();

    let mut replaced = 0usize;
    let updated: Vec<Option<String>> = numbers
        .iter()
        .zip(codes)
        .map(|(number, code)| {
            let registered = number
                .as_deref()
                .and_then(|number| registry.lookup(number.trim()));
            match registered {
                Some(registered) => {
                    replaced += 1;
                    Some(registered.to_string())
                }
                None => code,
            }
        })
        .collect();

    df.with_column(Series::new(SUPPLY_INSTITUTION_CODE.into(), updated))?;
    debug!(replaced, rows = df.height(), "applied registry institution codes");
    Ok(())
}

fn drop_unnamed(df: &DataFrame) -> Result<DataFrame> {
    let names = df.get_column_names();
    let keep: Vec<&str> = names
        .iter()
        .map(|name| name.as_str())
        .filter(|name| !name.starts_with("Unnamed"))
        .collect();
    Ok(df.select(keep)?)
}

/// Split an ordered frame into one report per direction present.
fn split_by_direction(
    df: &DataFrame,
    kind_column: &str,
    kind: SupplyKind,
    date: &str,
) -> Result<Vec<SupplyReport>> {
    let codes = column_values(df, kind_column).unwrap_or_default();
    let directions: Vec<Option<SupplyDirection>> = codes
        .iter()
        .map(|code| code.as_deref().and_then(SupplyDirection::from_code))
        .collect();

    let unrecognized = directions.iter().filter(|d| d.is_none()).count();
    if unrecognized > 0 {
        warn!(%kind, rows = unrecognized, "rows with an unknown supply kind code were left out");
    }

    let mut reports = Vec::new();
    for direction in SupplyDirection::ALL {
        let indices: Vec<usize> = directions
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == Some(direction))
            .map(|(idx, _)| idx)
            .collect();
        if indices.is_empty() {
            debug!(%kind, %direction, "no rows for direction");
            continue;
        }
        reports.push(SupplyReport {
            kind,
            direction,
            file_name: supply_output_name(date, kind, direction),
            frame: take_rows(df, &indices)?,
        });
    }
    Ok(reports)
}

/// Convert pasted 갑지 data.
///
/// Two preamble lines precede the header. Institution codes of registered
/// business numbers are replaced by the registry's code.
pub fn convert_gapji(
    text: &str,
    registry: &PharmacyRegistry,
    date: &str,
) -> Result<Vec<SupplyReport>> {
    let kind = SupplyKind::Gapji;
    require_lines(text, kind)?;

    let options = DelimitedOptions::default().with_skip_lines(kind.preamble_lines());
    let mut df = read_delimited(text, &options)?;
    apply_aliases(&mut df)?;
    for column in GAPJI_REQUIRED {
        if !has_column(&df, column) {
            return Err(CoreError::missing_column(TableRole::Supply(kind), column));
        }
    }

    replace_institution_codes(&mut df, registry)?;

    let serials: Vec<CellValue> = column_values(&df, SUPPLY_SERIAL)
        .unwrap_or_default()
        .iter()
        .map(|value| CellValue::coerce(value.as_deref()))
        .collect();
    let df = take_rows(&df, &stable_order(&serials))?;
    let df = drop_unnamed(&df)?;

    let reports = split_by_direction(&df, SUPPLY_KIND, kind, date)?;
    info!(%kind, rows = df.height(), reports = reports.len(), "supply data converted");
    Ok(reports)
}

/// Convert pasted 을지 data.
///
/// Three preamble lines precede headerless rows. The serial (column 1) and
/// quantity (column 5) become numbers, invalid values blank; column 6 is the
/// supply kind code and is removed from the output.
pub fn convert_eulji(text: &str, date: &str) -> Result<Vec<SupplyReport>> {
    let kind = SupplyKind::Eulji;
    require_lines(text, kind)?;

    let options = DelimitedOptions::default()
        .with_skip_lines(kind.preamble_lines())
        .headerless();
    let mut df = read_delimited(text, &options)?;
    if df.width() <= EULJI_KIND {
        return Err(CoreError::missing_column(
            TableRole::Supply(kind),
            &headerless_column_name(EULJI_KIND),
        ));
    }

    let mut serials = Vec::new();
    for position in [EULJI_SERIAL, EULJI_QUANTITY] {
        let name = headerless_column_name(position);
        let raw = column_values(&df, &name).unwrap_or_default();
        let values: Vec<Option<f64>> = raw
            .iter()
            .map(|value| value.as_deref().and_then(|v| parse_f64(v.trim())))
            .collect();
        let invalid = raw
            .iter()
            .zip(&values)
            .filter(|(raw, parsed)| raw.is_some() && parsed.is_none())
            .count();
        if invalid > 0 {
            warn!(column = %name, cells = invalid, "non-numeric cells left blank");
        }
        if position == EULJI_SERIAL {
            serials = values
                .iter()
                .map(|value| value.map_or(CellValue::Missing, CellValue::Number))
                .collect();
        }
        df.with_column(Series::new(name.as_str().into(), values).into_column())?;
    }

    let df = take_rows(&df, &stable_order(&serials))?;
    let kind_column = headerless_column_name(EULJI_KIND);
    let reports = split_by_direction(&df, &kind_column, kind, date)?
        .into_iter()
        .map(|mut report| -> Result<SupplyReport> {
            report.frame = report.frame.drop(&kind_column)?;
            Ok(report)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(%kind, rows = df.height(), reports = reports.len(), "supply data converted");
    Ok(reports)
}
