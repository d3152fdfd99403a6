//! Flat-file pharmacy registry.
//!
//! Maps a receiving pharmacy's business registration number to its
//! healthcare institution code. The file is an append-only CSV; updates
//! dedupe on the business number, and the last occurrence wins.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, Result};

/// Fields expected in each pasted registry row.
const PASTE_FIELDS: usize = 3;

/// One registered pharmacy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(rename = "공급받은자사업자번호", default)]
    pub business_number: String,
    #[serde(rename = "공급받는자요양기관코드", default)]
    pub institution_code: String,
    #[serde(rename = "약국명", default)]
    pub pharmacy_name: String,
}

/// What an update changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub submitted: usize,
    /// Entries superseded by a later entry with the same business number.
    pub replaced: usize,
    pub total: usize,
}

/// Headline numbers shown above the update form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySummary {
    /// Distinct non-empty business numbers.
    pub total: usize,
    pub latest: Option<RegistryEntry>,
}

#[derive(Debug, Clone)]
pub struct PharmacyRegistry {
    path: PathBuf,
    entries: Vec<RegistryEntry>,
}

impl PharmacyRegistry {
    /// Open the registry file, creating it with only a header when absent.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            let registry = Self {
                path: path.to_path_buf(),
                entries: Vec::new(),
            };
            registry.save()?;
            info!(path = %path.display(), "created empty pharmacy registry");
            return Ok(registry);
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|error| CoreError::RegistryFormat {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        let mut entries = Vec::new();
        for record in reader.deserialize::<RegistryEntry>() {
            let entry = record.map_err(|error| CoreError::RegistryFormat {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
            entries.push(entry);
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Registered institution code for a business number.
    ///
    /// Returns `None` for unknown numbers and for entries without a code, so
    /// callers keep whatever code they already have.
    pub fn lookup(&self, business_number: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.business_number == business_number)
            .map(|entry| entry.institution_code.as_str())
            .filter(|code| !code.trim().is_empty())
    }

    pub fn summary(&self) -> RegistrySummary {
        let distinct: BTreeSet<&str> = self
            .entries
            .iter()
            .map(|entry| entry.business_number.as_str())
            .filter(|number| !number.is_empty())
            .collect();
        RegistrySummary {
            total: distinct.len(),
            latest: self.entries.last().cloned(),
        }
    }

    /// Parse pasted registry rows: pharmacy name, business number,
    /// institution code, tab-separated, no header.
    pub fn parse_paste(text: &str) -> Result<Vec<RegistryEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(text.trim().as_bytes());
        let mut entries = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|error| CoreError::RegistryFormat {
                path: PathBuf::from("<pasted>"),
                message: error.to_string(),
            })?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            if record.len() < PASTE_FIELDS {
                return Err(CoreError::TooFewFields {
                    line: idx + 1,
                    found: record.len(),
                    required: PASTE_FIELDS,
                });
            }
            entries.push(RegistryEntry {
                pharmacy_name: record[0].trim().to_string(),
                business_number: record[1].trim().to_string(),
                institution_code: record[2].trim().to_string(),
            });
        }
        Ok(entries)
    }

    /// Append entries, then keep only the last entry per business number, at
    /// the position of that last occurrence.
    pub fn merge(&mut self, new_entries: Vec<RegistryEntry>) -> MergeStats {
        let submitted = new_entries.len();
        let before = self.entries.len() + submitted;
        let mut combined = std::mem::take(&mut self.entries);
        combined.extend(new_entries);

        let mut last_seen: BTreeMap<&str, usize> = BTreeMap::new();
        for (idx, entry) in combined.iter().enumerate() {
            last_seen.insert(entry.business_number.as_str(), idx);
        }
        let keep: BTreeSet<usize> = last_seen.into_values().collect();
        self.entries = combined
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| keep.contains(idx))
            .map(|(_, entry)| entry)
            .collect();

        MergeStats {
            submitted,
            replaced: before - self.entries.len(),
            total: self.entries.len(),
        }
    }

    /// Rewrite the registry file (temp file + rename).
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| CoreError::registry_io("create directory", parent, e))?;
        }

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        let header_error = |error: csv::Error| CoreError::RegistryFormat {
            path: self.path.clone(),
            message: error.to_string(),
        };
        writer
            .write_record(pharm_model::columns::REGISTRY_HEADER)
            .map_err(header_error)?;
        for entry in &self.entries {
            writer.serialize(entry).map_err(header_error)?;
        }
        let bytes = writer.into_inner().map_err(|error| CoreError::RegistryFormat {
            path: self.path.clone(),
            message: error.to_string(),
        })?;

        let temp_path = self.path.with_extension("csv.tmp");
        let mut file =
            File::create(&temp_path).map_err(|e| CoreError::registry_io("create", &temp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| CoreError::registry_io("write", &temp_path, e))?;
        file.sync_all()
            .map_err(|e| CoreError::registry_io("sync", &temp_path, e))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| CoreError::registry_io("rename", &self.path, e))?;
        Ok(())
    }

    /// Parse pasted rows, merge them and save.
    pub fn update_from_paste(&mut self, text: &str) -> Result<MergeStats> {
        let entries = Self::parse_paste(text)?;
        let stats = self.merge(entries);
        self.save()?;
        info!(
            path = %self.path.display(),
            submitted = stats.submitted,
            replaced = stats.replaced,
            total = stats.total,
            "pharmacy registry updated"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(number: &str, code: &str, name: &str) -> RegistryEntry {
        RegistryEntry {
            business_number: number.to_string(),
            institution_code: code.to_string(),
            pharmacy_name: name.to_string(),
        }
    }

    #[test]
    fn merge_keeps_last_occurrence_in_place() {
        let mut registry = PharmacyRegistry {
            path: PathBuf::from("unused.csv"),
            entries: vec![entry("1", "a", "One"), entry("2", "b", "Two")],
        };
        let stats = registry.merge(vec![entry("1", "c", "One v2"), entry("3", "d", "Three")]);
        let numbers: Vec<&str> = registry
            .entries()
            .iter()
            .map(|e| e.business_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["2", "1", "3"]);
        assert_eq!(registry.lookup("1"), Some("c"));
        assert_eq!(stats, MergeStats { submitted: 2, replaced: 1, total: 3 });
    }

    #[test]
    fn paste_requires_three_fields() {
        let err = PharmacyRegistry::parse_paste("약국\t123\n").unwrap_err();
        assert!(matches!(err, CoreError::TooFewFields { line: 1, found: 2, .. }));
    }

    #[test]
    fn paste_field_order_is_name_number_code() {
        let entries = PharmacyRegistry::parse_paste("행복약국\t123-45\tA001\n\n").unwrap();
        assert_eq!(entries, vec![entry("123-45", "A001", "행복약국")]);
    }

    #[test]
    fn blank_code_is_not_a_replacement() {
        let registry = PharmacyRegistry {
            path: PathBuf::from("unused.csv"),
            entries: vec![entry("1", " ", "One")],
        };
        assert_eq!(registry.lookup("1"), None);
        assert_eq!(registry.lookup("9"), None);
    }

    #[test]
    fn summary_counts_distinct_numbers() {
        let registry = PharmacyRegistry {
            path: PathBuf::from("unused.csv"),
            entries: vec![entry("1", "a", "One"), entry("2", "b", "Two")],
        };
        let summary = registry.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.latest.map(|e| e.pharmacy_name), Some("Two".to_string()));
    }
}
