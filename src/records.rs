//! Loading and saving contact files for the CLI.
//!
//! CSV files keep every column and row in their original order; only the
//! email column is rewritten (and appended when the input has none). JSON
//! files are arrays of contact objects whose unknown keys are carried through.

use anyhow::{bail, Context, Result};
use csv::StringRecord;
use email_enricher_core::Contact;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const FIRST_NAME_COLUMN: &str = "contact_first_name";
const LAST_NAME_COLUMN: &str = "contact_last_name";
const WEBSITE_COLUMN: &str = "account_website";
const COMPANY_COLUMN: &str = "account_name";
const EMAIL_COLUMN: &str = "contact_email";

const REQUIRED_COLUMNS: [&str; 3] = [FIRST_NAME_COLUMN, LAST_NAME_COLUMN, WEBSITE_COLUMN];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(RecordFormat::Csv),
            Some("json") => Ok(RecordFormat::Json),
            _ => bail!(
                "Unsupported input file '{}': expected a .csv or .json file",
                path.display()
            ),
        }
    }
}

/// Raw CSV rows kept alongside the parsed contacts so they can be written back verbatim.
#[derive(Debug)]
struct CsvTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    email_idx: usize,
}

/// A loaded contact file.
#[derive(Debug)]
pub(crate) struct RecordFile {
    format: RecordFormat,
    table: Option<CsvTable>,
    original_emails: Vec<Option<String>>,
    pub contacts: Vec<Contact>,
}

impl RecordFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let format = RecordFormat::from_path(path)?;
        let (contacts, table) = match format {
            RecordFormat::Csv => {
                let (contacts, table) = load_csv(path)?;
                (contacts, Some(table))
            }
            RecordFormat::Json => (load_json(path)?, None),
        };
        let original_emails = contacts.iter().map(|c| c.email.clone()).collect();
        Ok(Self {
            format,
            table,
            original_emails,
            contacts,
        })
    }

    pub(crate) fn format(&self) -> RecordFormat {
        self.format
    }

    /// True when the record at `idx` ended up with a different email than it was loaded with.
    pub(crate) fn changed(&self, idx: usize) -> bool {
        match (self.contacts.get(idx), self.original_emails.get(idx)) {
            (Some(contact), Some(original)) => contact.email != *original,
            _ => false,
        }
    }

    /// Writes every record to `path` in the input's format.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        self.save_filtered(path, |_| true)
    }

    /// Writes only the records whose email changed. Returns how many were written.
    pub(crate) fn save_changes(&self, path: &Path) -> Result<usize> {
        let changed: Vec<bool> = (0..self.contacts.len()).map(|i| self.changed(i)).collect();
        self.save_filtered(path, |i| changed[i])?;
        Ok(changed.iter().filter(|c| **c).count())
    }

    fn save_filtered<F>(&self, path: &Path, keep: F) -> Result<()>
    where
        F: Fn(usize) -> bool,
    {
        match &self.table {
            Some(table) => save_csv(path, table, &self.contacts, keep),
            None => {
                let selected: Vec<&Contact> = self
                    .contacts
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| keep(*i))
                    .map(|(_, c)| c)
                    .collect();
                save_json(path, &selected)
            }
        }
    }
}

/// `<stem>_<suffix>.<ext>` next to `input`.
pub(crate) fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("records");
    let file_name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext),
        None => format!("{}_{}", stem, suffix),
    };
    input.with_file_name(file_name)
}

fn load_csv(path: &Path) -> Result<(Vec<Contact>, CsvTable)> {
    tracing::debug!("Opening CSV input file: {}", path.display());
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open input file '{}'", path.display()))?;
    let mut headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV headers from '{}'", path.display()))?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| column(name).is_none())
        .collect();
    if !missing.is_empty() {
        bail!(
            "Input file '{}' is missing required column(s): {}",
            path.display(),
            missing.join(", ")
        );
    }
    let first_idx = column(FIRST_NAME_COLUMN);
    let last_idx = column(LAST_NAME_COLUMN);
    let website_idx = column(WEBSITE_COLUMN);
    let company_idx = column(COMPANY_COLUMN);
    let existing_email_idx = column(EMAIL_COLUMN);

    let email_idx = match existing_email_idx {
        Some(idx) => idx,
        None => {
            tracing::info!("Input has no '{}' column; appending one.", EMAIL_COLUMN);
            headers.push_field(EMAIL_COLUMN);
            headers.len() - 1
        }
    };

    let mut contacts = Vec::new();
    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let mut row = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        while row.len() < headers.len() {
            row.push_field("");
        }
        let field = |col: Option<usize>| col.and_then(|i| row.get(i)).map(str::to_string);
        contacts.push(Contact {
            first_name: field(first_idx),
            last_name: field(last_idx),
            company_name: field(company_idx),
            website: field(website_idx),
            email: field(Some(email_idx)),
            other_fields: HashMap::new(),
        });
        rows.push(row);
    }

    Ok((
        contacts,
        CsvTable {
            headers,
            rows,
            email_idx,
        },
    ))
}

fn save_csv<F>(path: &Path, table: &CsvTable, contacts: &[Contact], keep: F) -> Result<()>
where
    F: Fn(usize) -> bool,
{
    tracing::debug!("Writing CSV output file: {}", path.display());
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    writer.write_record(&table.headers)?;

    for (i, (row, contact)) in table.rows.iter().zip(contacts).enumerate() {
        if !keep(i) {
            continue;
        }
        let email = contact.email.as_deref().unwrap_or("");
        let record: StringRecord = row
            .iter()
            .enumerate()
            .map(|(col, value)| if col == table.email_idx { email } else { value })
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write row {} to '{}'", i + 1, path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush output file '{}'", path.display()))?;
    Ok(())
}

fn load_json(path: &Path) -> Result<Vec<Contact>> {
    tracing::debug!("Opening JSON input file: {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file '{}'", path.display()))?;
    let reader = BufReader::new(file);
    let records: Vec<Contact> = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse JSON from '{}'. Ensure it's an array of contact objects.",
            path.display()
        )
    })?;
    Ok(records)
}

fn save_json(path: &Path, contacts: &[&Contact]) -> Result<()> {
    tracing::debug!("Writing JSON output file: {}", path.display());
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, contacts)
        .with_context(|| format!("Failed to serialize contacts to JSON for '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("/data/leads.csv"), "enriched"),
            PathBuf::from("/data/leads_enriched.csv")
        );
        assert_eq!(
            sibling_path(Path::new("leads"), "changes"),
            PathBuf::from("leads_changes")
        );
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RecordFormat::from_path(Path::new("a.CSV")).unwrap(), RecordFormat::Csv);
        assert_eq!(RecordFormat::from_path(Path::new("a.json")).unwrap(), RecordFormat::Json);
        assert!(RecordFormat::from_path(Path::new("a.xlsx")).is_err());
    }

    #[test]
    fn test_csv_appends_email_column_and_preserves_rows() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("leads.csv");
        fs::write(
            &input,
            "account_name,contact_first_name,contact_last_name,account_website,notes\n\
             Acme,Jane,Doe,acme.com,\"met at expo, follow up\"\n\
             Initech,Bob,Ray,initech.com,\n",
        )
        .unwrap();

        let mut records = RecordFile::load(&input).unwrap();
        assert_eq!(records.format(), RecordFormat::Csv);
        assert_eq!(records.contacts.len(), 2);
        assert_eq!(records.contacts[0].company_name.as_deref(), Some("Acme"));
        assert_eq!(records.contacts[0].email.as_deref(), Some(""));

        records.contacts[0].email = Some("jdoe@acme.com".to_string());
        let output = dir.path().join("out.csv");
        records.save(&output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines[0],
            "account_name,contact_first_name,contact_last_name,account_website,notes,contact_email"
        );
        assert_eq!(
            lines[1],
            "Acme,Jane,Doe,acme.com,\"met at expo, follow up\",jdoe@acme.com"
        );
        assert_eq!(lines[2], "Initech,Bob,Ray,initech.com,,");
    }

    #[test]
    fn test_csv_existing_email_column_and_changes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("leads.csv");
        fs::write(
            &input,
            "contact_email,contact_first_name,contact_last_name,account_website\n\
             keep@acme.com,John,Doe,acme.com\n\
             ,Jane,Doe,acme.com\n",
        )
        .unwrap();

        let mut records = RecordFile::load(&input).unwrap();
        assert_eq!(records.contacts[0].email.as_deref(), Some("keep@acme.com"));
        records.contacts[1].email = Some("janed@acme.com".to_string());
        assert!(!records.changed(0));
        assert!(records.changed(1));

        let changes = dir.path().join("changes.csv");
        assert_eq!(records.save_changes(&changes).unwrap(), 1);
        let written = fs::read_to_string(&changes).unwrap();
        assert_eq!(
            written,
            "contact_email,contact_first_name,contact_last_name,account_website\n\
             janed@acme.com,Jane,Doe,acme.com\n"
        );
    }

    #[test]
    fn test_csv_missing_required_columns() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        fs::write(&input, "contact_first_name,website\nJane,acme.com\n").unwrap();

        let err = RecordFile::load(&input).unwrap_err().to_string();
        assert!(err.contains("contact_last_name"));
        assert!(err.contains("account_website"));
    }

    #[test]
    fn test_json_carries_unknown_fields() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("leads.json");
        fs::write(
            &input,
            r#"[{"contact_first_name":"Jane","contact_last_name":"Doe",
                "account_website":"acme.com","crm_id":42}]"#,
        )
        .unwrap();

        let mut records = RecordFile::load(&input).unwrap();
        assert_eq!(records.format(), RecordFormat::Json);
        records.contacts[0].email = Some("jdoe@acme.com".to_string());

        let output = dir.path().join("out.json");
        records.save(&output).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value[0]["crm_id"], 42);
        assert_eq!(value[0]["contact_email"], "jdoe@acme.com");
        assert_eq!(value[0]["contact_first_name"], "Jane");
    }

    #[test]
    fn test_json_rejects_non_array() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("leads.json");
        fs::write(&input, r#"{"contact_first_name":"Jane"}"#).unwrap();
        assert!(RecordFile::load(&input).is_err());
    }
}
