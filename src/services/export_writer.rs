// src/services/export_writer.rs
// DOCUMENTATION: Export file writer
// PURPOSE: Serialize export records to CSV/XLSX files and manage the export directory

use crate::errors::PlacesError;
use crate::models::{ExportFileInfo, ExportFormat, ExportRecord};
use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Byte order mark so spreadsheet apps detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Prefix of files produced from a user selection
pub const SELECTION_EXPORT_PREFIX: &str = "places_export";

/// Timestamp embedded in export file names
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes export files into a single results directory
#[derive(Debug, Clone)]
pub struct ExportWriter {
    output_dir: PathBuf,
}

impl ExportWriter {
    /// Create writer, making sure the output directory exists
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, PlacesError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write records under `<stem>_<timestamp>.<ext>`
    /// DOCUMENTATION: Returns the path written. A name collision within the
    /// same second gets a numeric suffix instead of overwriting.
    pub fn write(
        &self,
        records: &[ExportRecord],
        format: ExportFormat,
        stem: &str,
    ) -> Result<PathBuf, PlacesError> {
        let file_name = export_file_name(stem, format, Local::now());
        let path = self.unique_path(&file_name);

        match format {
            ExportFormat::Csv => {
                let file = File::create(&path)?;
                write_csv(BufWriter::new(file), records)?;
            }
            ExportFormat::Xlsx => {
                write_xlsx(&path, records)?;
            }
        }

        log::info!(
            "Exported {} records to {}",
            records.len(),
            path.display()
        );
        Ok(path)
    }

    /// List past exports, newest first
    pub fn list(&self) -> Result<Vec<ExportFileInfo>, PlacesError> {
        let mut entries: Vec<(DateTime<Local>, ExportFileInfo)> = Vec::new();

        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            let modified: DateTime<Local> = metadata.modified()?.into();
            let format = Path::new(&filename)
                .extension()
                .map(|ext| ext.to_string_lossy().to_uppercase())
                .unwrap_or_default();

            entries.push((
                modified,
                ExportFileInfo {
                    filename,
                    date: modified.format("%Y-%m-%d %H:%M:%S").to_string(),
                    format,
                    size: format!("{:.1} KB", metadata.len() as f64 / 1024.0),
                },
            ));
        }

        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.filename.cmp(&b.1.filename)));
        Ok(entries.into_iter().map(|(_, info)| info).collect())
    }

    /// Resolve a bare file name inside the export directory
    /// DOCUMENTATION: Rejects anything that could escape the directory
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, PlacesError> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
            || filename.starts_with('.')
        {
            return Err(PlacesError::InvalidInput(format!(
                "Invalid export file name: {}",
                filename
            )));
        }

        let path = self.output_dir.join(filename);
        if !path.is_file() {
            return Err(PlacesError::NotFound(format!("Export {}", filename)));
        }
        Ok(path)
    }

    /// Delete an export by file name
    pub fn delete(&self, filename: &str) -> Result<(), PlacesError> {
        let path = self.resolve(filename)?;
        fs::remove_file(&path)?;
        log::info!("Deleted export {}", path.display());
        Ok(())
    }

    /// Run a file operation on tokio's blocking pool
    /// DOCUMENTATION: Async callers (request handlers, the export service)
    /// go through here so directory scans and file writes never stall a worker
    pub async fn run_blocking<T, F>(&self, op: F) -> Result<T, PlacesError>
    where
        F: FnOnce(&ExportWriter) -> Result<T, PlacesError> + Send + 'static,
        T: Send + 'static,
    {
        let writer = self.clone();
        tokio::task::spawn_blocking(move || op(&writer))
            .await
            .map_err(|e| PlacesError::ExportError(format!("Export task failed: {}", e)))?
    }

    fn unique_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.output_dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }

        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut counter = 1;
        loop {
            let candidate = self.output_dir.join(format!("{}_{}.{}", stem, counter, ext));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// `<stem>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn export_file_name(stem: &str, format: ExportFormat, at: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        stem,
        at.format(FILE_TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// File stem for one-shot scrapes: `<term>_<location>`, filename-safe
pub fn scrape_file_stem(term: &str, location: &str) -> String {
    format!("{}_{}", sanitize_component(term), sanitize_component(location))
}

/// Keep letters, digits, '-' and '_'; everything else becomes '_'
fn sanitize_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().chars() {
        let c = if c.is_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let out = out.trim_matches('_').to_string();
    if out.is_empty() {
        "untitled".to_string()
    } else {
        out
    }
}

/// Write a BOM, one header row and one row per record
/// DOCUMENTATION: Comma-delimited, quoting only where needed
pub fn write_csv<W: Write>(mut out: W, records: &[ExportRecord]) -> Result<usize, PlacesError> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out);

    writer.write_record(ExportRecord::HEADERS)?;
    for record in records {
        writer.write_record(record.as_row())?;
    }
    writer.flush()?;

    Ok(records.len())
}

/// Write a single-sheet workbook with a bold header row
pub fn write_xlsx(path: &Path, records: &[ExportRecord]) -> Result<usize, PlacesError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Places")?;

    for (col, header) in ExportRecord::HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, value) in record.as_row().iter().enumerate() {
            worksheet.write_string(row, col as u16, *value)?;
        }
    }
    worksheet.autofit();

    workbook.save(path)?;
    Ok(records.len())
}
