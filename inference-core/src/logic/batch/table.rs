//! Batch CSV codec
//!
//! Reads a headed CSV table, pulls the three required columns out of it and
//! writes the annotated table back. Output columns already present in the
//! header are overwritten in place, the rest are appended in `OUTPUT_COLUMNS`
//! order, then `Error` (only when some row failed).

use std::io::{Read, Write};

use csv::StringRecord;

use crate::logic::error::PredictionError;
use crate::logic::features::layout::{COL_ERROR, COL_PLASTIC_WASTE, COL_PRESSURE, COL_TEMPERATURE};
use crate::logic::features::{RawRecord, RawValue, OUTPUT_COLUMNS, REQUIRED_COLUMNS};
use super::BatchRow;

// ============================================================================
// INPUT TABLE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BatchTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl BatchTable {
    /// Parse CSV with a header row. Short rows are kept; their missing cells
    /// surface later as per-row `MissingField` errors.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PredictionError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()
            .map_err(|e| PredictionError::InvalidInput(format!("malformed CSV header: {}", e)))?
            .clone();

        let records = reader.records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PredictionError::InvalidInput(format!("malformed CSV: {}", e)))?;

        Ok(Self { headers, records })
    }

    pub fn from_csv_str(text: &str) -> Result<Self, PredictionError> {
        Self::from_reader(text.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required columns absent from the header
    pub fn missing_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS.iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Fail fast when the table is structurally unusable
    pub fn validate_columns(&self) -> Result<(), PredictionError> {
        let missing = self.missing_columns();
        if !missing.is_empty() {
            return Err(PredictionError::MissingColumns(missing));
        }
        Ok(())
    }

    /// Extract the raw inputs, one per row, in row order
    pub fn raw_records(&self) -> Result<Vec<RawRecord>, PredictionError> {
        self.validate_columns()?;

        let waste = self.column(COL_PLASTIC_WASTE);
        let temperature = self.column(COL_TEMPERATURE);
        let pressure = self.column(COL_PRESSURE);

        let cell = |record: &StringRecord, index: Option<usize>| -> Option<RawValue> {
            index.and_then(|i| record.get(i)).and_then(RawValue::from_cell)
        };

        Ok(self.records.iter()
            .map(|record| RawRecord {
                plastic_waste_kg: cell(record, waste),
                temperature_c: cell(record, temperature),
                pressure_kpa: cell(record, pressure),
            })
            .collect())
    }
}

// ============================================================================
// OUTPUT TABLE
// ============================================================================

/// Input table joined with per-row outcomes
#[derive(Debug, Clone)]
pub struct BatchOutput {
    table: BatchTable,
    rows: Vec<BatchRow>,
}

impl BatchOutput {
    pub(crate) fn new(table: BatchTable, rows: Vec<BatchRow>) -> Self {
        Self { table, rows }
    }

    pub fn rows(&self) -> &[BatchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_err()).count()
    }

    pub fn output_headers(&self) -> Vec<String> {
        self.layout().headers
    }

    /// Resolve where every output value goes before writing any row
    fn layout(&self) -> OutputLayout {
        let mut headers: Vec<String> = self.table.headers.iter().map(String::from).collect();
        let outputs = OUTPUT_COLUMNS.map(|name| column_slot(&mut headers, name));

        // a stale Error column from a previous run is always rewritten
        let has_error_column = headers.iter().any(|h| h == COL_ERROR);
        let error = (self.failed_count() > 0 || has_error_column)
            .then(|| column_slot(&mut headers, COL_ERROR));

        OutputLayout { headers, outputs, error }
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let layout = self.layout();
        let width = self.table.headers.len();

        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&layout.headers)?;

        for (record, row) in self.table.records.iter().zip(&self.rows) {
            let mut cells: Vec<String> = (0..layout.headers.len())
                .map(|i| if i < width { record.get(i).unwrap_or("") } else { "" })
                .map(String::from)
                .collect();

            let (values, error) = match &row.outcome {
                Ok(prediction) => {
                    let [ratio, pressure_temp, interaction] = prediction.features.engineered();
                    let values = [
                        ratio.to_string(),
                        pressure_temp.to_string(),
                        interaction.to_string(),
                        prediction.result.predicted_output.to_string(),
                        prediction.result.anomaly_flag().to_string(),
                    ];
                    (values, String::new())
                }
                Err(e) => (Default::default(), e.source.to_string()),
            };

            for (slot, value) in layout.outputs.iter().zip(values) {
                cells[*slot] = value;
            }
            if let Some(slot) = layout.error {
                cells[slot] = error;
            }

            writer.write_record(&cells)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Final header plus the column index of each output value
struct OutputLayout {
    headers: Vec<String>,
    outputs: [usize; OUTPUT_COLUMNS.len()],
    error: Option<usize>,
}

/// Index of `name` in `headers`, appending it when absent
fn column_slot(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(index) => index,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}
