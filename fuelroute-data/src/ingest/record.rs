//! Raw station records as exported in the OPIS truck-stop CSV.

use std::fs::File;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use serde::Deserialize;
use thiserror::Error;

/// One CSV row before validation or geocoding.
///
/// Fields are kept as text; the pipeline validates them per record so a
/// single bad row never aborts a batch. Extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RawStationRecord {
    /// Natural key, `OPIS Truckstop ID`.
    #[serde(rename = "OPIS Truckstop ID")]
    pub external_id: String,
    /// `Truckstop Name`.
    #[serde(rename = "Truckstop Name")]
    pub name: String,
    /// Street address, often carrying highway exit markers.
    #[serde(rename = "Address")]
    pub address: String,
    /// City name.
    #[serde(rename = "City")]
    pub city: String,
    /// State code.
    #[serde(rename = "State")]
    pub state: String,
    /// Rack identifier; optional in older exports.
    #[serde(rename = "Rack ID", default)]
    pub rack_id: String,
    /// Retail price per gallon as written.
    #[serde(rename = "Retail Price")]
    pub retail_price: String,
}

/// Records read from one CSV source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StationRecords {
    /// Rows that deserialised.
    pub records: Vec<RawStationRecord>,
    /// Rows skipped because they could not be deserialised.
    pub malformed: usize,
}

/// Errors returned when reading station records.
#[derive(Debug, Error)]
pub enum RecordReadError {
    /// The CSV file could not be opened.
    #[error("failed to open station records at {path}")]
    Open {
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The header row was missing or unreadable.
    #[error("failed to read station record headers")]
    Headers {
        /// Underlying CSV failure.
        #[source]
        source: csv::Error,
    },
}

/// Read station records from CSV text with a header row.
///
/// Surrounding whitespace is trimmed from every field. Rows that fail to
/// deserialise are counted in [`StationRecords::malformed`] and skipped.
///
/// # Examples
/// ```
/// use fuelroute_data::read_station_records;
///
/// let csv = "OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price\n\
///            7,Big Cabin,I-44 EXIT 283,Big Cabin,OK,307,3.007\n";
/// let read = read_station_records(csv.as_bytes())?;
/// assert_eq!(read.records[0].external_id, "7");
/// # Ok::<(), fuelroute_data::ingest::RecordReadError>(())
/// ```
pub fn read_station_records<R: Read>(source: R) -> Result<StationRecords, RecordReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    reader
        .headers()
        .map_err(|source| RecordReadError::Headers { source })?;

    let mut read = StationRecords::default();
    for (row, result) in reader.deserialize::<RawStationRecord>().enumerate() {
        match result {
            Ok(record) => read.records.push(record),
            Err(err) => {
                warn!("skipping malformed station record at row {}: {err}", row + 1);
                read.malformed += 1;
            }
        }
    }
    Ok(read)
}

/// Read station records from a CSV file.
pub fn read_station_records_from_path(
    path: &Utf8Path,
) -> Result<StationRecords, RecordReadError> {
    let file = File::open(path).map_err(|source| RecordReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_station_records(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HEADER: &str = "OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price";

    #[rstest]
    fn trims_fields_and_ignores_extra_columns() {
        let csv = "OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,Notes\n\
                   \x20 42 ,  Pilot #42 , I-70 EXIT 10 & US-40 ,Hays,KS,  9 , 3.199 ,ignored\n";
        let read = read_station_records(csv.as_bytes()).expect("records");
        assert_eq!(read.malformed, 0);
        assert_eq!(
            read.records,
            vec![RawStationRecord {
                external_id: "42".to_owned(),
                name: "Pilot #42".to_owned(),
                address: "I-70 EXIT 10 & US-40".to_owned(),
                city: "Hays".to_owned(),
                state: "KS".to_owned(),
                rack_id: "9".to_owned(),
                retail_price: "3.199".to_owned(),
            }]
        );
    }

    #[rstest]
    fn rack_id_column_is_optional() {
        let csv = "OPIS Truckstop ID,Truckstop Name,Address,City,State,Retail Price\n\
                   1,Stop,Main St,Salina,KS,3.00\n";
        let read = read_station_records(csv.as_bytes()).expect("records");
        let [record] = read.records.as_slice() else {
            panic!("expected one record, found {:?}", read.records);
        };
        assert_eq!(record.rack_id, "");
    }

    #[rstest]
    fn short_rows_are_counted_as_malformed() {
        let csv = format!("{HEADER}\n1,Stop,Main St,Salina,KS,1,3.00\n2,Short Row\n");
        let read = read_station_records(csv.as_bytes()).expect("records");
        assert_eq!(read.records.len(), 1);
        assert_eq!(read.malformed, 1);
    }

    #[rstest]
    fn missing_file_reports_path() {
        let path = Utf8Path::new("does/not/exist.csv");
        let err = read_station_records_from_path(path).expect_err("missing file");
        assert!(matches!(err, RecordReadError::Open { path: failed, .. } if failed.as_path() == path));
    }
}
