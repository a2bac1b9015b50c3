//! Station ingestion: validate, deduplicate, geocode and store raw records.
//!
//! Each record is handled independently; a failure is counted against that
//! record and the batch carries on. The duplicate check runs before any
//! geocoding request, so re-running an import over the same file issues no
//! lookups for stations already present.

use std::str::FromStr;

use camino::Utf8Path;
use fuelroute_core::{
    AddressQuery, CatalogError, GeocodeError, Geocoder, GeocodingResolver, Station, StationSink,
};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

mod record;

pub use record::{
    RawStationRecord, RecordReadError, StationRecords, read_station_records,
    read_station_records_from_path,
};

/// Aggregate counts for one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IngestSummary {
    /// Records examined, including malformed rows.
    pub processed: usize,
    /// Stations added to the catalog.
    pub succeeded: usize,
    /// Records whose address could not be resolved.
    pub failed_geocode: usize,
    /// Records skipped because the identifier was already present.
    pub duplicates: usize,
    /// Records rejected by validation or CSV parsing.
    pub invalid: usize,
    /// Records abandoned after a transport or storage failure.
    pub errors: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: &IngestOutcome) {
        self.processed += 1;
        match outcome {
            IngestOutcome::Imported => self.succeeded += 1,
            IngestOutcome::Duplicate => self.duplicates += 1,
            IngestOutcome::FailedGeocode { .. } => self.failed_geocode += 1,
            IngestOutcome::Invalid { .. } => self.invalid += 1,
            IngestOutcome::Failed { .. } => self.errors += 1,
        }
    }

    fn log(&self) {
        info!(
            "station ingestion summary: processed {}, succeeded {}, failed geocode {}, \
             duplicates {}, invalid {}, errors {}",
            self.processed,
            self.succeeded,
            self.failed_geocode,
            self.duplicates,
            self.invalid,
            self.errors
        );
    }
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The station was added to the catalog.
    Imported,
    /// The identifier was already present; nothing was written.
    Duplicate,
    /// Every geocoding attempt came back empty.
    FailedGeocode {
        /// First query attempted.
        query: String,
    },
    /// The record failed validation.
    Invalid {
        /// Validation detail.
        reason: String,
    },
    /// A transport or storage failure abandoned the record.
    Failed {
        /// Failure detail.
        reason: String,
    },
}

/// Outcome of one record, keyed by its identifier as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Identifier from the source record.
    pub external_id: String,
    /// What happened to the record.
    pub outcome: IngestOutcome,
}

/// Detailed report of an ingestion run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IngestReport {
    /// Aggregate counts.
    pub summary: IngestSummary,
    /// Stations added during this run, in input order.
    pub imported: Vec<Station>,
    /// Per-record outcomes in input order.
    pub outcomes: Vec<RecordOutcome>,
}

/// Ingest raw records into `sink`, resolving addresses with `resolver`.
///
/// Records are processed in order. For each one the identifier and price
/// are validated, the catalog is checked for the identifier, the address is
/// geocoded through the fallback ladder and the station is inserted.
///
/// # Examples
/// ```
/// use fuelroute_core::test_support::StubGeocoder;
/// use fuelroute_core::{GeocodeCandidate, GeocodingResolver, MemoryCatalog, StationCatalog};
/// use fuelroute_data::{RawStationRecord, ingest_station_records};
///
/// let record = RawStationRecord {
///     external_id: "7".into(),
///     name: "Big Cabin".into(),
///     address: "I-44 EXIT 283".into(),
///     city: "Big Cabin".into(),
///     state: "OK".into(),
///     rack_id: "307".into(),
///     retail_price: "3.007".into(),
/// };
/// let geocoder = StubGeocoder::default()
///     .with_result("I-44 283, Big Cabin, OK, USA", vec![GeocodeCandidate::at(36.54, -95.22)]);
/// let resolver = GeocodingResolver::new(geocoder);
/// let mut catalog = MemoryCatalog::default();
///
/// let report = ingest_station_records(&[record], &resolver, &mut catalog);
/// assert_eq!(report.summary.succeeded, 1);
/// assert!(catalog.by_external_id("7").is_some());
/// ```
pub fn ingest_station_records<G, S>(
    records: &[RawStationRecord],
    resolver: &GeocodingResolver<G>,
    sink: &mut S,
) -> IngestReport
where
    G: Geocoder,
    S: StationSink + ?Sized,
{
    let report = ingest_records(records, resolver, sink);
    report.summary.log();
    report
}

/// Read a CSV export and ingest every row into `sink`.
///
/// Malformed rows count as both processed and invalid.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or has no readable header.
pub fn import_station_csv<G, S>(
    path: &Utf8Path,
    resolver: &GeocodingResolver<G>,
    sink: &mut S,
) -> Result<IngestReport, RecordReadError>
where
    G: Geocoder,
    S: StationSink + ?Sized,
{
    let read = read_station_records_from_path(path)?;
    info!(
        "read {} station records from {path} ({} malformed)",
        read.records.len(),
        read.malformed
    );
    let mut report = ingest_records(&read.records, resolver, sink);
    report.summary.processed += read.malformed;
    report.summary.invalid += read.malformed;
    report.summary.log();
    Ok(report)
}

fn ingest_records<G, S>(
    records: &[RawStationRecord],
    resolver: &GeocodingResolver<G>,
    sink: &mut S,
) -> IngestReport
where
    G: Geocoder,
    S: StationSink + ?Sized,
{
    let mut report = IngestReport::default();
    for record in records {
        let outcome = match ingest_record(record, resolver, sink) {
            Ok(station) => {
                info!(
                    "imported station {} ({}) at ({}, {})",
                    station.external_id, station.name, station.location.y, station.location.x
                );
                report.imported.push(station);
                IngestOutcome::Imported
            }
            Err(skipped) => {
                log_skipped(record, &skipped);
                skipped
            }
        };
        report.summary.record(&outcome);
        report.outcomes.push(RecordOutcome {
            external_id: record.external_id.clone(),
            outcome,
        });
    }
    report
}

fn ingest_record<G, S>(
    record: &RawStationRecord,
    resolver: &GeocodingResolver<G>,
    sink: &mut S,
) -> Result<Station, IngestOutcome>
where
    G: Geocoder,
    S: StationSink + ?Sized,
{
    let external_id = record.external_id.trim();
    if external_id.is_empty() {
        return Err(IngestOutcome::Invalid {
            reason: "missing external identifier".to_owned(),
        });
    }
    let price =
        parse_price(&record.retail_price).map_err(|reason| IngestOutcome::Invalid { reason })?;
    if sink.by_external_id(external_id).is_some() {
        return Err(IngestOutcome::Duplicate);
    }

    let query = AddressQuery {
        address: &record.address,
        city: &record.city,
        state: &record.state,
    };
    let location = resolver.resolve_address(&query).map_err(|err| match err {
        GeocodeError::NotFound { query } => IngestOutcome::FailedGeocode { query },
        GeocodeError::Transport(source) => IngestOutcome::Failed {
            reason: source.to_string(),
        },
    })?;

    let station = Station::new(external_id, record.name.trim(), location, price)
        .map_err(|err| IngestOutcome::Invalid {
            reason: err.to_string(),
        })?
        .with_address(record.address.trim(), record.city.trim(), record.state.trim())
        .with_rack_id(record.rack_id.trim());
    match sink.insert(station.clone()) {
        Ok(()) => Ok(station),
        Err(CatalogError::DuplicateStation { .. }) => Err(IngestOutcome::Duplicate),
        Err(err @ CatalogError::Backend { .. }) => Err(IngestOutcome::Failed {
            reason: error_chain(&err),
        }),
    }
}

/// Parse a retail price, rejecting negative and non-numeric values.
fn parse_price(text: &str) -> Result<Decimal, String> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let price = Decimal::from_str(digits)
        .map_err(|err| format!("invalid retail price {trimmed:?}: {err}"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("negative retail price {trimmed:?}"));
    }
    Ok(price)
}

fn log_skipped(record: &RawStationRecord, outcome: &IngestOutcome) {
    let id = record.external_id.trim();
    match outcome {
        IngestOutcome::Duplicate => info!("skipping station {id}: already imported"),
        IngestOutcome::FailedGeocode { query } => {
            warn!("skipping station {id}: no coordinates for {query:?}");
        }
        IngestOutcome::Invalid { reason } => warn!("skipping station record {id:?}: {reason}"),
        IngestOutcome::Failed { reason } => warn!("failed to import station {id}: {reason}"),
        IngestOutcome::Imported => {}
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
