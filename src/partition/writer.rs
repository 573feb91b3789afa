//! Partitioned Parquet writing

use super::types::{
    FailedPartition, PartitionKey, PartitionWriteOptions, WriteReport, WrittenPartition,
};
use crate::error::{Error, Result};
use crate::normalize::{FeedRecord, FeedTable};
use crate::output::{table_to_batch, write_batch_to_parquet, ParquetWriterConfig};
use crate::types::FeedKind;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Directory under the output root reserved for inspection renderings
pub const INSPECT_DIR: &str = "_inspect";

/// `root/agency/kind/date.parquet`
pub fn build_partition_path(
    root: &Path,
    agency: &str,
    kind: FeedKind,
    date_key: &str,
) -> PathBuf {
    root.join(agency)
        .join(kind.as_str())
        .join(format!("{date_key}.parquet"))
}

/// Split a table into per-partition tables, in key order
///
/// Rows keep their table order within a partition. Only non-empty
/// partitions appear.
pub fn group_by_partition(table: FeedTable) -> BTreeMap<PartitionKey, FeedTable> {
    fn group<R: FeedRecord>(
        rows: Vec<R>,
        wrap: fn(Vec<R>) -> FeedTable,
    ) -> BTreeMap<PartitionKey, FeedTable> {
        let mut groups: BTreeMap<PartitionKey, Vec<R>> = BTreeMap::new();
        for row in rows {
            groups.entry(PartitionKey::of(&row)).or_default().push(row);
        }
        groups.into_iter().map(|(k, rows)| (k, wrap(rows))).collect()
    }

    match table {
        FeedTable::TripUpdates(rows) => group(rows, FeedTable::TripUpdates),
        FeedTable::VehiclePositions(rows) => group(rows, FeedTable::VehiclePositions),
    }
}

/// Write one Parquet file per (agency, date) partition under `root`
///
/// A failing partition is logged and recorded in the report; the others
/// are still written. Existing partition files are overwritten.
pub fn write_partitioned(
    table: FeedTable,
    root: &Path,
    options: &PartitionWriteOptions,
) -> WriteReport {
    let kind = table.kind();
    let table = match &options.agency_filter {
        Some(agency) => table.retain_agency(agency),
        None => table,
    };

    let partitions: Vec<_> = group_by_partition(table).into_iter().collect();
    debug!(
        kind = %kind,
        partitions = partitions.len(),
        parallel = options.parallel,
        compression = ?options.parquet.compression(),
        row_group_size = options.parquet.row_group_size(),
        dictionary = options.parquet.is_dictionary_enabled(),
        statistics = options.parquet.is_statistics_enabled(),
        "Writing partitions"
    );

    let write = |(key, table): (PartitionKey, FeedTable)| {
        let result = write_partition(root, kind, &key, &table, &options.parquet);
        (key, result)
    };

    let results: Vec<_> = if options.parallel {
        partitions.into_par_iter().map(write).collect()
    } else {
        partitions.into_iter().map(write).collect()
    };

    let mut report = WriteReport::default();
    for (key, result) in results {
        match result {
            Ok(written) => {
                info!(
                    kind = %kind,
                    partition = %key,
                    rows = written.rows,
                    path = %written.path.display(),
                    "Wrote partition"
                );
                report.written.push(written);
            }
            Err(e) => {
                error!(kind = %kind, partition = %key, "Failed to write partition");
                debug!(kind = %kind, partition = %key, error = ?e, "Partition write error detail");
                report.failed.push(FailedPartition { key, error: e });
            }
        }
    }
    report
}

fn write_partition(
    root: &Path,
    kind: FeedKind,
    key: &PartitionKey,
    table: &FeedTable,
    config: &ParquetWriterConfig,
) -> Result<WrittenPartition> {
    let to_write_error = |e: Error| Error::write(&key.agency, &key.date_key, e.to_string());

    check_path_component(key, &key.agency)?;
    check_path_component(key, &key.date_key)?;
    if key.agency == INSPECT_DIR {
        return Err(Error::write(
            &key.agency,
            &key.date_key,
            format!("agency '{INSPECT_DIR}' collides with the inspection directory"),
        ));
    }

    let path = build_partition_path(root, &key.agency, kind, &key.date_key);
    let batch = table_to_batch(table).map_err(to_write_error)?;
    let rows = write_batch_to_parquet(&path, &batch, config).map_err(to_write_error)?;

    Ok(WrittenPartition {
        key: key.clone(),
        path,
        rows,
    })
}

/// Reject values that would not stay a single directory level
fn check_path_component(key: &PartitionKey, value: &str) -> Result<()> {
    let unsafe_component = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.contains('\0');
    if unsafe_component {
        return Err(Error::write(
            &key.agency,
            &key.date_key,
            format!("'{value}' is not usable as a path component"),
        ));
    }
    Ok(())
}
