//! Partitioned output module
//!
//! Groups a unified table by (agency, date) and writes one Parquet file per
//! group at `root/agency/kind/YYYYMMDD.parquet`.
//!
//! # Overview
//!
//! - Partitions are enumerated in sorted key order.
//! - Only partitions with rows are written.
//! - A partition that fails to write is reported and skipped; siblings
//!   still write.
//! - Writes may run on the rayon pool since each targets a disjoint path.

mod types;
mod writer;

pub use types::{
    FailedPartition, PartitionKey, PartitionWriteOptions, WriteReport, WrittenPartition,
};
pub use writer::{build_partition_path, group_by_partition, write_partitioned, INSPECT_DIR};
