// src/utils/constants.rs

/// Link count at which two clusters are merged.
pub const DEFAULT_MERGE_THRESHOLD: u64 = 5;

/// Minimum shared records for an address pair to be clustered at all.
pub const DEFAULT_MIN_SHARED_RECORDS: usize = 3;

/// An address must appear on more than this many records to be considered.
pub const DEFAULT_MIN_ADDRESS_RECORDS: usize = 5;

/// A record must be shared by more than this many addresses to be considered.
pub const DEFAULT_MIN_RECORD_ADDRESSES: usize = 5;

/// Clusters with fewer members are left out of the report.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 1;

/// Records shown per cluster in the text report.
pub const REPORT_TOP_RECORDS: usize = 15;

pub const DEFAULT_ADDRESS_COLUMN: &str = "IP";
pub const DEFAULT_RECORD_COLUMN: &str = "Record";
