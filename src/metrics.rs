use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::barcode::ValidationError;

/// Request counters exposed on `/metrics`.
#[derive(Clone)]
pub struct Metrics {
    pub products_created: Arc<AtomicU64>,
    pub categories_created: Arc<AtomicU64>,
    pub quarters_created: Arc<AtomicU64>,
    pub discounts_created: Arc<AtomicU64>,
    pub employees_created: Arc<AtomicU64>,
    pub barcodes_accepted: Arc<AtomicU64>,
    pub barcodes_rejected_empty: Arc<AtomicU64>,
    pub barcodes_rejected_type: Arc<AtomicU64>,
    pub barcodes_rejected_format: Arc<AtomicU64>,
    pub barcodes_rejected_checksum: Arc<AtomicU64>,
    pub barcodes_rejected_length: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            products_created: Arc::new(AtomicU64::new(0)),
            categories_created: Arc::new(AtomicU64::new(0)),
            quarters_created: Arc::new(AtomicU64::new(0)),
            discounts_created: Arc::new(AtomicU64::new(0)),
            employees_created: Arc::new(AtomicU64::new(0)),
            barcodes_accepted: Arc::new(AtomicU64::new(0)),
            barcodes_rejected_empty: Arc::new(AtomicU64::new(0)),
            barcodes_rejected_type: Arc::new(AtomicU64::new(0)),
            barcodes_rejected_format: Arc::new(AtomicU64::new(0)),
            barcodes_rejected_checksum: Arc::new(AtomicU64::new(0)),
            barcodes_rejected_length: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_products_created(&self) {
        self.products_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_categories_created(&self) {
        self.categories_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_quarters_created(&self) {
        self.quarters_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_discounts_created(&self) {
        self.discounts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_employees_created(&self) {
        self.employees_created.fetch_add(1, Ordering::Relaxed);
    }

    /// A valid barcode that does not fit the storage column.
    pub fn inc_barcodes_rejected_length(&self) {
        self.barcodes_rejected_length.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one validator outcome.
    pub fn record_barcode<T>(&self, outcome: &Result<T, ValidationError>) {
        let counter = match outcome {
            Ok(_) => &self.barcodes_accepted,
            Err(ValidationError::Empty(_)) => &self.barcodes_rejected_empty,
            Err(ValidationError::MissingSymbology(_)) | Err(ValidationError::UnknownSymbology(_)) => {
                &self.barcodes_rejected_type
            }
            Err(ValidationError::BadFormat(_)) => &self.barcodes_rejected_format,
            Err(ValidationError::BadChecksum(_)) => &self.barcodes_rejected_checksum,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            products_created: self.products_created.load(Ordering::Relaxed),
            categories_created: self.categories_created.load(Ordering::Relaxed),
            quarters_created: self.quarters_created.load(Ordering::Relaxed),
            discounts_created: self.discounts_created.load(Ordering::Relaxed),
            employees_created: self.employees_created.load(Ordering::Relaxed),
            barcodes_accepted: self.barcodes_accepted.load(Ordering::Relaxed),
            barcodes_rejected_empty: self.barcodes_rejected_empty.load(Ordering::Relaxed),
            barcodes_rejected_type: self.barcodes_rejected_type.load(Ordering::Relaxed),
            barcodes_rejected_format: self.barcodes_rejected_format.load(Ordering::Relaxed),
            barcodes_rejected_checksum: self.barcodes_rejected_checksum.load(Ordering::Relaxed),
            barcodes_rejected_length: self.barcodes_rejected_length.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub products_created: u64,
    pub categories_created: u64,
    pub quarters_created: u64,
    pub discounts_created: u64,
    pub employees_created: u64,
    pub barcodes_accepted: u64,
    pub barcodes_rejected_empty: u64,
    pub barcodes_rejected_type: u64,
    pub barcodes_rejected_format: u64,
    pub barcodes_rejected_checksum: u64,
    pub barcodes_rejected_length: u64,
    pub uptime_seconds: u64,
}
