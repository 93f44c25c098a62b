//! Sample records the in-memory store starts with.
//!
//! Fixtures keep the labels they were authored with. [`load`] recomputes the
//! derived fields and reports every label that disagreed.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::models::{InventoryRecord, InventoryStatus, Product};

/// A fixture label that was overridden by its derived value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedDiscrepancy {
    StockFlag {
        product_id: String,
        labelled: bool,
        derived: bool,
    },
    InventoryStatus {
        product_id: String,
        location: String,
        labelled: InventoryStatus,
        derived: InventoryStatus,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub discrepancies: Vec<SeedDiscrepancy>,
}

impl SeedReport {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Normalized sample data plus the report of corrected labels.
pub fn load() -> (Vec<Product>, Vec<InventoryRecord>, SeedReport) {
    let mut products = product_fixtures();
    let mut inventory = inventory_fixtures();
    let mut report = SeedReport::default();

    for product in &mut products {
        if let Some(labelled) = product.sync_stock_flag() {
            warn!(
                product_id = %product.id,
                labelled,
                derived = product.in_stock(),
                "Fixture stock flag disagrees with quantity"
            );
            report.discrepancies.push(SeedDiscrepancy::StockFlag {
                product_id: product.id.clone(),
                labelled,
                derived: product.in_stock(),
            });
        }
    }

    for record in &mut inventory {
        if let Some(labelled) = record.sync_status() {
            warn!(
                product_id = %record.product_id,
                location = %record.location,
                %labelled,
                derived = %record.status(),
                "Fixture inventory status disagrees with counts"
            );
            report.discrepancies.push(SeedDiscrepancy::InventoryStatus {
                product_id: record.product_id.clone(),
                location: record.location.clone(),
                labelled,
                derived: record.status(),
            });
        }
    }

    (products, inventory, report)
}

/// The normalized sample products.
pub fn sample_products() -> Vec<Product> {
    load().0
}

/// The normalized sample inventory.
pub fn sample_inventory() -> Vec<InventoryRecord> {
    load().1
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn instant(rfc3339: &str) -> DateTime<Utc> {
    rfc3339.parse().unwrap_or_default()
}

fn product_fixtures() -> Vec<Product> {
    let now = Utc::now();
    vec![
        Product {
            id: "1".into(),
            name: "Amoxicillin 500mg Capsules".into(),
            category: "Prescription Medications".into(),
            description: "Broad-spectrum antibiotic for bacterial infections".into(),
            full_description: "Amoxicillin is a penicillin-type antibiotic used to treat a wide \
                variety of bacterial infections. It works by stopping the growth of bacteria. \
                This antibiotic treats only bacterial infections and will not work for viral \
                infections."
                .into(),
            image: "/images/products/amoxicillin.jpg".into(),
            expiry_date: date(2025, 12, 31),
            manufacturer: "PharmaCorp".into(),
            batch_number: "AMX2024001".into(),
            in_stock: true,
            stock_quantity: 150,
            price: 25.99,
            currency: "USD".into(),
            ingredients: "Amoxicillin trihydrate, microcrystalline cellulose, sodium starch \
                glycolate, magnesium stearate"
                .into(),
            usage: "Take by mouth with or without food as directed by your doctor, usually \
                every 8 or 12 hours. The dosage is based on your medical condition and \
                response to treatment."
                .into(),
            storage: "Store at room temperature away from light and moisture. Do not store in \
                the bathroom. Keep all medications away from children and pets."
                .into(),
            warnings: "May cause allergic reactions in patients with penicillin allergy. \
                Consult your doctor before use."
                .into(),
            pdf_brochure: "/brochures/amoxicillin-info.pdf".into(),
            certifications: vec!["FDA Approved".into(), "GMP Certified".into()],
            last_updated: now,
        },
        Product {
            id: "2".into(),
            name: "Digital Blood Pressure Monitor".into(),
            category: "Medical Devices".into(),
            description: "Automatic digital BP monitor with memory function".into(),
            full_description: "Advanced digital blood pressure monitor featuring automatic \
                inflation, memory storage for multiple readings, and large LCD display. \
                Clinically validated for accuracy and suitable for home and professional use."
                .into(),
            image: "/images/products/blood-pressure-monitor.jpg".into(),
            expiry_date: date(2027, 6, 15),
            manufacturer: "MedTech Solutions".into(),
            batch_number: "DBP2024002".into(),
            in_stock: true,
            stock_quantity: 75,
            price: 89.99,
            currency: "USD".into(),
            ingredients: "Electronic components, LCD display, inflatable cuff, pressure sensors"
                .into(),
            usage: "Wrap cuff around upper arm, press start button, remain still during \
                measurement. Device automatically inflates and deflates."
                .into(),
            storage: "Store in dry place at room temperature. Avoid extreme temperatures and \
                humidity."
                .into(),
            warnings: "Not suitable for patients with irregular heartbeat. Consult healthcare \
                provider for proper interpretation of readings."
                .into(),
            pdf_brochure: "/brochures/bp-monitor-manual.pdf".into(),
            certifications: vec!["CE Marked".into(), "ISO 13485".into()],
            last_updated: now,
        },
    ]
}

fn inventory_fixtures() -> Vec<InventoryRecord> {
    let labelled = |product_id: &str,
                    location: &str,
                    quantity: u32,
                    minimum_threshold: u32,
                    last_restocked: &str,
                    status: InventoryStatus| InventoryRecord {
        product_id: product_id.into(),
        location: location.into(),
        quantity,
        minimum_threshold,
        last_restocked: instant(last_restocked),
        status,
    };

    vec![
        labelled(
            "1",
            "Main Warehouse - Thimphu",
            150,
            50,
            "2024-01-15T10:30:00Z",
            InventoryStatus::InStock,
        ),
        labelled(
            "1",
            "Branch Office - Paro",
            25,
            20,
            "2024-01-10T14:20:00Z",
            InventoryStatus::LowStock,
        ),
        labelled(
            "2",
            "Main Warehouse - Thimphu",
            75,
            30,
            "2024-01-12T09:15:00Z",
            InventoryStatus::InStock,
        ),
    ]
}
