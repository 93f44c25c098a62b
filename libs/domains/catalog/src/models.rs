use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use crate::query::{Catalogued, SortField, SortValue};

/// Catalog product as served to clients.
///
/// `stock_quantity` is authoritative; `in_stock` is kept on the wire but is
/// always recomputed from it, including when a product is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Short description shown in listings
    pub description: String,
    /// Long description shown on the detail page
    pub full_description: String,
    /// Image path relative to the site root
    pub image: String,
    pub expiry_date: NaiveDate,
    pub manufacturer: String,
    pub batch_number: String,
    pub(crate) in_stock: bool,
    pub stock_quantity: u32,
    pub price: f64,
    /// ISO 4217 code
    pub currency: String,
    pub ingredients: String,
    pub usage: String,
    pub storage: String,
    pub warnings: String,
    pub pdf_brochure: String,
    pub certifications: Vec<String>,
    /// Last time the record was read through the detail endpoint
    pub last_updated: DateTime<Utc>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    pub fn set_stock_quantity(&mut self, quantity: u32) {
        self.stock_quantity = quantity;
        self.in_stock = quantity > 0;
    }

    /// Recompute `in_stock` from `stock_quantity`. Returns the previous flag
    /// when it disagreed.
    pub(crate) fn sync_stock_flag(&mut self) -> Option<bool> {
        let derived = self.stock_quantity > 0;
        if self.in_stock == derived {
            return None;
        }
        let previous = self.in_stock;
        self.in_stock = derived;
        Some(previous)
    }

    /// Stamp `last_updated` with the current time.
    ///
    /// The stamp strictly increases per record, even when two touches land
    /// within the clock's resolution.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.last_updated + TimeDelta::microseconds(1);
        self.last_updated = now.max(floor);
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Product::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Product {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut product = Product::deserialize(deserializer)?;
        product.sync_stock_flag();
        Ok(product)
    }
}

impl Catalogued for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn sort_value(&self, field: SortField) -> SortValue {
        match field {
            SortField::Id => SortValue::text(&self.id),
            SortField::Name => SortValue::text(&self.name),
            SortField::Category => SortValue::text(&self.category),
            SortField::Description => SortValue::text(&self.description),
            SortField::FullDescription => SortValue::text(&self.full_description),
            SortField::Image => SortValue::text(&self.image),
            SortField::ExpiryDate => SortValue::Date(self.expiry_date),
            SortField::Manufacturer => SortValue::text(&self.manufacturer),
            SortField::BatchNumber => SortValue::text(&self.batch_number),
            SortField::InStock => SortValue::Flag(self.in_stock),
            SortField::StockQuantity => SortValue::Number(f64::from(self.stock_quantity)),
            SortField::Price => SortValue::Number(self.price),
            SortField::Currency => SortValue::text(&self.currency),
            SortField::Ingredients => SortValue::text(&self.ingredients),
            SortField::Usage => SortValue::text(&self.usage),
            SortField::Storage => SortValue::text(&self.storage),
            SortField::Warnings => SortValue::text(&self.warnings),
            SortField::PdfBrochure => SortValue::text(&self.pdf_brochure),
            SortField::Certifications => SortValue::Raw(self.certifications.join(",")),
            SortField::LastUpdated => SortValue::Instant(self.last_updated),
        }
    }
}

/// Stock level of one product at one location
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InventoryStatus {
    InStock,
    LowStock,
    OutOfStock,
    Discontinued,
}

impl InventoryStatus {
    /// Status implied by the counts of a record that is still carried.
    pub fn derive(quantity: u32, minimum_threshold: u32) -> Self {
        if quantity == 0 {
            InventoryStatus::OutOfStock
        } else if quantity <= minimum_threshold {
            InventoryStatus::LowStock
        } else {
            InventoryStatus::InStock
        }
    }
}

/// Inventory held for a product at a location. Identity is
/// `(product_id, location)`.
///
/// `status` follows the counts unless the line is discontinued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct InventoryRecord {
    pub product_id: String,
    pub location: String,
    pub quantity: u32,
    pub minimum_threshold: u32,
    pub last_restocked: DateTime<Utc>,
    pub(crate) status: InventoryStatus,
}

impl Serialize for InventoryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        InventoryRecord::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for InventoryRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut record = InventoryRecord::deserialize(deserializer)?;
        record.sync_status();
        Ok(record)
    }
}

impl InventoryRecord {
    pub fn new(
        product_id: impl Into<String>,
        location: impl Into<String>,
        quantity: u32,
        minimum_threshold: u32,
        last_restocked: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            location: location.into(),
            quantity,
            minimum_threshold,
            last_restocked,
            status: InventoryStatus::derive(quantity, minimum_threshold),
        }
    }

    pub fn status(&self) -> InventoryStatus {
        self.status
    }

    /// Mark the line as no longer carried. Discontinued is sticky.
    pub fn discontinue(&mut self) {
        self.status = InventoryStatus::Discontinued;
    }

    pub fn is_discontinued(&self) -> bool {
        self.status == InventoryStatus::Discontinued
    }

    /// Recompute `status` from the counts. Returns the previous status when
    /// it disagreed.
    pub(crate) fn sync_status(&mut self) -> Option<InventoryStatus> {
        if self.is_discontinued() {
            return None;
        }
        let derived = InventoryStatus::derive(self.quantity, self.minimum_threshold);
        if self.status == derived {
            return None;
        }
        Some(std::mem::replace(&mut self.status, derived))
    }
}

/// Paging metadata attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page that was requested
    pub page: u32,
    pub limit: u32,
    /// Number of records matching the filters, before slicing
    pub total: usize,
    pub total_pages: usize,
}

/// Envelope wrapping every successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub data: T,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            success: true,
            message: None,
            timestamp: Utc::now(),
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }
}

/// Payload of the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_inventory_status_derivation() {
        assert_eq!(InventoryStatus::derive(0, 10), InventoryStatus::OutOfStock);
        assert_eq!(InventoryStatus::derive(0, 0), InventoryStatus::OutOfStock);
        assert_eq!(InventoryStatus::derive(10, 10), InventoryStatus::LowStock);
        assert_eq!(InventoryStatus::derive(11, 10), InventoryStatus::InStock);
    }

    #[test]
    fn test_inventory_status_wire_format() {
        assert_eq!(
            serde_json::to_value(InventoryStatus::OutOfStock).unwrap(),
            "out-of-stock"
        );
        assert_eq!(
            "low-stock".parse::<InventoryStatus>().unwrap(),
            InventoryStatus::LowStock
        );
    }

    #[test]
    fn test_discontinued_survives_resync() {
        let mut record = InventoryRecord::new("1", "Main", 40, 10, Utc::now());
        record.discontinue();
        assert_eq!(record.sync_status(), None);
        assert_eq!(record.status(), InventoryStatus::Discontinued);
    }

    #[test]
    fn test_set_stock_quantity_keeps_flag_in_step() {
        let mut product = seed::sample_products().remove(0);
        product.set_stock_quantity(0);
        assert!(!product.in_stock());
        product.set_stock_quantity(3);
        assert!(product.in_stock());
    }

    #[test]
    fn test_touch_is_strictly_increasing() {
        let mut product = seed::sample_products().remove(0);
        let stale = product.last_updated - TimeDelta::seconds(5);
        let before = product.last_updated;

        product.touch(stale);
        assert!(product.last_updated > before);

        let later = product.last_updated + TimeDelta::seconds(1);
        product.touch(later);
        assert_eq!(product.last_updated, later);
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let product = seed::sample_products().remove(1);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["inStock"], true);
        assert_eq!(json["stockQuantity"], 75);
        assert_eq!(json["expiryDate"], "2027-06-15");
        assert_eq!(json["pdfBrochure"], "/brochures/bp-monitor-manual.pdf");
        assert!(json.get("lastUpdated").is_some());
    }

    #[test]
    fn test_deserialized_stock_flag_follows_quantity() {
        let mut json = serde_json::to_value(seed::sample_products().remove(0)).unwrap();
        json["stockQuantity"] = 0.into();
        json["inStock"] = true.into();

        let product: Product = serde_json::from_value(json.clone()).unwrap();
        assert!(!product.in_stock());

        json["stockQuantity"] = 4.into();
        json["inStock"] = false.into();
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(product.in_stock());
    }

    #[test]
    fn test_deserialized_inventory_status_follows_counts() {
        let record = InventoryRecord::new("1", "Main Warehouse", 25, 20, Utc::now());
        let mut json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "in-stock");

        json["status"] = "low-stock".into();
        let parsed: InventoryRecord = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed.status(), InventoryStatus::InStock);

        json["status"] = "discontinued".into();
        let parsed: InventoryRecord = serde_json::from_value(json).unwrap();
        assert!(parsed.is_discontinued());
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let json = serde_json::to_value(ApiResponse::ok(HealthStatus::healthy())).unwrap();
        assert_eq!(json["data"]["status"], "healthy");
        assert_eq!(json["success"], true);
        assert!(json.get("message").is_none());
        assert!(json.get("pagination").is_none());

        let page = Pagination {
            page: 1,
            limit: 12,
            total: 2,
            total_pages: 1,
        };
        let json = serde_json::to_value(ApiResponse::paginated(Vec::<u8>::new(), page)).unwrap();
        assert_eq!(json["pagination"]["totalPages"], 1);
    }
}
