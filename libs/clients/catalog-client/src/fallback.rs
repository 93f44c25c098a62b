//! Local product list used when the catalog API is not reachable.
//!
//! Filtering reuses the catalog's search and category predicates, plus the
//! first-letter and expiry-window filters of the catalog page.

use chrono::{NaiveDate, TimeDelta};
use domain_catalog::display::StockBadge;
use domain_catalog::query::{self, Catalogued, SortField, SortValue};
use strum::{Display, EnumString};

/// The listing fields of a product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub expiry_date: NaiveDate,
    pub manufacturer: String,
    pub batch_number: String,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub price: f64,
    pub currency: String,
}

impl ProductSummary {
    pub fn stock_badge(&self) -> StockBadge {
        StockBadge::for_stock(self.in_stock, self.stock_quantity)
    }
}

impl Catalogued for ProductSummary {
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
            SortField::Image => SortValue::text(&self.image),
            SortField::ExpiryDate => SortValue::Date(self.expiry_date),
            SortField::Manufacturer => SortValue::text(&self.manufacturer),
            SortField::BatchNumber => SortValue::text(&self.batch_number),
            SortField::InStock => SortValue::Flag(self.in_stock),
            SortField::StockQuantity => SortValue::Number(f64::from(self.stock_quantity)),
            SortField::Price => SortValue::Number(self.price),
            SortField::Currency => SortValue::text(&self.currency),
            _ => SortValue::Missing,
        }
    }
}

/// Expiry filter of the catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ExpiryWindow {
    /// Expiry strictly before today
    #[strum(serialize = "expired")]
    Expired,
    /// Expiring within the next 180 days
    #[strum(serialize = "6months")]
    SixMonths,
    /// Expiring within the next 365 days
    #[strum(serialize = "1year")]
    OneYear,
    /// Expiry strictly after today
    #[strum(serialize = "valid")]
    Valid,
}

impl ExpiryWindow {
    pub fn contains(self, expiry: NaiveDate, today: NaiveDate) -> bool {
        let within = |days: i64| expiry >= today && expiry <= today + TimeDelta::days(days);
        match self {
            ExpiryWindow::Expired => expiry < today,
            ExpiryWindow::SixMonths => within(180),
            ExpiryWindow::OneYear => within(365),
            ExpiryWindow::Valid => expiry > today,
        }
    }
}

/// Catalog page filter. Unset parts match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackFilter {
    pub search: Option<String>,
    /// Case-sensitive first letter of the name
    pub letter: Option<char>,
    pub category: Option<String>,
    pub expiry: Option<ExpiryWindow>,
}

impl FallbackFilter {
    pub fn matches(&self, product: &ProductSummary, today: NaiveDate) -> bool {
        let search = self.search.as_deref().filter(|s| !s.is_empty());
        let category = self.category.as_deref().filter(|c| !c.is_empty());

        search.is_none_or(|s| query::matches_search(product, s))
            && self.letter.is_none_or(|l| product.name.starts_with(l))
            && category.is_none_or(|c| query::matches_category(product, c))
            && self
                .expiry
                .is_none_or(|window| window.contains(product.expiry_date, today))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The built-in product list
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    products: Vec<ProductSummary>,
}

impl Default for LocalCatalog {
    fn default() -> Self {
        Self {
            products: local_products(),
        }
    }
}

impl LocalCatalog {
    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&ProductSummary> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products matching `filter`, in list order
    pub fn filter(&self, filter: &FallbackFilter, today: NaiveDate) -> Vec<&ProductSummary> {
        self.products
            .iter()
            .filter(|p| filter.matches(p, today))
            .collect()
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }
}

#[allow(clippy::too_many_arguments)]
fn summary(
    id: u32,
    name: &str,
    category: &str,
    description: &str,
    image: &str,
    expiry: (i32, u32, u32),
    manufacturer: &str,
    batch_number: &str,
    stock: (bool, u32),
    price: f64,
) -> ProductSummary {
    let (year, month, day) = expiry;
    ProductSummary {
        id: id.to_string(),
        name: name.into(),
        category: category.into(),
        description: description.into(),
        image: format!("/images/products/{image}"),
        expiry_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        manufacturer: manufacturer.into(),
        batch_number: batch_number.into(),
        in_stock: stock.0,
        stock_quantity: stock.1,
        price,
        currency: "USD".into(),
    }
}

fn local_products() -> Vec<ProductSummary> {
    vec![
        summary(
            1,
            "Amoxicillin 500mg Capsules",
            "Prescription Medications",
            "Broad-spectrum antibiotic for bacterial infections",
            "amoxicillin.jpg",
            (2025, 12, 31),
            "PharmaCorp",
            "AMX2024001",
            (true, 150),
            25.99,
        ),
        summary(
            2,
            "Digital Blood Pressure Monitor",
            "Medical Devices",
            "Automatic digital BP monitor with memory function",
            "blood-pressure-monitor.jpg",
            (2027, 6, 15),
            "MedTech Solutions",
            "DBP2024002",
            (true, 75),
            89.99,
        ),
        summary(
            3,
            "Surgical Gloves (Latex-Free)",
            "Surgical Supplies",
            "Sterile, powder-free surgical gloves - Box of 100",
            "surgical-gloves.jpg",
            (2026, 3, 20),
            "SafeHands Medical",
            "SGL2024003",
            (true, 200),
            45.99,
        ),
        summary(
            4,
            "Aspirin 325mg Tablets",
            "Prescription Medications",
            "Pain reliever and anti-inflammatory medication",
            "aspirin.jpg",
            (2025, 8, 10),
            "Generic Pharma",
            "ASP2024004",
            (false, 0),
            12.99,
        ),
        summary(
            5,
            "Centrifuge Machine",
            "Laboratory Equipment",
            "High-speed laboratory centrifuge for sample separation",
            "centrifuge.jpg",
            (2030, 1, 1),
            "LabEquip Pro",
            "CTF2024005",
            (true, 15),
            2499.99,
        ),
        summary(
            6,
            "Bandages Assorted Pack",
            "Surgical Supplies",
            "Sterile adhesive bandages in various sizes",
            "bandages.jpg",
            (2026, 11, 30),
            "WoundCare Plus",
            "BND2024006",
            (true, 300),
            18.99,
        ),
        summary(
            7,
            "Insulin Pen Needles",
            "Medical Devices",
            "Ultra-fine insulin pen needles - 32G x 4mm",
            "insulin-needles.jpg",
            (2027, 2, 28),
            "DiabetesCare",
            "IPN2024007",
            (true, 120),
            35.99,
        ),
        summary(
            8,
            "Microscope Slides",
            "Laboratory Equipment",
            "Pre-cleaned glass microscope slides - Pack of 50",
            "microscope-slides.jpg",
            (2028, 12, 31),
            "LabGlass Co",
            "MCS2024008",
            (true, 85),
            24.99,
        ),
        summary(
            9,
            "Betadine Solution",
            "Surgical Supplies",
            "Antiseptic solution for wound cleaning - 500ml",
            "betadine.jpg",
            (2025, 5, 15),
            "Antiseptic Labs",
            "BET2024009",
            (true, 95),
            8.99,
        ),
        summary(
            10,
            "Lisinopril 10mg Tablets",
            "Prescription Medications",
            "ACE inhibitor for hypertension treatment",
            "lisinopril.jpg",
            (2024, 12, 31),
            "CardioMed",
            "LIS2024010",
            (true, 180),
            22.99,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_catalog::{ProductQuery, SortOrder};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn ids(products: &[&ProductSummary]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let catalog = LocalCatalog::default();
        assert_eq!(catalog.filter(&FallbackFilter::default(), today()).len(), 10);
    }

    #[test]
    fn test_search_uses_name_and_description() {
        let catalog = LocalCatalog::default();
        let filter = FallbackFilter {
            search: Some("STERILE".into()),
            ..Default::default()
        };
        assert_eq!(ids(&catalog.filter(&filter, today())), vec!["3", "6"]);
    }

    #[test]
    fn test_letter_and_category_combine() {
        let catalog = LocalCatalog::default();
        let filter = FallbackFilter {
            letter: Some('A'),
            category: Some("Prescription Medications".into()),
            ..Default::default()
        };
        assert_eq!(ids(&catalog.filter(&filter, today())), vec!["1", "4"]);

        let lowercase = FallbackFilter {
            letter: Some('a'),
            ..Default::default()
        };
        assert!(catalog.filter(&lowercase, today()).is_empty());
    }

    #[test]
    fn test_expiry_windows() {
        let catalog = LocalCatalog::default();
        let by_window = |window: ExpiryWindow| {
            let filter = FallbackFilter {
                expiry: Some(window),
                ..Default::default()
            };
            ids(&catalog.filter(&filter, today()))
        };

        assert_eq!(by_window(ExpiryWindow::Expired), vec!["9", "10"]);
        assert_eq!(by_window(ExpiryWindow::SixMonths), vec!["4"]);
        assert_eq!(by_window(ExpiryWindow::OneYear), vec!["1", "3", "4"]);
        assert_eq!(by_window(ExpiryWindow::Valid).len(), 8);
    }

    #[test]
    fn test_expiry_window_names() {
        assert_eq!("6months".parse::<ExpiryWindow>().unwrap(), ExpiryWindow::SixMonths);
        assert_eq!(ExpiryWindow::OneYear.to_string(), "1year");
    }

    #[test]
    fn test_distinct_categories() {
        assert_eq!(
            LocalCatalog::default().categories(),
            vec![
                "Prescription Medications",
                "Medical Devices",
                "Surgical Supplies",
                "Laboratory Equipment"
            ]
        );
    }

    #[test]
    fn test_stock_badges() {
        let catalog = LocalCatalog::default();
        assert_eq!(catalog.get("4").unwrap().stock_badge(), StockBadge::OutOfStock);
        assert_eq!(catalog.get("5").unwrap().stock_badge(), StockBadge::InStock);
        assert_eq!(catalog.get("1").unwrap().stock_badge(), StockBadge::InStock);
    }

    #[test]
    fn test_shared_query_sorts_local_list() {
        let catalog = LocalCatalog::default();
        let query = ProductQuery::default()
            .category("surgical supplies")
            .sort("price", SortOrder::Asc);
        let page = query::select(catalog.products(), &query);

        let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "6", "3"]);
    }
}
