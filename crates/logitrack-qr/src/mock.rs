//! Mock catalog data for demos and QR testing.
//!
//! Generated products carry import and expiry dates spread so that roughly
//! 20% are already expired, 30% expire within the next 30 days, and the rest
//! expire at some point in the next two years.

use chrono::{DateTime, Duration, Months, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::token::{CatalogProduct, ProductToken};

/// Category labels assigned to mock products.
pub const PRODUCT_TYPES: &[&str] = &[
    "Electronics",
    "Appliances",
    "Furniture",
    "Clothing",
    "Food",
    "Beverages",
    "Medical",
    "Automotive",
    "Industrial",
    "Office Supplies",
];

const PRODUCT_NAMES: &[&str] = &[
    "Ultra Widget 3000",
    "Premium Gadget",
    "Deluxe Thingamajig",
    "Superior Doohickey",
    "Advanced Contraption",
    "Professional Tool",
    "Enterprise Solution",
    "Industrial Component",
    "Tactical Equipment",
    "Commercial Assembly",
];

const LOCATIONS: &[&str] = &[
    "Central Warehouse",
    "East Warehouse",
    "West Warehouse",
    "North Distribution Center",
    "South Retail Hub",
];

/// Import and expiry dates for a mock product, as ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDates {
    /// Between six and one month before `now`.
    pub import_date: String,
    /// Expired, expiring soon, or further out; see the module docs.
    pub expiry_date: String,
}

/// Generate import and expiry dates relative to `now`.
pub fn generate_product_dates<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> ProductDates {
    let import_date = random_between(months_before(now, 6), months_before(now, 1), rng);

    let roll: f64 = rng.gen();
    let expiry_date = if roll < 0.2 {
        random_between(months_before(now, 12), now, rng)
    } else if roll < 0.5 {
        random_between(now, now + Duration::days(30), rng)
    } else {
        random_between(now, months_after(now, 24), rng)
    };

    ProductDates {
        import_date: to_iso(import_date),
        expiry_date: to_iso(expiry_date),
    }
}

/// Fill in a missing product type and dates.
///
/// Products that already carry all three are returned unchanged.
#[must_use]
pub fn enhance_product<R: Rng + ?Sized>(
    mut product: CatalogProduct,
    now: DateTime<Utc>,
    rng: &mut R,
) -> CatalogProduct {
    let complete = product.product_type.is_some()
        && product.import_date.is_some()
        && product.expiry_date.is_some();
    if complete {
        return product;
    }

    let dates = generate_product_dates(now, rng);
    if product.product_type.is_none() {
        product.product_type = Some(pick(PRODUCT_TYPES, rng).to_string());
    }
    if product.import_date.is_none() {
        product.import_date = Some(dates.import_date);
    }
    if product.expiry_date.is_none() {
        product.expiry_date = Some(dates.expiry_date);
    }
    product
}

/// Generate a complete mock catalog product.
#[must_use]
pub fn generate_mock_product<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> CatalogProduct {
    let dates = generate_product_dates(now, rng);
    let weight = (rng.gen_range(0.0..10.0_f64) * 10.0).round() / 10.0;
    let status = if rng.gen_bool(0.8) { "In Stock" } else { "Low Stock" };

    CatalogProduct {
        id: format!("prod-mock-{}", rng.gen_range(0..10_000)),
        name: pick(PRODUCT_NAMES, rng).to_string(),
        sku: format!("MOCK-{}", rng.gen_range(0..10_000)),
        product_type: Some(pick(PRODUCT_TYPES, rng).to_string()),
        quantity: rng.gen_range(10..510),
        weight,
        provider: "Mock Supplies Ltd.".to_string(),
        location: pick(LOCATIONS, rng).to_string(),
        status: status.to_string(),
        last_updated: to_iso(now),
        import_date: Some(dates.import_date),
        expiry_date: Some(dates.expiry_date),
    }
}

/// Generate `count` mock catalog products.
#[must_use]
pub fn generate_mock_products<R: Rng + ?Sized>(
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<CatalogProduct> {
    (0..count).map(|_| generate_mock_product(now, rng)).collect()
}

/// Project a catalog product into a token, filling missing QR fields first.
#[must_use]
pub fn product_to_token<R: Rng + ?Sized>(
    product: &CatalogProduct,
    now: DateTime<Utc>,
    rng: &mut R,
) -> ProductToken {
    ProductToken::from(&enhance_product(product.clone(), now, rng))
}

fn pick<R: Rng + ?Sized>(items: &'static [&'static str], rng: &mut R) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

fn random_between<R: Rng + ?Sized>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rng: &mut R,
) -> DateTime<Utc> {
    let span = (end - start).num_milliseconds();
    if span <= 0 {
        return start;
    }
    start + Duration::milliseconds(rng.gen_range(0..span))
}

fn months_before(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(now - Duration::days(i64::from(months) * 30))
}

fn months_after(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_add_months(Months::new(months))
        .unwrap_or(now + Duration::days(i64::from(months) * 30))
}

/// Millisecond-precision UTC timestamp, e.g. `2025-01-01T00:00:00.000Z`.
fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::{parse_timestamp, ExpiryClassifier, ExpiryState};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn bare_product() -> CatalogProduct {
        CatalogProduct {
            id: "prod-001".to_string(),
            name: "Premium Laptop".to_string(),
            sku: "LAP-001".to_string(),
            product_type: None,
            quantity: 120,
            weight: 2.1,
            provider: "Tech Supplies Inc.".to_string(),
            location: "Central Warehouse".to_string(),
            status: "In Stock".to_string(),
            last_updated: "2023-04-17T14:30:00Z".to_string(),
            import_date: None,
            expiry_date: None,
        }
    }

    #[test]
    fn test_dates_are_in_range() {
        let mut rng = rng();
        for _ in 0..100 {
            let dates = generate_product_dates(now(), &mut rng);
            let import = parse_timestamp(&dates.import_date).unwrap();
            let expiry = parse_timestamp(&dates.expiry_date).unwrap();

            assert!(import >= months_before(now(), 6) - Duration::milliseconds(1));
            assert!(import <= months_before(now(), 1));
            assert!(expiry >= months_before(now(), 12) - Duration::milliseconds(1));
            assert!(expiry <= months_after(now(), 24));
        }
    }

    #[test]
    fn test_dates_cover_every_expiry_state() {
        let mut rng = rng();
        let classifier = ExpiryClassifier::default();
        let states: Vec<ExpiryState> = (0..300)
            .map(|_| generate_product_dates(now(), &mut rng))
            .map(|d| classifier.classify(Some(d.expiry_date.as_str()), now()).state)
            .collect();

        assert!(states.contains(&ExpiryState::Expired));
        assert!(states.contains(&ExpiryState::ExpiringSoon));
        assert!(states.contains(&ExpiryState::Valid));
        assert!(!states.contains(&ExpiryState::NoExpiry));
    }

    #[test]
    fn test_enhance_fills_missing_fields() {
        let product = enhance_product(bare_product(), now(), &mut rng());

        let product_type = product.product_type.as_deref().unwrap();
        assert!(PRODUCT_TYPES.contains(&product_type));
        assert!(product.import_date.is_some());
        assert!(product.expiry_date.is_some());
        assert_eq!(product.name, "Premium Laptop");
    }

    #[test]
    fn test_enhance_keeps_existing_fields() {
        let mut product = bare_product();
        product.product_type = Some("Electronics".to_string());
        product.expiry_date = Some("2026-04-17T14:30:00Z".to_string());

        let enhanced = enhance_product(product, now(), &mut rng());
        assert_eq!(enhanced.product_type.as_deref(), Some("Electronics"));
        assert_eq!(enhanced.expiry_date.as_deref(), Some("2026-04-17T14:30:00Z"));
        assert!(enhanced.import_date.is_some());
    }

    #[test]
    fn test_enhance_complete_product_is_unchanged() {
        let mut product = bare_product();
        product.product_type = Some("Electronics".to_string());
        product.import_date = Some("2023-04-17T14:30:00Z".to_string());
        product.expiry_date = Some("2026-04-17T14:30:00Z".to_string());

        assert_eq!(enhance_product(product.clone(), now(), &mut rng()), product);
    }

    #[test]
    fn test_generate_mock_product() {
        let product = generate_mock_product(now(), &mut rng());

        assert!(product.id.starts_with("prod-mock-"));
        assert!(product.sku.starts_with("MOCK-"));
        assert!(PRODUCT_NAMES.contains(&product.name.as_str()));
        assert!(LOCATIONS.contains(&product.location.as_str()));
        assert!((10..510).contains(&product.quantity));
        assert!((0.0..=10.0).contains(&product.weight));
        assert!(product.status == "In Stock" || product.status == "Low Stock");
        assert_eq!(product.last_updated, "2025-06-15T08:00:00.000Z");
    }

    #[test]
    fn test_generate_mock_products_count_and_determinism() {
        let a = generate_mock_products(5, now(), &mut rng());
        let b = generate_mock_products(5, now(), &mut rng());
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_product_to_token() {
        let token = product_to_token(&bare_product(), now(), &mut rng());
        assert_eq!(token.name, "Premium Laptop");
        assert_eq!(token.quantity, 120);
        assert!(token.product_type.is_some());
        assert!(token.expiry_date.is_some());
    }

    #[test]
    fn test_random_between_empty_span() {
        assert_eq!(random_between(now(), now(), &mut rng()), now());
    }
}
