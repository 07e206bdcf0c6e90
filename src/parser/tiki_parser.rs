// Tiki product API response mapping
use crate::model::{Observation, ParserError};
use serde::{Deserialize, Deserializer};

pub trait Parser {
    fn parse(&self, body: &str, timestamp: String) -> Result<Observation, ParserError>;
}

/// Subset of `GET /api/v2/products/{id}` that ends up in the history log.
/// Every field is optional; nested objects may be missing or `null`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductResponse {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub brand: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub price: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub list_price: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub discount_rate: Option<i64>,
    pub current_seller: Option<NamedRef>,
    pub inventory_status: Option<String>,
    pub stock_item: Option<StockItem>,
    pub rating_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub review_count: Option<i64>,
    pub quantity_sold: Option<QuantitySold>,
    pub short_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockItem {
    #[serde(default, deserialize_with = "lenient_int")]
    pub qty: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuantitySold {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub value: Option<i64>,
}

/// Whole numbers sometimes arrive as floats (`3190000.0`); round them
/// instead of rejecting the product.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64))))
}

impl ProductResponse {
    pub fn into_observation(self, timestamp: String) -> Observation {
        let (sold_quantity_text, sold_quantity_value) = match self.quantity_sold {
            Some(q) => (q.text, q.value),
            None => (None, None),
        };

        Observation {
            timestamp,
            sku: self.sku,
            name: self.name,
            brand: self.brand.and_then(|b| b.name),
            price: self.price,
            list_price: self.list_price,
            discount_rate: self.discount_rate,
            seller_name: self.current_seller.and_then(|s| s.name),
            stock_status: self.inventory_status,
            stock_quantity: self.stock_item.and_then(|s| s.qty),
            rating_average: self.rating_average,
            review_count: self.review_count,
            sold_quantity_text,
            sold_quantity_value,
            canonical_url: self.short_url,
        }
    }
}

pub struct TikiProductParser;

impl TikiProductParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for TikiProductParser {
    fn parse(&self, body: &str, timestamp: String) -> Result<Observation, ParserError> {
        let response: ProductResponse = serde_json::from_str(body)?;
        Ok(response.into_observation(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = include_str!("../../tests/fixtures/product_full.json");
    const SPARSE: &str = include_str!("../../tests/fixtures/product_sparse.json");
    const NO_PRICE: &str = include_str!("../../tests/fixtures/product_no_price.json");
    const TS: &str = "2025-06-01 09:00:00";

    fn parse(body: &str) -> Observation {
        TikiProductParser::new().parse(body, TS.to_string()).unwrap()
    }

    #[test]
    fn maps_every_field_from_full_fixture() {
        let obs = parse(FULL);
        let expected = Observation {
            timestamp: TS.to_string(),
            sku: Some("2473841598016".into()),
            name: Some("Điện thoại POCO C75 8GB/256GB - Hàng chính hãng DGW".into()),
            brand: Some("Xiaomi".into()),
            price: Some(3190000),
            list_price: Some(3990000),
            discount_rate: Some(20),
            seller_name: Some("Tiki Trading".into()),
            stock_status: Some("available".into()),
            stock_quantity: Some(42),
            rating_average: Some(4.8),
            review_count: Some(137),
            sold_quantity_text: Some("Đã bán 1k+".into()),
            sold_quantity_value: Some(1264),
            canonical_url: Some(
                "https://tiki.vn/dien-thoai-poco-c75-8gb-256gb-hang-chinh-hang-dk-p278098703.html?spid=278098705"
                    .into(),
            ),
        };
        assert_eq!(obs, expected);
    }

    #[test]
    fn missing_or_null_nesting_leaves_fields_absent() {
        let obs = parse(SPARSE);
        assert_eq!(obs.price, Some(45000));
        assert_eq!(obs.list_price, None);
        // no "brand" key at all
        assert_eq!(obs.brand, None);
        // "current_seller": null
        assert_eq!(obs.seller_name, None);
        assert_eq!(obs.stock_quantity, None);
        assert_eq!(obs.sold_quantity_text, None);
        assert_eq!(obs.sold_quantity_value, Some(3));
        assert_eq!(obs.rating_average, None);
    }

    #[test]
    fn null_price_parses_as_absent() {
        let obs = parse(NO_PRICE);
        assert_eq!(obs.price, None);
        assert_eq!(obs.brand.as_deref(), Some("Samsung"));
    }

    #[test]
    fn float_valued_integers_are_accepted() {
        let body = r#"{
            "price": 3190000.0,
            "list_price": 3990000.0,
            "discount_rate": 20.4,
            "review_count": 137,
            "stock_item": { "qty": 42.0 },
            "quantity_sold": { "value": 1264.0 }
        }"#;
        let obs = parse(body);
        assert_eq!(obs.price, Some(3190000));
        assert_eq!(obs.list_price, Some(3990000));
        assert_eq!(obs.discount_rate, Some(20));
        assert_eq!(obs.review_count, Some(137));
        assert_eq!(obs.stock_quantity, Some(42));
        assert_eq!(obs.sold_quantity_value, Some(1264));
    }

    #[test]
    fn string_price_is_still_an_error() {
        let result = TikiProductParser::new().parse(r#"{ "price": "3190000" }"#, TS.to_string());
        assert!(matches!(result, Err(ParserError::Json(_))));
    }

    #[test]
    fn empty_object_is_all_absent() {
        let obs = parse("{}");
        assert_eq!(obs.timestamp, TS);
        assert!(obs.sku.is_none() && obs.price.is_none() && obs.canonical_url.is_none());
    }

    #[test]
    fn non_json_body_is_an_error() {
        let result = TikiProductParser::new().parse("<html>blocked</html>", TS.to_string());
        assert!(matches!(result, Err(ParserError::Json(_))));
    }
}
