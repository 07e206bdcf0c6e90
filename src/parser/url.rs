use crate::model::{ExtractionError, ProductIdentifier};
use regex::Regex;
use std::sync::LazyLock;

static PRODUCT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-p(\d+)\.html\?spid=(\d+)").expect("product URL pattern is valid")
});

/// Pulls `product_id` and `spid` out of a listing URL such as
/// `https://tiki.vn/some-phone-p278098703.html?spid=278098705`.
pub fn extract_ids(url: &str) -> Result<ProductIdentifier, ExtractionError> {
    PRODUCT_URL
        .captures(url)
        .map(|caps| ProductIdentifier {
            product_id: caps[1].to_string(),
            variant_id: caps[2].to_string(),
        })
        .ok_or_else(|| ExtractionError {
            url: url.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_both_ids() {
        let ids = extract_ids(
            "https://tiki.vn/dien-thoai-poco-c75-8gb-256gb-hang-chinh-hang-dk-p278098703.html?spid=278098705",
        )
        .unwrap();
        assert_eq!(ids.product_id, "278098703");
        assert_eq!(ids.variant_id, "278098705");
    }

    #[test]
    fn trailing_query_parameters_are_ignored() {
        let ids = extract_ids("https://tiki.vn/x-p12.html?spid=34&src=search").unwrap();
        assert_eq!(ids, ProductIdentifier { product_id: "12".into(), variant_id: "34".into() });
    }

    #[test]
    fn pid_parameter_is_not_accepted() {
        let err = extract_ids(
            "https://tiki.vn/dien-thoai-samsung-galaxy-a36-5g-hang-chinh-hang-p277466537.html?pid=277466543",
        )
        .unwrap_err();
        assert!(err.url.contains("pid=277466543"));
    }

    #[test]
    fn malformed_urls_yield_nothing() {
        for url in [
            "",
            "https://tiki.vn/",
            "https://tiki.vn/x-p278098703.html",
            "https://tiki.vn/x-p.html?spid=1",
            "https://tiki.vn/x-p1.html?spid=",
            "https://tiki.vn/x-pabc.html?spid=1",
            "https://tiki.vn/xp1.html?spid=2",
        ] {
            assert!(extract_ids(url).is_err(), "{url} should not match");
        }
    }
}
