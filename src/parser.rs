use scraper::{Html, Selector};

use crate::error::{AppError, Result};

/// The scraped pricing fields of one product page, before a capture
/// timestamp is stamped on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product_name: String,
    pub old_price: i64,
    pub new_price: i64,
    pub installment_price: i64,
}

const TITLE_SELECTOR: &str = "h1.ui-pdp-title";
const PRICE_SELECTOR: &str = "span.andes-money-amount__fraction";

/// Extracts the product title and the three listed amounts from a product
/// page. The page renders amounts in document order: struck-through old
/// price, current price, installment price. A missing title or fewer than
/// three amounts means the page layout changed.
pub fn parse_product_page(html: &str) -> Result<ProductSnapshot> {
    let document = Html::parse_document(html);

    let title_selector = selector(TITLE_SELECTOR)?;
    let price_selector = selector(PRICE_SELECTOR)?;

    let product_name = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Parse(format!("product title not found ({TITLE_SELECTOR})")))?;

    let amounts: Vec<String> = document
        .select(&price_selector)
        .map(|el| el.text().collect::<String>())
        .collect();

    if amounts.len() < 3 {
        return Err(AppError::Parse(format!(
            "expected 3 price fields ({PRICE_SELECTOR}), found {}",
            amounts.len()
        )));
    }

    Ok(ProductSnapshot {
        product_name,
        old_price: parse_amount(&amounts[0])?,
        new_price: parse_amount(&amounts[1])?,
        installment_price: parse_amount(&amounts[2])?,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Parse(format!("invalid selector {css:?}: {e}")))
}

/// Whole-unit amount with `.` thousands separators, e.g. "1.299" → 1299.
/// Digits-only after stripping, so negative values cannot slip through.
fn parse_amount(text: &str) -> Result<i64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '.').collect();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Parse(format!("unparseable price amount {text:?}")));
    }
    cleaned
        .parse::<i64>()
        .map_err(|_| AppError::Parse(format!("price amount out of range {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, amounts: &[&str]) -> String {
        let spans: String = amounts
            .iter()
            .map(|a| format!(r#"<span class="andes-money-amount__fraction">{a}</span>"#))
            .collect();
        format!(
            r#"<html><body>
                <h1 class="ui-pdp-title">{title}</h1>
                <div class="ui-pdp-price">{spans}</div>
            </body></html>"#
        )
    }

    #[test]
    fn extracts_title_and_three_amounts() {
        let html = page("Centrifuga Mueller 15kg", &["1.499", "1.299", "129"]);
        let snapshot = parse_product_page(&html).expect("parse");
        assert_eq!(snapshot.product_name, "Centrifuga Mueller 15kg");
        assert_eq!(snapshot.old_price, 1499);
        assert_eq!(snapshot.new_price, 1299);
        assert_eq!(snapshot.installment_price, 129);
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_amount("2.549").unwrap(), 2549);
        assert_eq!(parse_amount(" 1.299.000 ").unwrap(), 1_299_000);
        assert_eq!(parse_amount("89").unwrap(), 89);
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert!(parse_amount("R$ 120").is_err());
        assert!(parse_amount("-120").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn missing_title_is_a_parse_error() {
        let html = r#"<html><body>
            <span class="andes-money-amount__fraction">100</span>
            <span class="andes-money-amount__fraction">90</span>
            <span class="andes-money-amount__fraction">9</span>
        </body></html>"#;
        let err = parse_product_page(html).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn fewer_than_three_amounts_is_a_parse_error() {
        let html = page("Produto", &["100", "90"]);
        let err = parse_product_page(&html).unwrap_err();
        assert!(err.to_string().contains("found 2"), "got {err}");
    }
}
