use chrono::{DateTime, Utc};

use crate::types::ObservationRecord;

/// Row shape of the `prices` table. Used by sqlx for typed queries.
#[derive(Debug, sqlx::FromRow)]
pub struct PriceRow {
    pub id: i64,
    pub product_name: String,
    pub old_price: i64,
    pub new_price: i64,
    pub installment_price: i64,
    pub captured_at: DateTime<Utc>,
}

impl From<PriceRow> for ObservationRecord {
    fn from(row: PriceRow) -> Self {
        ObservationRecord {
            product_name: row.product_name,
            old_price: row.old_price,
            new_price: row.new_price,
            installment_price: row.installment_price,
            captured_at: row.captured_at,
        }
    }
}
