use serde::Serialize;

/// One aggregation bucket: a raw ledger date or a payer, with its summed price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Total {
    #[serde(rename = "_id")]
    pub key: String,
    pub total_price: f64,
}
