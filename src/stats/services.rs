use std::collections::HashMap;

use serde_json::Value;

use super::dto::Total;
use crate::{
    dates,
    entries::repo_types::Entry,
    error::{ApiError, ApiResult},
    store::Store,
};

/// Numeric value of a stored price.
///
/// Numbers and numeric strings count, `null` contributes nothing, anything
/// else fails the whole aggregation.
pub fn coerce_price(price: &Value) -> Result<Option<f64>, String> {
    match price {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("price {n} is out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| format!("price '{s}' is not a number")),
        other => Err(format!("price {other} is not a number")),
    }
}

async fn month_entries(store: &dyn Store, month: u8) -> ApiResult<Vec<Entry>> {
    let matcher = dates::month_matcher(month)?;
    Ok(store
        .list_entries()
        .await?
        .into_iter()
        .filter(|e| matcher.is_match(&e.date))
        .collect())
}

fn sum_by<F>(entries: &[Entry], key: F) -> ApiResult<Vec<Total>>
where
    F: Fn(&Entry) -> &str,
{
    let mut sums: HashMap<String, f64> = HashMap::new();
    for e in entries {
        let price = coerce_price(&e.price)
            .map_err(|msg| ApiError::Aggregation(format!("entry {}: {msg}", e.id)))?;
        *sums.entry(key(e).to_string()).or_insert(0.0) += price.unwrap_or(0.0);
    }
    Ok(sums
        .into_iter()
        .map(|(key, total_price)| Total { key, total_price })
        .collect())
}

/// Sum per raw `D/M/YY` date, ordered by descending raw text (not by calendar date).
pub async fn daily_totals(store: &dyn Store, month: u8) -> ApiResult<Vec<Total>> {
    let entries = month_entries(store, month).await?;
    let mut totals = sum_by(&entries, |e| e.date.as_str())?;
    totals.sort_by(|a, b| dates::lexicographic_desc(&a.key, &b.key));
    Ok(totals)
}

/// Sum per payer, ordered by descending raw payer text.
pub async fn totals_by_payer(store: &dyn Store, month: u8) -> ApiResult<Vec<Total>> {
    let entries = month_entries(store, month).await?;
    let mut totals = sum_by(&entries, |e| e.paid_by.as_str())?;
    totals.sort_by(|a, b| dates::lexicographic_desc(&a.key, &b.key));
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::store::memory::MemoryStore;
    use serde_json::json;
    use uuid::Uuid;

    async fn seed(store: &MemoryStore, date: &str, paid_by: &str, price: Value) {
        store
            .insert_entry(&Entry {
                id: Uuid::new_v4(),
                date: date.into(),
                items: "stuff".into(),
                price,
                paid_by: paid_by.into(),
                owed_all: true,
                owed_by: vec![],
                notes: String::new(),
                created_by: paid_by.into(),
                created_at: format!("1:00 PM - {date}"),
                updated_at: String::new(),
                previous_versions: vec![],
            })
            .await
            .unwrap();
    }

    fn total(key: &str, total_price: f64) -> Total {
        Total {
            key: key.into(),
            total_price,
        }
    }

    #[test]
    fn coerces_numbers_and_numeric_strings() {
        assert_eq!(coerce_price(&json!(12)), Ok(Some(12.0)));
        assert_eq!(coerce_price(&json!(12.5)), Ok(Some(12.5)));
        assert_eq!(coerce_price(&json!(" 7.25 ")), Ok(Some(7.25)));
        assert_eq!(coerce_price(&Value::Null), Ok(None));
        assert!(coerce_price(&json!("ten")).is_err());
        assert!(coerce_price(&json!("NaN")).is_err());
        assert!(coerce_price(&json!(true)).is_err());
        assert!(coerce_price(&json!([1])).is_err());
    }

    #[tokio::test]
    async fn daily_totals_group_by_raw_date() {
        let (_, store) = AppState::fake_with_store();
        seed(&store, "1/3/24", "asad", json!("10")).await;
        seed(&store, "1/3/24", "bilal", json!("5")).await;
        seed(&store, "2/3/24", "asad", json!("7")).await;
        seed(&store, "2/4/24", "asad", json!("99")).await;

        let totals = daily_totals(&*store, 3).await.unwrap();
        assert_eq!(totals, vec![total("2/3/24", 7.0), total("1/3/24", 15.0)]);
    }

    #[tokio::test]
    async fn daily_totals_order_is_lexicographic_not_chronological() {
        let (_, store) = AppState::fake_with_store();
        seed(&store, "9/3/24", "asad", json!(1)).await;
        seed(&store, "10/3/24", "asad", json!(2)).await;
        seed(&store, "25/3/24", "asad", json!(3)).await;

        let keys: Vec<_> = daily_totals(&*store, 3)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.key)
            .collect();
        assert_eq!(keys, vec!["9/3/24", "25/3/24", "10/3/24"]);
    }

    #[tokio::test]
    async fn totals_by_payer_sorted_descending() {
        let (_, store) = AppState::fake_with_store();
        seed(&store, "1/9/24", "asad", json!(10)).await;
        seed(&store, "3/9/24", "zara", json!("4.5")).await;
        seed(&store, "4/9/24", "asad", Value::Null).await;
        seed(&store, "5/9/24", "bilal", json!(1)).await;
        seed(&store, "5/09/24", "bilal", json!(1000)).await;

        let totals = totals_by_payer(&*store, 9).await.unwrap();
        assert_eq!(
            totals,
            vec![total("zara", 4.5), total("bilal", 1.0), total("asad", 10.0)]
        );
    }

    #[tokio::test]
    async fn payer_order_is_byte_order() {
        let (_, store) = AppState::fake_with_store();
        seed(&store, "1/9/24", "Zara", json!(1)).await;
        seed(&store, "2/9/24", "asad", json!(2)).await;
        seed(&store, "3/9/24", "bilal", json!(3)).await;

        let payers: Vec<_> = totals_by_payer(&*store, 9)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.key)
            .collect();
        assert_eq!(payers, vec!["bilal", "asad", "Zara"]);
    }

    #[tokio::test]
    async fn unparsable_price_fails_the_month() {
        let (_, store) = AppState::fake_with_store();
        seed(&store, "1/3/24", "asad", json!("10")).await;
        seed(&store, "2/3/24", "asad", json!("a lot")).await;
        // outside the month, never looked at
        seed(&store, "2/4/24", "asad", json!({"bad": true})).await;

        assert!(matches!(
            daily_totals(&*store, 3).await,
            Err(ApiError::Aggregation(_))
        ));
        assert!(matches!(
            totals_by_payer(&*store, 3).await,
            Err(ApiError::Aggregation(_))
        ));
        assert_eq!(daily_totals(&*store, 5).await.unwrap(), vec![]);
    }
}
