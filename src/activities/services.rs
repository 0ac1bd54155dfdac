use tracing::debug;
use uuid::Uuid;

use super::repo_types::Activity;
use crate::{dates, error::ApiResult, store::Store};

/// Appends an activity for `user`, stamped with the current time.
pub async fn record_activity(store: &dyn Store, user: &str, activity: &str) -> anyhow::Result<()> {
    let now = dates::now();
    let entry = Activity {
        id: Uuid::new_v4(),
        user: user.to_string(),
        date: dates::render_ledger_date(now.date()),
        activity: activity.to_string(),
        created_at: dates::render_stamp(now),
    };
    store.insert_activity(&entry).await?;
    debug!(%user, %activity, "activity recorded");
    Ok(())
}

/// Activities of `month`, latest first.
///
/// Admins see everything; everyone else only sees what other users did.
pub async fn list_by_month(store: &dyn Store, month: u8, caller: &str) -> ApiResult<Vec<Activity>> {
    let matcher = dates::month_matcher(month)?;
    let is_admin = store
        .find_user(caller)
        .await?
        .map(|u| u.is_admin)
        .unwrap_or(false);

    let mut activities: Vec<Activity> = store
        .list_activities()
        .await?
        .into_iter()
        .filter(|a| matcher.is_match(&a.date))
        .filter(|a| is_admin || a.user != caller)
        .collect();
    activities.sort_by(|a, b| dates::chronological_desc(&a.date, &b.date));
    Ok(activities)
}
