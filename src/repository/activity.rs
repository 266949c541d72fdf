//! Activity log repository.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{ActivityRecord, NewActivityRecord};
use super::pool::{DbError, DbPool};
use super::util::{format_timestamp, like_pattern, page_offset, parse_datetime};
use crate::models::{Activity, NewActivity};
use crate::schema::activity_logs;

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        Activity {
            id: record.id,
            user_id: record.user_id,
            user_email: record.user_email,
            action: record.action,
            description: record.description,
            ip_address: record.ip_address,
            browser_info: record.browser_info,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ActivityRepository {
    pool: DbPool,
}

impl ActivityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append an entry and return it as stored.
    pub async fn log(&self, entry: &NewActivity) -> Result<Activity, DbError> {
        let mut conn = self.pool.get().await?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now();
        let created_at = format_timestamp(&now);

        diesel::insert_into(activity_logs::table)
            .values(NewActivityRecord {
                id: &id,
                user_id: entry.user_id.as_deref(),
                user_email: &entry.user_email,
                action: entry.action.as_str(),
                description: &entry.description,
                ip_address: entry.ip_address.as_deref(),
                browser_info: entry.browser_info.as_deref(),
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(Activity {
            id,
            user_id: entry.user_id.clone(),
            user_email: entry.user_email.clone(),
            action: entry.action.as_str().to_string(),
            description: entry.description.clone(),
            ip_address: entry.ip_address.clone(),
            browser_info: entry.browser_info.clone(),
            created_at: now,
        })
    }

    /// One page of entries matching `query` on email, description or action,
    /// newest first, plus the total match count.
    pub async fn search_page(
        &self,
        query: &str,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Activity>, i64), DbError> {
        let mut conn = self.pool.get().await?;
        let pattern = like_pattern(query);

        let matches = activity_logs::user_email
            .like(pattern.clone())
            .escape('\\')
            .or(activity_logs::description.like(pattern.clone()).escape('\\'))
            .or(activity_logs::action.like(pattern).escape('\\'));

        let total: i64 = activity_logs::table
            .filter(matches.clone())
            .select(count_star())
            .first(&mut conn)
            .await?;

        let records: Vec<ActivityRecord> = activity_logs::table
            .filter(matches)
            .select(ActivityRecord::as_select())
            .order((activity_logs::created_at.desc(), activity_logs::id.desc()))
            .limit(per_page.max(1))
            .offset(page_offset(page, per_page))
            .load(&mut conn)
            .await?;

        Ok((records.into_iter().map(Activity::from).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityAction;
    use crate::repository::DbContext;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_log_and_search() {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        let repo = ctx.activities();

        repo.log(&NewActivity::new(
            Some("u1".to_string()),
            "jane@example.com",
            ActivityAction::Login,
            "Signed in",
        ))
        .await
        .unwrap();
        repo.log(
            &NewActivity::new(
                Some("admin".to_string()),
                "admin@leotax.test",
                ActivityAction::Upload,
                "Leo Tax Filing Uploaded Draft file Successfully for Jane Smith",
            )
            .with_client(Some("127.0.0.1".to_string()), Some("curl/8".to_string())),
        )
        .await
        .unwrap();

        let (all, total) = repo.search_page("", 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all[0].action, "upload");
        assert_eq!(all[0].ip_address.as_deref(), Some("127.0.0.1"));

        let (hits, total) = repo.search_page("login", 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(hits[0].user_email, "jane@example.com");

        let (hits, _) = repo.search_page("jane smith", 1, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].action, "upload");
    }
}
