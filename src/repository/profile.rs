//! Client profile repository.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{NewProfile, ProfileRecord};
use super::pool::{DbError, DbPool};
use super::util::{format_timestamp, like_pattern, page_offset, parse_datetime};
use crate::models::Profile;
use crate::schema::profiles;

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Profile {
            id: record.id,
            user_id: record.user_id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            contact_number: record.contact_number,
            alternative_contact_number: record.alternative_contact_number,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProfileRepository {
    pool: DbPool,
}

impl ProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, profile: &Profile) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        let created_at = format_timestamp(&profile.created_at);

        diesel::insert_into(profiles::table)
            .values(NewProfile {
                id: &profile.id,
                user_id: &profile.user_id,
                first_name: &profile.first_name,
                last_name: &profile.last_name,
                email: &profile.email,
                contact_number: &profile.contact_number,
                alternative_contact_number: profile.alternative_contact_number.as_deref(),
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn get_by_user(&self, user_id: &str) -> Result<Option<Profile>, DbError> {
        let mut conn = self.pool.get().await?;

        profiles::table
            .filter(profiles::user_id.eq(user_id))
            .select(ProfileRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Profile::from))
    }

    /// One page of profiles matching `query` on name or email, newest first,
    /// plus the total match count.
    pub async fn search_page(
        &self,
        query: &str,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Profile>, i64), DbError> {
        let mut conn = self.pool.get().await?;
        let pattern = like_pattern(query);

        let matches = profiles::first_name
            .like(pattern.clone())
            .escape('\\')
            .or(profiles::last_name.like(pattern.clone()).escape('\\'))
            .or(profiles::email.like(pattern.clone()).escape('\\'));

        let total: i64 = profiles::table
            .filter(matches.clone())
            .select(count_star())
            .first(&mut conn)
            .await?;

        let records: Vec<ProfileRecord> = profiles::table
            .filter(matches)
            .select(ProfileRecord::as_select())
            .order((profiles::created_at.desc(), profiles::id.desc()))
            .limit(per_page.max(1))
            .offset(page_offset(page, per_page))
            .load(&mut conn)
            .await?;

        Ok((records.into_iter().map(Profile::from).collect(), total))
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let mut conn = self.pool.get().await?;
        profiles::table
            .select(count_star())
            .first(&mut conn)
            .await
    }

    /// Delete the profile belonging to `user_id`.
    pub async fn delete_by_user(&self, user_id: &str) -> Result<bool, DbError> {
        let mut conn = self.pool.get().await?;
        let rows = diesel::delete(profiles::table.filter(profiles::user_id.eq(user_id)))
            .execute(&mut conn)
            .await?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::repository::DbContext;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    async fn add_client(ctx: &DbContext, first: &str, last: &str, email: &str, age: i64) {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            role: Role::Client,
            created_at: Utc::now(),
        };
        ctx.auth().create_user(&user).await.unwrap();
        let profile = Profile {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            contact_number: "5551234567".to_string(),
            alternative_contact_number: None,
            created_at: Utc::now() - Duration::seconds(age),
        };
        ctx.profiles().insert(&profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_page() {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();

        add_client(&ctx, "Jane", "Smith", "jane@example.com", 30).await;
        add_client(&ctx, "John", "Doe", "john@example.com", 20).await;
        add_client(&ctx, "Ann", "Smithers", "ann@test.org", 10).await;

        let repo = ctx.profiles();
        assert_eq!(repo.count().await.unwrap(), 3);

        let (page, total) = repo.search_page("SMITH", 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page[0].first_name, "Ann");
        assert_eq!(page[1].first_name, "Jane");

        let (page, total) = repo.search_page("", 2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].first_name, "Jane");

        let (_, total) = repo.search_page("example.com", 1, 10).await.unwrap();
        assert_eq!(total, 2);
        let (_, total) = repo.search_page("%", 1, 10).await.unwrap();
        assert_eq!(total, 0);
    }
}
