//! User and session repository.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{NewUser, SessionRecord, UserRecord};
use super::pool::{DbError, DbPool};
use super::util::{format_timestamp, parse_datetime};
use crate::models::{Role, Session, User};
use crate::schema::{sessions, users};

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email,
            password_hash: record.password_hash,
            role: Role::from_str(&record.role).unwrap_or(Role::Client),
            created_at: parse_datetime(&record.created_at),
        }
    }
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Session {
            token: record.token,
            user_id: record.user_id,
            created_at: parse_datetime(&record.created_at),
            expires_at: parse_datetime(&record.expires_at),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthRepository {
    pool: DbPool,
}

impl AuthRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a user. Fails with a unique violation if the email is taken.
    pub async fn create_user(&self, user: &User) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        let created_at = format_timestamp(&user.created_at);

        diesel::insert_into(users::table)
            .values(NewUser {
                id: &user.id,
                email: &user.email,
                password_hash: &user.password_hash,
                role: user.role.as_str(),
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.pool.get().await?;

        users::table
            .find(id)
            .select(UserRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(User::from))
    }

    /// Look up a user by email (stored lowercase).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.pool.get().await?;

        users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .select(UserRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(User::from))
    }

    /// All users, oldest first.
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.pool.get().await?;

        users::table
            .select(UserRecord::as_select())
            .order(users::created_at.asc())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(User::from).collect())
    }

    /// Change a user's role. Returns false if no user has that email.
    pub async fn set_role(&self, email: &str, role: Role) -> Result<bool, DbError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::update(users::table.filter(users::email.eq(email.trim().to_lowercase())))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    pub async fn delete_user(&self, id: &str) -> Result<bool, DbError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    pub async fn create_session(&self, session: &Session) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(sessions::table)
            .values(SessionRecord {
                token: session.token.clone(),
                user_id: session.user_id.clone(),
                created_at: format_timestamp(&session.created_at),
                expires_at: format_timestamp(&session.expires_at),
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn get_session(&self, token: &str) -> Result<Option<Session>, DbError> {
        let mut conn = self.pool.get().await?;

        sessions::table
            .find(token)
            .select(SessionRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Session::from))
    }

    pub async fn delete_session(&self, token: &str) -> Result<bool, DbError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(sessions::table.find(token))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    pub async fn delete_sessions_for_user(&self, user_id: &str) -> Result<usize, DbError> {
        let mut conn = self.pool.get().await?;

        diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id)))
            .execute(&mut conn)
            .await
    }

    /// Remove sessions that expired before `now`.
    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize, DbError> {
        let mut conn = self.pool.get().await?;
        let cutoff = format_timestamp(&now);

        diesel::delete(sessions::table.filter(sessions::expires_at.le(cutoff)))
            .execute(&mut conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::util::is_unique_violation;
    use crate::repository::DbContext;
    use chrono::Duration;
    use tempfile::tempdir;

    fn user(email: &str) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Client,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_users_and_sessions() {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        let repo = ctx.auth();

        let u = user("jane@example.com");
        repo.create_user(&u).await.unwrap();
        let dup = repo.create_user(&user("jane@example.com")).await.unwrap_err();
        assert!(is_unique_violation(&dup));

        let found = repo.get_user_by_email(" JANE@example.com ").await.unwrap().unwrap();
        assert_eq!(found.id, u.id);

        assert!(repo.set_role("jane@example.com", Role::Admin).await.unwrap());
        assert!(!repo.set_role("nobody@example.com", Role::Admin).await.unwrap());
        assert!(repo.get_user(&u.id).await.unwrap().unwrap().is_admin());

        let now = Utc::now();
        let live = Session {
            token: "live".to_string(),
            user_id: u.id.clone(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        let stale = Session {
            token: "stale".to_string(),
            expires_at: now - Duration::hours(1),
            ..live.clone()
        };
        repo.create_session(&live).await.unwrap();
        repo.create_session(&stale).await.unwrap();

        assert_eq!(repo.purge_expired_sessions(now).await.unwrap(), 1);
        assert!(repo.get_session("stale").await.unwrap().is_none());
        assert_eq!(repo.get_session("live").await.unwrap().unwrap().user_id, u.id);

        assert_eq!(repo.delete_sessions_for_user(&u.id).await.unwrap(), 1);
        assert!(repo.delete_user(&u.id).await.unwrap());
        assert!(repo.list_users().await.unwrap().is_empty());
    }
}
