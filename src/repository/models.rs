//! Diesel row types.

use diesel::prelude::*;

use crate::schema;

/// Row shared by the four document tables, loaded with an explicit column list.
#[derive(Queryable, Debug, Clone)]
pub struct DocumentRow {
    pub id: String,
    pub user_id: Option<String>,
    pub category: String,
    pub year: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub created_at: String,
}

/// Profile record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProfileRecord {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub alternative_contact_number: Option<String>,
    pub created_at: String,
}

/// New profile for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::profiles)]
pub struct NewProfile<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub contact_number: &'a str,
    pub alternative_contact_number: Option<&'a str>,
    pub created_at: &'a str,
}

/// Activity log record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::activity_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub user_email: String,
    pub action: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub browser_info: Option<String>,
    pub created_at: String,
}

/// New activity log entry for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::activity_logs)]
pub struct NewActivityRecord<'a> {
    pub id: &'a str,
    pub user_id: Option<&'a str>,
    pub user_email: &'a str,
    pub action: &'a str,
    pub description: &'a str,
    pub ip_address: Option<&'a str>,
    pub browser_info: Option<&'a str>,
    pub created_at: &'a str,
}

/// User record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

/// New user for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::users)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: &'a str,
}

/// Session record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionRecord {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}
