use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

const APPLICATION_COLUMNS: &str = "id, owner_id, company_id, position, status, date_applied, notes,
     interview_date, offer_date, rejected_date, created_at, updated_at";

const COMPANY_COLUMNS: &str =
    "id, owner_id, name, website, location, industry, created_at, updated_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn company_in_use(referencing: i64) -> Error {
    Error::Conflict(format!(
        "company has {referencing} application(s); delete them first or force the deletion"
    ))
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Fixed-width UTC timestamps so `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let Some(raw) = row.get::<_, Option<String>>(idx)? else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map(Some)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn status_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<ApplicationStatus> {
    let raw: String = row.get(idx)?;
    ApplicationStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown application status '{raw}'").into(),
        )
    })
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&row.get::<_, String>(2)?),
        updated_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn row_to_token(row: &Row<'_>) -> rusqlite::Result<Token> {
    Ok(Token {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        is_admin: row.get(3)?,
        user_id: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        expires_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
        last_used_at: row.get::<_, Option<String>>(7)?.map(|s| parse_datetime(&s)),
    })
}

fn row_to_company(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        website: row.get(3)?,
        location: row.get(4)?,
        industry: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn row_to_application(row: &Row<'_>) -> rusqlite::Result<Application> {
    let date_applied = date_column(row, 5)?.ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Null, "missing date_applied".into())
    })?;

    Ok(Application {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        company_id: row.get(2)?,
        position: row.get(3)?,
        status: status_column(row, 4)?,
        date_applied,
        notes: row.get(6)?,
        interview_date: date_column(row, 7)?,
        offer_date: date_column(row, 8)?,
        rejected_date: date_column(row, 9)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?),
        updated_at: parse_datetime(&row.get::<_, String>(11)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO users (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id,
                user.name,
                format_datetime(&user.created_at),
                format_datetime(&user.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.conn()
            .query_row(
                "SELECT id, name, created_at, updated_at FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()
            .map_err(Error::from)
    }

    fn get_user_by_name(&self, name: &str) -> Result<Option<User>> {
        self.conn()
            .query_row(
                "SELECT id, name, created_at, updated_at FROM users WHERE name = ?1",
                params![name],
                row_to_user,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_users(&self, cursor: &str, limit: i32) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM users WHERE name > ?1 ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![cursor, limit], row_to_user)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_user(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // Applications reference companies without ON DELETE, so they go first.
        tx.execute("DELETE FROM applications WHERE owner_id = ?1", params![id])?;
        let rows = tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(rows > 0)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, is_admin, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.is_admin,
                token.user_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::TokenLookupCollision)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        self.conn()
            .query_row(
                "SELECT id, token_hash, token_lookup, is_admin, user_id, created_at, expires_at, last_used_at
                 FROM tokens WHERE token_lookup = ?1",
                params![lookup],
                row_to_token,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_user_tokens(&self, user_id: &str) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, token_hash, token_lookup, is_admin, user_id, created_at, expires_at, last_used_at
             FROM tokens WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map(params![user_id], row_to_token)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    // Company operations

    fn insert_company(&self, company: &Company) -> Result<()> {
        self.conn().execute(
            "INSERT INTO companies (id, owner_id, name, website, location, industry, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                company.id,
                company.owner_id,
                company.name,
                company.website,
                company.location,
                company.industry,
                format_datetime(&company.created_at),
                format_datetime(&company.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_company(&self, owner_id: &str, id: &str) -> Result<Option<Company>> {
        self.conn()
            .query_row(
                &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?1 AND owner_id = ?2"),
                params![id, owner_id],
                row_to_company,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_companies(&self, owner_id: &str) -> Result<Vec<Company>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE owner_id = ?1
             ORDER BY name COLLATE NOCASE, id"
        ))?;

        let rows = stmt.query_map(params![owner_id], row_to_company)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_company(&self, company: &Company) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE companies SET name = ?1, website = ?2, location = ?3, industry = ?4, updated_at = ?5
             WHERE id = ?6 AND owner_id = ?7",
            params![
                company.name,
                company.website,
                company.location,
                company.industry,
                format_datetime(&company.updated_at),
                company.id,
                company.owner_id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_company(&self, owner_id: &str, id: &str, cascade: bool) -> Result<Option<usize>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let referencing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM applications WHERE company_id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        if referencing > 0 && !cascade {
            return Err(company_in_use(referencing));
        }

        let removed = if cascade {
            tx.execute(
                "DELETE FROM applications WHERE company_id = ?1 AND owner_id = ?2",
                params![id, owner_id],
            )?
        } else {
            0
        };

        let rows = match tx.execute(
            "DELETE FROM companies WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
        ) {
            Ok(rows) => rows,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(company_in_use(referencing));
            }
            Err(e) => return Err(Error::from(e)),
        };

        if rows == 0 {
            return Ok(None);
        }

        tx.commit()?;
        Ok(Some(removed))
    }

    // Application operations

    fn insert_application(&self, app: &Application) -> Result<()> {
        self.conn().execute(
            "INSERT INTO applications (id, owner_id, company_id, position, status, date_applied, notes,
                 interview_date, offer_date, rejected_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                app.id,
                app.owner_id,
                app.company_id,
                app.position,
                app.status.as_str(),
                format_date(&app.date_applied),
                app.notes,
                app.interview_date.as_ref().map(format_date),
                app.offer_date.as_ref().map(format_date),
                app.rejected_date.as_ref().map(format_date),
                format_datetime(&app.created_at),
                format_datetime(&app.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_application(&self, owner_id: &str, id: &str) -> Result<Option<Application>> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?1 AND owner_id = ?2"
                ),
                params![id, owner_id],
                row_to_application,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_applications(&self, owner_id: &str) -> Result<Vec<Application>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE owner_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;

        let rows = stmt.query_map(params![owner_id], row_to_application)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_application(&self, app: &Application) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE applications SET company_id = ?1, position = ?2, status = ?3, date_applied = ?4,
                 notes = ?5, interview_date = ?6, offer_date = ?7, rejected_date = ?8, updated_at = ?9
             WHERE id = ?10 AND owner_id = ?11",
            params![
                app.company_id,
                app.position,
                app.status.as_str(),
                format_date(&app.date_applied),
                app.notes,
                app.interview_date.as_ref().map(format_date),
                app.offer_date.as_ref().map(format_date),
                app.rejected_date.as_ref().map(format_date),
                format_datetime(&app.updated_at),
                app.id,
                app.owner_id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_application(&self, owner_id: &str, id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM applications WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
        )?;
        Ok(rows > 0)
    }

    // Admin token check

    fn has_admin_token(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM tokens WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
