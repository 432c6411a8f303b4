use anyhow::Result;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use std::{
    path::Path,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use super::traits::{
    AgeGenderFilter, AgeGenderRow, Conflict, NewAgeGender, NewWardStat, Storage, StorageRead,
    StorageTx, StorageWrite, User, WardDemographic, WardStatRow,
};
use crate::types::{Category, Role, WardNumber};

const DB_SCHEMA_VERSION: i64 = 2;

const SCHEMA_V1: &str = r#"
CREATE TABLE ward_demographics (
    ward_number INTEGER PRIMARY KEY CHECK (ward_number BETWEEN 1 AND 32),
    total_population INTEGER NOT NULL CHECK (total_population >= 0),
    male INTEGER NOT NULL CHECK (male >= 0),
    female INTEGER NOT NULL CHECK (female >= 0),
    other INTEGER NOT NULL CHECK (other >= 0),
    households INTEGER NOT NULL CHECK (households >= 0),
    area_sq_km REAL NOT NULL CHECK (area_sq_km >= 0)
);
CREATE TABLE age_gender_population (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ward_number INTEGER NOT NULL CHECK (ward_number BETWEEN 1 AND 32),
    age_group TEXT NOT NULL,
    gender TEXT NOT NULL,
    population INTEGER NOT NULL CHECK (population >= 0),
    UNIQUE (ward_number, age_group, gender)
);
CREATE TABLE ward_statistics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ward_number INTEGER NOT NULL CHECK (ward_number BETWEEN 1 AND 32),
    category TEXT NOT NULL,
    label TEXT NOT NULL CHECK (length(trim(label)) > 0),
    count INTEGER NOT NULL CHECK (count >= 0),
    UNIQUE (ward_number, category, label)
);
CREATE INDEX ward_statistics_category_idx
    ON ward_statistics(category, ward_number);
CREATE TABLE legacy_ward_statistics (
    ward_no INTEGER NOT NULL,
    stat_type TEXT NOT NULL,
    stat_key TEXT NOT NULL,
    stat_value INTEGER NOT NULL
);
"#;

const SCHEMA_V2: &str = r#"
CREATE TABLE users (
    token_hash TEXT PRIMARY KEY CHECK (length(token_hash) = 64),
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

pub struct SqliteTx {
    conn: Connection,
}

impl StorageTx for SqliteTx {
    fn commit(self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }
}

fn conversion_error<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn get_count(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|err| conversion_error(idx, Type::Integer, err))
}

fn get_ward(row: &Row<'_>, idx: usize) -> rusqlite::Result<WardNumber> {
    let value: i64 = row.get(idx)?;
    WardNumber::try_from(value).map_err(|err| conversion_error(idx, Type::Integer, err))
}

fn get_parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.get(idx)?;
    value
        .parse::<T>()
        .map_err(|err| conversion_error(idx, Type::Text, err))
}

fn count_param(value: u64) -> rusqlite::Result<i64> {
    i64::try_from(value).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

fn ward_param(ward: Option<WardNumber>) -> Option<i64> {
    ward.map(|w| i64::from(w.get()))
}

fn map_write_error(err: rusqlite::Error) -> anyhow::Error {
    if let rusqlite::Error::SqliteFailure(inner, message) = &err {
        if inner.code == rusqlite::ErrorCode::ConstraintViolation {
            let detail = message.clone().unwrap_or_else(|| inner.to_string());
            return Conflict(detail).into();
        }
    }
    err.into()
}

fn map_demographic_row(row: &Row<'_>) -> rusqlite::Result<WardDemographic> {
    Ok(WardDemographic {
        ward: get_ward(row, 0)?,
        total_population: get_count(row, 1)?,
        male: get_count(row, 2)?,
        female: get_count(row, 3)?,
        other: get_count(row, 4)?,
        households: get_count(row, 5)?,
        area_sq_km: row.get(6)?,
    })
}

fn db_list_ward_demographics(
    conn: &Connection,
    ward: Option<WardNumber>,
) -> rusqlite::Result<Vec<WardDemographic>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT ward_number, total_population, male, female, other, households, area_sq_km
        FROM ward_demographics
        WHERE (?1 IS NULL OR ward_number = ?1)
        ORDER BY ward_number
        "#,
    )?;
    let rows = stmt
        .query_map(params![ward_param(ward)], map_demographic_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn map_age_gender_row(row: &Row<'_>) -> rusqlite::Result<AgeGenderRow> {
    Ok(AgeGenderRow {
        id: row.get(0)?,
        ward: get_ward(row, 1)?,
        age_group: get_parsed(row, 2)?,
        gender: get_parsed(row, 3)?,
        population: get_count(row, 4)?,
    })
}

fn db_list_age_gender(
    conn: &Connection,
    filter: &AgeGenderFilter,
) -> rusqlite::Result<Vec<AgeGenderRow>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, ward_number, age_group, gender, population
        FROM age_gender_population
        WHERE (?1 IS NULL OR ward_number = ?1)
          AND (?2 IS NULL OR gender = ?2)
        ORDER BY ward_number, id
        "#,
    )?;
    let mut rows = stmt
        .query_map(
            params![ward_param(filter.ward), filter.gender.map(|g| g.as_str())],
            map_age_gender_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    // Age labels do not sort lexically.
    rows.sort_by_key(|r| (r.ward, r.age_group, r.gender));
    Ok(rows)
}

fn map_ward_stat_row(row: &Row<'_>) -> rusqlite::Result<WardStatRow> {
    Ok(WardStatRow {
        id: row.get(0)?,
        ward: get_ward(row, 1)?,
        category: get_parsed(row, 2)?,
        label: row.get(3)?,
        count: get_count(row, 4)?,
    })
}

fn db_list_ward_stats(
    conn: &Connection,
    category: Category,
    ward: Option<WardNumber>,
) -> rusqlite::Result<Vec<WardStatRow>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, ward_number, category, label, count
        FROM ward_statistics
        WHERE category = ?1
          AND (?2 IS NULL OR ward_number = ?2)
        ORDER BY ward_number, label
        "#,
    )?;
    let rows = stmt
        .query_map(
            params![category.slug(), ward_param(ward)],
            map_ward_stat_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_list_legacy_ward_stats(
    conn: &Connection,
    category: Category,
    ward: Option<WardNumber>,
) -> rusqlite::Result<Vec<WardStatRow>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT rowid, ward_no, stat_key, stat_value
        FROM legacy_ward_statistics
        WHERE stat_type = ?1
          AND (?2 IS NULL OR ward_no = ?2)
          AND ward_no BETWEEN 1 AND 32
          AND stat_value >= 0
          AND length(trim(stat_key)) > 0
        ORDER BY ward_no, stat_key
        "#,
    )?;
    let rows = stmt
        .query_map(params![category.legacy_key(), ward_param(ward)], |row| {
            Ok(WardStatRow {
                id: row.get(0)?,
                ward: get_ward(row, 1)?,
                category,
                label: row.get(2)?,
                count: get_count(row, 3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_load_user_by_token_hash(
    conn: &Connection,
    token_hash: &str,
) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT name, role FROM users WHERE token_hash = ?1",
        params![token_hash],
        |row| {
            Ok(User {
                name: row.get(0)?,
                role: get_parsed::<Role>(row, 1)?,
            })
        },
    )
    .optional()
}

fn db_upsert_ward_demographic(
    conn: &Connection,
    record: &WardDemographic,
) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        INSERT INTO ward_demographics (
            ward_number, total_population, male, female, other, households, area_sq_km
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(ward_number) DO UPDATE SET
            total_population = excluded.total_population,
            male = excluded.male,
            female = excluded.female,
            other = excluded.other,
            households = excluded.households,
            area_sq_km = excluded.area_sq_km
        "#,
        params![
            i64::from(record.ward.get()),
            count_param(record.total_population)?,
            count_param(record.male)?,
            count_param(record.female)?,
            count_param(record.other)?,
            count_param(record.households)?,
            record.area_sq_km
        ],
    )?;
    Ok(())
}

fn db_delete_ward_demographic(conn: &Connection, ward: WardNumber) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM ward_demographics WHERE ward_number = ?1",
        params![i64::from(ward.get())],
    )?;
    Ok(rows > 0)
}

fn db_insert_age_gender(conn: &Connection, record: &NewAgeGender) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO age_gender_population (ward_number, age_group, gender, population)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            i64::from(record.ward.get()),
            record.age_group.label(),
            record.gender.as_str(),
            count_param(record.population)?
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn db_update_age_gender(
    conn: &Connection,
    id: i64,
    record: &NewAgeGender,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        r#"
        UPDATE age_gender_population
        SET ward_number = ?1, age_group = ?2, gender = ?3, population = ?4
        WHERE id = ?5
        "#,
        params![
            i64::from(record.ward.get()),
            record.age_group.label(),
            record.gender.as_str(),
            count_param(record.population)?,
            id
        ],
    )?;
    Ok(rows > 0)
}

fn db_delete_age_gender(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM age_gender_population WHERE id = ?1",
        params![id],
    )?;
    Ok(rows > 0)
}

fn db_insert_ward_stat(conn: &Connection, record: &NewWardStat) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO ward_statistics (ward_number, category, label, count)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            i64::from(record.ward.get()),
            record.category.slug(),
            record.label.trim(),
            count_param(record.count)?
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn db_update_ward_stat(
    conn: &Connection,
    id: i64,
    record: &NewWardStat,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        r#"
        UPDATE ward_statistics
        SET ward_number = ?1, category = ?2, label = ?3, count = ?4
        WHERE id = ?5
        "#,
        params![
            i64::from(record.ward.get()),
            record.category.slug(),
            record.label.trim(),
            count_param(record.count)?,
            id
        ],
    )?;
    Ok(rows > 0)
}

fn db_delete_ward_stat(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM ward_statistics WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

fn db_save_user(conn: &Connection, token_hash: &str, user: &User) -> rusqlite::Result<()> {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    conn.execute(
        "INSERT INTO users (token_hash, name, role, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![token_hash, user.name, user.role.as_str(), created_at],
    )?;
    Ok(())
}

impl StorageRead for SqliteTx {
    fn list_ward_demographics(&self, ward: Option<WardNumber>) -> Result<Vec<WardDemographic>> {
        Ok(db_list_ward_demographics(&self.conn, ward)?)
    }

    fn list_age_gender(&self, filter: &AgeGenderFilter) -> Result<Vec<AgeGenderRow>> {
        Ok(db_list_age_gender(&self.conn, filter)?)
    }

    fn list_ward_stats(
        &self,
        category: Category,
        ward: Option<WardNumber>,
    ) -> Result<Vec<WardStatRow>> {
        Ok(db_list_ward_stats(&self.conn, category, ward)?)
    }

    fn list_legacy_ward_stats(
        &self,
        category: Category,
        ward: Option<WardNumber>,
    ) -> Result<Vec<WardStatRow>> {
        Ok(db_list_legacy_ward_stats(&self.conn, category, ward)?)
    }

    fn load_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>> {
        Ok(db_load_user_by_token_hash(&self.conn, token_hash)?)
    }
}

impl StorageWrite for SqliteTx {
    fn upsert_ward_demographic(&self, record: &WardDemographic) -> Result<()> {
        db_upsert_ward_demographic(&self.conn, record).map_err(map_write_error)
    }

    fn delete_ward_demographic(&self, ward: WardNumber) -> Result<bool> {
        Ok(db_delete_ward_demographic(&self.conn, ward)?)
    }

    fn insert_age_gender(&self, record: &NewAgeGender) -> Result<i64> {
        db_insert_age_gender(&self.conn, record).map_err(map_write_error)
    }

    fn update_age_gender(&self, id: i64, record: &NewAgeGender) -> Result<bool> {
        db_update_age_gender(&self.conn, id, record).map_err(map_write_error)
    }

    fn delete_age_gender(&self, id: i64) -> Result<bool> {
        Ok(db_delete_age_gender(&self.conn, id)?)
    }

    fn insert_ward_stat(&self, record: &NewWardStat) -> Result<i64> {
        db_insert_ward_stat(&self.conn, record).map_err(map_write_error)
    }

    fn update_ward_stat(&self, id: i64, record: &NewWardStat) -> Result<bool> {
        db_update_ward_stat(&self.conn, id, record).map_err(map_write_error)
    }

    fn delete_ward_stat(&self, id: i64) -> Result<bool> {
        Ok(db_delete_ward_stat(&self.conn, id)?)
    }

    fn save_user(&self, token_hash: &str, user: &User) -> Result<()> {
        db_save_user(&self.conn, token_hash, user).map_err(map_write_error)
    }
}

impl Storage for SqliteStorage {
    type Tx = SqliteTx;

    fn begin_tx(&self) -> Result<Self::Tx> {
        let conn = self.open()?;
        Self::migrate(&conn)?;
        conn.execute("BEGIN IMMEDIATE", [])?;

        Ok(SqliteTx { conn })
    }
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        for suffix in ["", "-wal", "-shm"] {
            let file = format!("{}{}", self.path, suffix);
            if Path::new(&file).exists() {
                std::fs::remove_file(&file)?;
            }
        }
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;
        Ok(conn)
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.open()?;
        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        match version {
            0 => {
                conn.execute_batch(SCHEMA_V1)?;
                conn.execute_batch(SCHEMA_V2)?;
            }
            // v1 predates role-gated mutations.
            1 => conn.execute_batch(SCHEMA_V2)?,
            _ => {
                return Err(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
                    Some(
                        "database schema version mismatch; please run with --reset option"
                            .to_string(),
                    ),
                ))
            }
        }

        conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
        Ok(())
    }
}

impl StorageRead for SqliteStorage {
    fn list_ward_demographics(&self, ward: Option<WardNumber>) -> Result<Vec<WardDemographic>> {
        let rows = self.with_conn(|conn| db_list_ward_demographics(conn, ward))?;
        Ok(rows)
    }

    fn list_age_gender(&self, filter: &AgeGenderFilter) -> Result<Vec<AgeGenderRow>> {
        let rows = self.with_conn(|conn| db_list_age_gender(conn, filter))?;
        Ok(rows)
    }

    fn list_ward_stats(
        &self,
        category: Category,
        ward: Option<WardNumber>,
    ) -> Result<Vec<WardStatRow>> {
        let rows = self.with_conn(|conn| db_list_ward_stats(conn, category, ward))?;
        Ok(rows)
    }

    fn list_legacy_ward_stats(
        &self,
        category: Category,
        ward: Option<WardNumber>,
    ) -> Result<Vec<WardStatRow>> {
        let rows = self.with_conn(|conn| db_list_legacy_ward_stats(conn, category, ward))?;
        Ok(rows)
    }

    fn load_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>> {
        let user = self.with_conn(|conn| db_load_user_by_token_hash(conn, token_hash))?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ward_stats_with_fallback;
    use crate::types::{AgeGroup, Gender};
    use tempfile::TempDir;

    fn temp_storage() -> (TempDir, SqliteStorage) {
        let dir = tempfile::tempdir().expect("create temp dir for db");
        let storage = SqliteStorage::new(dir.path().join("profile.sqlite"));
        storage.init().unwrap();
        (dir, storage)
    }

    fn ward(n: u8) -> WardNumber {
        WardNumber::new(n).unwrap()
    }

    fn demographic(n: u8, total: u64) -> WardDemographic {
        WardDemographic {
            ward: ward(n),
            total_population: total,
            male: total / 2,
            female: total - total / 2,
            other: 0,
            households: total / 4,
            area_sq_km: 12.5,
        }
    }

    fn stat(n: u8, label: &str, count: u64) -> NewWardStat {
        NewWardStat {
            ward: ward(n),
            category: Category::RoofMaterial,
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn sqlite_reset_all_ok_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sqlite");
        let repo = SqliteStorage::new(&path);
        repo.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_reset_all_removes_existing_file() {
        let (dir, repo) = temp_storage();
        let path = dir.path().join("profile.sqlite");
        assert!(path.exists());
        repo.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_init_installs_schema() {
        let (dir, _repo) = temp_storage();
        let conn = Connection::open(dir.path().join("profile.sqlite")).unwrap();
        for table in [
            "ward_demographics",
            "age_gender_population",
            "ward_statistics",
            "legacy_ward_statistics",
            "users",
        ] {
            let found = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .unwrap();
            assert_eq!(found.as_deref(), Some(table));
        }
        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn sqlite_migrates_v1_database_by_adding_users() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v1.sqlite");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA_V1).unwrap();
            conn.pragma_update(None, "user_version", 1).unwrap();
        }

        let repo = SqliteStorage::new(&path);
        repo.init().unwrap();
        assert_eq!(repo.load_user_by_token_hash(&"0".repeat(64)).unwrap(), None);
    }

    #[test]
    fn sqlite_fails_on_mismatched_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();

        let err = SqliteStorage::new(&path)
            .init()
            .expect_err("init should fail on version mismatch");
        let msg = format!("{err}");
        assert!(msg.contains("database schema version mismatch"));
        assert!(msg.contains("--reset"));
    }

    #[test]
    fn sqlite_upsert_ward_demographic_replaces_row() {
        let (_dir, repo) = temp_storage();
        let tx = repo.begin_tx().unwrap();
        tx.upsert_ward_demographic(&demographic(2, 1000)).unwrap();
        tx.upsert_ward_demographic(&demographic(1, 800)).unwrap();
        tx.upsert_ward_demographic(&demographic(2, 1200)).unwrap();
        tx.commit().unwrap();

        let all = repo.list_ward_demographics(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].ward, ward(1));
        assert_eq!(all[1].total_population, 1200);

        let only = repo.list_ward_demographics(Some(ward(2))).unwrap();
        assert_eq!(only, vec![demographic(2, 1200)]);
    }

    #[test]
    fn sqlite_delete_reports_missing_rows() {
        let (_dir, repo) = temp_storage();
        let tx = repo.begin_tx().unwrap();
        tx.upsert_ward_demographic(&demographic(3, 10)).unwrap();
        assert!(tx.delete_ward_demographic(ward(3)).unwrap());
        assert!(!tx.delete_ward_demographic(ward(3)).unwrap());
        assert!(!tx.delete_ward_stat(42).unwrap());
        assert!(!tx.delete_age_gender(42).unwrap());
        tx.commit().unwrap();
    }

    #[test]
    fn sqlite_age_gender_sorted_by_age_band_and_filtered() {
        let (_dir, repo) = temp_storage();
        let tx = repo.begin_tx().unwrap();
        for (group, gender, population) in [
            (AgeGroup::Age10To14, Gender::Female, 30),
            (AgeGroup::Age5To9, Gender::Male, 20),
            (AgeGroup::Age5To9, Gender::Female, 25),
        ] {
            tx.insert_age_gender(&NewAgeGender {
                ward: ward(1),
                age_group: group,
                gender,
                population,
            })
            .unwrap();
        }
        tx.commit().unwrap();

        let rows = repo.list_age_gender(&AgeGenderFilter::default()).unwrap();
        let order: Vec<_> = rows.iter().map(|r| (r.age_group, r.gender)).collect();
        assert_eq!(
            order,
            vec![
                (AgeGroup::Age5To9, Gender::Male),
                (AgeGroup::Age5To9, Gender::Female),
                (AgeGroup::Age10To14, Gender::Female),
            ]
        );

        let females = repo
            .list_age_gender(&AgeGenderFilter {
                ward: None,
                gender: Some(Gender::Female),
            })
            .unwrap();
        assert_eq!(females.len(), 2);
    }

    #[test]
    fn sqlite_duplicate_ward_stat_is_a_conflict() {
        let (_dir, repo) = temp_storage();
        let tx = repo.begin_tx().unwrap();
        tx.insert_ward_stat(&stat(1, "Tin", 10)).unwrap();
        let err = tx.insert_ward_stat(&stat(1, "Tin", 11)).unwrap_err();
        assert!(err.downcast_ref::<Conflict>().is_some());
    }

    #[test]
    fn sqlite_update_ward_stat_changes_count() {
        let (_dir, repo) = temp_storage();
        let tx = repo.begin_tx().unwrap();
        let id = tx.insert_ward_stat(&stat(4, "Concrete", 10)).unwrap();
        assert!(tx.update_ward_stat(id, &stat(4, "Concrete", 15)).unwrap());
        assert!(!tx.update_ward_stat(id + 100, &stat(4, "Concrete", 1)).unwrap());
        tx.commit().unwrap();

        let rows = repo.list_ward_stats(Category::RoofMaterial, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 15);
    }

    #[test]
    fn sqlite_falls_back_to_legacy_table() {
        let (dir, repo) = temp_storage();
        let conn = Connection::open(dir.path().join("profile.sqlite")).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO legacy_ward_statistics VALUES (1, 'roof_material', 'Thatch', 40);
            INSERT INTO legacy_ward_statistics VALUES (2, 'roof_material', 'Tin', 60);
            INSERT INTO legacy_ward_statistics VALUES (0, 'roof_material', 'Stray', 5);
            INSERT INTO legacy_ward_statistics VALUES (2, 'roof_material', 'Broken', -3);
            INSERT INTO legacy_ward_statistics VALUES (1, 'caste', 'Magar', 7);
            "#,
        )
        .unwrap();

        let rows = ward_stats_with_fallback(&repo, Category::RoofMaterial, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.category == Category::RoofMaterial));
        assert_eq!(rows[0].label, "Thatch");

        let tx = repo.begin_tx().unwrap();
        tx.insert_ward_stat(&stat(1, "Tin", 5)).unwrap();
        tx.commit().unwrap();

        let rows = ward_stats_with_fallback(&repo, Category::RoofMaterial, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Tin");
    }

    #[test]
    fn ward_filter_does_not_switch_to_legacy_table() {
        let (dir, repo) = temp_storage();
        let conn = Connection::open(dir.path().join("profile.sqlite")).unwrap();
        conn.execute_batch(
            "INSERT INTO legacy_ward_statistics VALUES (2, 'roof_material', 'Thatch', 500);",
        )
        .unwrap();
        let tx = repo.begin_tx().unwrap();
        tx.insert_ward_stat(&stat(1, "Tin", 10)).unwrap();
        tx.commit().unwrap();

        let all = ward_stats_with_fallback(&repo, Category::RoofMaterial, None).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].label, "Tin");

        let ward_two = ward_stats_with_fallback(
            &repo,
            Category::RoofMaterial,
            Some(ward(2)),
        )
        .unwrap();
        assert!(ward_two.is_empty());

        let ward_one = ward_stats_with_fallback(
            &repo,
            Category::RoofMaterial,
            Some(ward(1)),
        )
        .unwrap();
        assert_eq!(ward_one.len(), 1);
        assert_eq!(ward_one[0].count, 10);
    }

    #[test]
    fn sqlite_users_round_trip() {
        let (_dir, repo) = temp_storage();
        let hash = "a".repeat(64);
        let tx = repo.begin_tx().unwrap();
        tx.save_user(
            &hash,
            &User {
                name: "ward-office".to_string(),
                role: Role::Editor,
            },
        )
        .unwrap();
        tx.commit().unwrap();

        let user = repo.load_user_by_token_hash(&hash).unwrap().unwrap();
        assert_eq!(user.role, Role::Editor);
        assert_eq!(repo.load_user_by_token_hash(&"b".repeat(64)).unwrap(), None);
    }
}
