//! SQLite store backend for persistent libraries.

use super::{HierarchyStore, PictureStore, Settings, SettingsStore};
use crate::core::classifier::PictureKind;
use crate::core::hasher::Fingerprint;
use crate::core::hierarchy::{
    CurationStatus, HierarchyNode, NewNode, NewPicture, NodeKind, Picture, SubFolder,
};
use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS hierarchies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        parent_id INTEGER,
        kind TEXT NOT NULL,
        name TEXT NOT NULL,
        uuid TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_hierarchies_parent ON hierarchies(parent_id, name);

    CREATE TABLE IF NOT EXISTS sub_folders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        location TEXT NOT NULL,
        hierarchy_id INTEGER NOT NULL REFERENCES hierarchies(id)
    );
    CREATE INDEX IF NOT EXISTS idx_sub_folders_hierarchy ON sub_folders(hierarchy_id);

    CREATE TABLE IF NOT EXISTS pictures (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sequence TEXT NOT NULL,
        file_name TEXT NOT NULL,
        extension TEXT NOT NULL,
        kind TEXT NOT NULL,
        location TEXT NOT NULL,
        curation_status TEXT NOT NULL,
        sharpness INTEGER NOT NULL,
        fingerprint INTEGER NOT NULL,
        sub_folder_id INTEGER NOT NULL REFERENCES sub_folders(id)
    );
    CREATE INDEX IF NOT EXISTS idx_pictures_sub_folder ON pictures(sub_folder_id);

    CREATE TABLE IF NOT EXISTS settings (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        theme_mode TEXT NOT NULL,
        library_path TEXT NOT NULL
    );
";

const PICTURE_COLUMNS: &str = "p.id, p.sequence, p.file_name, p.extension, p.kind, p.location, \
     p.curation_status, p.sharpness, p.fingerprint, p.sub_folder_id";

/// SQLite-backed library store
///
/// Uses WAL mode so readers are not blocked by an import in progress.
/// Foreign keys are enforced, so a picture can only reference an
/// existing subfolder.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create a library database at the given path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| StoreError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::with_connection(conn, path.to_path_buf())
    }

    /// Open a private database that disappears when dropped
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            reason: e.to_string(),
        })?;

        Self::with_connection(conn, PathBuf::from(":memory:"))
    }

    fn with_connection(conn: Connection, db_path: PathBuf) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;

        tracing::debug!(path = %db_path.display(), "Library database ready");

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned {
            path: self.db_path.clone(),
        })
    }

    fn path_to_string(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    // Fingerprints are unsigned; SQLite integers are signed. Bit-cast both ways.
    fn fingerprint_to_sql(fingerprint: Fingerprint) -> i64 {
        fingerprint.value() as i64
    }

    fn fingerprint_from_sql(value: i64) -> Fingerprint {
        Fingerprint::new(value as u64)
    }

    fn read_picture(row: &Row<'_>) -> rusqlite::Result<RawPicture> {
        Ok(RawPicture {
            id: row.get(0)?,
            index: row.get(1)?,
            file_name: row.get(2)?,
            extension: row.get(3)?,
            kind: row.get(4)?,
            location: row.get(5)?,
            curation_status: row.get(6)?,
            sharpness: row.get(7)?,
            fingerprint: row.get(8)?,
            sub_folder_id: row.get(9)?,
        })
    }

    fn query_pictures(
        conn: &Connection,
        filter: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Picture>, StoreError> {
        let sql = format!("SELECT {} FROM pictures p {} ORDER BY p.id", PICTURE_COLUMNS, filter);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(args, Self::read_picture)?;

        let mut pictures = Vec::new();
        for row in rows {
            pictures.push(row?.into_picture()?);
        }
        Ok(pictures)
    }
}

/// A picture row before its text columns are parsed
struct RawPicture {
    id: i64,
    index: String,
    file_name: String,
    extension: String,
    kind: String,
    location: String,
    curation_status: String,
    sharpness: i64,
    fingerprint: i64,
    sub_folder_id: i64,
}

impl RawPicture {
    fn into_picture(self) -> Result<Picture, StoreError> {
        let kind = self
            .kind
            .parse::<PictureKind>()
            .map_err(|_| StoreError::InvalidValue {
                field: "kind",
                value: self.kind.clone(),
            })?;
        let curation_status = self
            .curation_status
            .parse::<CurationStatus>()
            .map_err(|_| StoreError::InvalidValue {
                field: "curation_status",
                value: self.curation_status.clone(),
            })?;
        let sharpness = u32::try_from(self.sharpness).map_err(|_| StoreError::InvalidValue {
            field: "sharpness",
            value: self.sharpness.to_string(),
        })?;

        Ok(Picture {
            id: self.id,
            index: self.index,
            file_name: self.file_name,
            extension: self.extension,
            kind,
            location: PathBuf::from(self.location),
            curation_status,
            sharpness,
            fingerprint: SqliteStore::fingerprint_from_sql(self.fingerprint),
            sub_folder_id: self.sub_folder_id,
        })
    }
}

impl HierarchyStore for SqliteStore {
    fn create_node(&self, node: NewNode) -> Result<HierarchyNode, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO hierarchies (parent_id, kind, name, uuid) VALUES (?1, ?2, ?3, ?4)",
            params![node.parent_id, node.kind.as_str(), node.name, node.uuid],
        )?;
        let id = tx.last_insert_rowid();

        let mut sub_folders = Vec::with_capacity(node.sub_folders.len());
        for sub_folder in node.sub_folders {
            tx.execute(
                "INSERT INTO sub_folders (name, location, hierarchy_id) VALUES (?1, ?2, ?3)",
                params![sub_folder.name, Self::path_to_string(&sub_folder.location), id],
            )?;
            sub_folders.push(SubFolder {
                id: tx.last_insert_rowid(),
                name: sub_folder.name,
                location: sub_folder.location,
                hierarchy_id: id,
                pictures: Vec::new(),
            });
        }

        tx.commit()?;

        Ok(HierarchyNode {
            id,
            parent_id: node.parent_id,
            name: node.name,
            kind: node.kind,
            uuid: node.uuid,
            sub_folders,
        })
    }

    fn find_all_nodes(&self) -> Result<Vec<HierarchyNode>, StoreError> {
        let conn = self.lock()?;

        let mut by_sub_folder: HashMap<i64, Vec<Picture>> = HashMap::new();
        for picture in Self::query_pictures(&conn, "", &[])? {
            by_sub_folder
                .entry(picture.sub_folder_id)
                .or_default()
                .push(picture);
        }

        let mut by_node: HashMap<i64, Vec<SubFolder>> = HashMap::new();
        let mut stmt =
            conn.prepare("SELECT id, name, location, hierarchy_id FROM sub_folders ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(SubFolder {
                id: row.get(0)?,
                name: row.get(1)?,
                location: PathBuf::from(row.get::<_, String>(2)?),
                hierarchy_id: row.get(3)?,
                pictures: Vec::new(),
            })
        })?;
        for row in rows {
            let mut sub_folder = row?;
            sub_folder.pictures = by_sub_folder.remove(&sub_folder.id).unwrap_or_default();
            by_node.entry(sub_folder.hierarchy_id).or_default().push(sub_folder);
        }

        let mut stmt = conn.prepare(
            "SELECT id, parent_id, kind, name, uuid FROM hierarchies ORDER BY name, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut nodes = Vec::new();
        for row in rows {
            let (id, parent_id, kind, name, uuid) = row?;
            let kind = kind
                .parse::<NodeKind>()
                .map_err(|_| StoreError::InvalidValue {
                    field: "kind",
                    value: kind.clone(),
                })?;

            nodes.push(HierarchyNode {
                id,
                parent_id,
                name,
                kind,
                uuid,
                sub_folders: by_node.remove(&id).unwrap_or_default(),
            });
        }

        Ok(nodes)
    }

    fn find_duplicate(
        &self,
        parent_id: Option<i64>,
        name: &str,
        kind: NodeKind,
    ) -> Result<bool, StoreError> {
        let conn = self.lock()?;

        // `IS` compares NULL parents as equal, unlike `=`.
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM hierarchies WHERE parent_id IS ?1 AND name = ?2 AND kind = ?3
             )",
            params![parent_id, name, kind.as_str()],
            |row| row.get(0),
        )?;

        Ok(exists)
    }
}

impl PictureStore for SqliteStore {
    fn create_picture(&self, picture: NewPicture) -> Result<Picture, StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO pictures (sequence, file_name, extension, kind, location,
                                   curation_status, sharpness, fingerprint, sub_folder_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                picture.index,
                picture.file_name,
                picture.extension,
                picture.kind.as_str(),
                Self::path_to_string(&picture.location),
                picture.curation_status.as_str(),
                picture.sharpness as i64,
                Self::fingerprint_to_sql(picture.fingerprint),
                picture.sub_folder_id,
            ],
        )?;

        Ok(picture.with_id(conn.last_insert_rowid()))
    }

    fn find_all_pictures(&self) -> Result<Vec<Picture>, StoreError> {
        let conn = self.lock()?;
        Self::query_pictures(&conn, "", &[])
    }

    fn find_picture(&self, id: i64) -> Result<Option<Picture>, StoreError> {
        let conn = self.lock()?;

        let sql = format!("SELECT {} FROM pictures p WHERE p.id = ?1", PICTURE_COLUMNS);
        let raw = conn
            .query_row(&sql, [id], Self::read_picture)
            .optional()?;

        raw.map(RawPicture::into_picture).transpose()
    }

    fn find_pictures_by_hierarchy(&self, hierarchy_id: i64) -> Result<Vec<Picture>, StoreError> {
        let conn = self.lock()?;
        Self::query_pictures(
            &conn,
            "JOIN sub_folders s ON p.sub_folder_id = s.id WHERE s.hierarchy_id = ?1",
            &[&hierarchy_id],
        )
    }

    fn update_picture(&self, picture: &Picture) -> Result<(), StoreError> {
        let conn = self.lock()?;

        let changed = conn.execute(
            "UPDATE pictures SET sequence = ?1, file_name = ?2, extension = ?3, kind = ?4,
                                 location = ?5, curation_status = ?6, sharpness = ?7,
                                 fingerprint = ?8, sub_folder_id = ?9
             WHERE id = ?10",
            params![
                picture.index,
                picture.file_name,
                picture.extension,
                picture.kind.as_str(),
                Self::path_to_string(&picture.location),
                picture.curation_status.as_str(),
                picture.sharpness as i64,
                Self::fingerprint_to_sql(picture.fingerprint),
                picture.sub_folder_id,
                picture.id,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "picture",
                id: picture.id,
            });
        }
        Ok(())
    }
}

impl SettingsStore for SqliteStore {
    fn settings(&self) -> Result<Settings, StoreError> {
        let conn = self.lock()?;

        let defaults = Settings::default();
        conn.execute(
            "INSERT OR IGNORE INTO settings (id, theme_mode, library_path) VALUES (1, ?1, ?2)",
            params![defaults.theme_mode, defaults.library_path],
        )?;

        let settings = conn.query_row(
            "SELECT theme_mode, library_path FROM settings WHERE id = 1",
            [],
            |row| {
                Ok(Settings {
                    theme_mode: row.get(0)?,
                    library_path: row.get(1)?,
                })
            },
        )?;

        Ok(settings)
    }

    fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT OR REPLACE INTO settings (id, theme_mode, library_path) VALUES (1, ?1, ?2)",
            params![settings.theme_mode, settings.library_path],
        )?;

        Ok(())
    }
}
