pub(super) const INSERT_ENTRY: &str = r#"
    INSERT INTO entries (
        remote_id,
        title,
        description,
        location,
        photo,
        created_at,
        display_date,
        synced
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    RETURNING id
"#;

pub(super) const UPSERT_ENTRY: &str = r#"
    INSERT INTO entries (
        id,
        remote_id,
        title,
        description,
        location,
        photo,
        created_at,
        display_date,
        synced
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(id) DO UPDATE SET
        remote_id = excluded.remote_id,
        title = excluded.title,
        description = excluded.description,
        location = excluded.location,
        photo = excluded.photo,
        created_at = excluded.created_at,
        display_date = excluded.display_date,
        synced = excluded.synced
"#;

const ENTRY_COLUMNS: &str = "id, remote_id, title, description, location, photo, created_at, display_date, synced";

pub(super) fn select_entries(filter: &str) -> String {
    format!("SELECT {ENTRY_COLUMNS} FROM entries {filter}")
}

pub(super) const ENTRY_BY_ID: &str = "WHERE id = ?1";
pub(super) const ENTRY_BY_REMOTE_ID: &str = "WHERE remote_id = ?1";
pub(super) const ALL_ENTRIES: &str = "ORDER BY id ASC";
pub(super) const UNSYNCED_ENTRIES: &str = "WHERE synced = 0 ORDER BY id ASC";

pub(super) const MARK_ENTRY_SYNCED: &str = r#"
    UPDATE entries
    SET synced = 1,
        remote_id = COALESCE(remote_id, ?2)
    WHERE id = ?1
"#;

pub(super) const DELETE_ALL_ENTRIES: &str = "DELETE FROM entries";

pub(super) const UPSERT_QUEUE_ITEM: &str = r#"
    INSERT INTO sync_queue (operation_type, entry_id, payload, enqueued_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(entry_id) DO UPDATE SET
        operation_type = excluded.operation_type,
        payload = excluded.payload,
        enqueued_at = excluded.enqueued_at
    RETURNING id
"#;

pub(super) const SELECT_QUEUE_ITEMS: &str = r#"
    SELECT id, operation_type, entry_id, payload, enqueued_at
    FROM sync_queue
    ORDER BY id ASC
"#;

pub(super) const DELETE_QUEUE_ITEM: &str = "DELETE FROM sync_queue WHERE id = ?1";
pub(super) const DELETE_ALL_QUEUE_ITEMS: &str = "DELETE FROM sync_queue";

pub(super) const UPSERT_SETTING: &str = r#"
    INSERT INTO settings (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

pub(super) const SELECT_SETTING: &str = "SELECT key, value, updated_at FROM settings WHERE key = ?1";
