pub mod entry;
pub mod sync_queue_item;
pub mod sync_status;
pub mod trip_reminder;

pub use entry::{format_display_date, parse_display_date, Entry, EntryDraft, RemoteEntry, DISPLAY_DATE_FORMAT};
pub use sync_queue_item::{SyncQueueItem, SyncQueueItemDraft};
pub use sync_status::{ReconcileOutcome, SyncNotice, SyncStatusSnapshot};
pub use trip_reminder::{ReminderKind, TripReminder};
