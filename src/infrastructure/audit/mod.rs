//! Authentication audit log

mod in_memory;
mod sink;
mod sqlite;

pub use in_memory::InMemoryAuthLogRepository;
pub use sink::ChannelAuditSink;
pub use sqlite::SqliteAuthLogRepository;
