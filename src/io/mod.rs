//! File system access: vault scanning, note reading and writing, and the
//! state file holding the latest search results.

pub mod reader;
pub mod scanner;
pub mod state;
pub mod writer;

pub use reader::{NoteReader, ReaderConfig};
pub use scanner::{ScannedFile, ScannerConfig, VaultScanner};
pub use state::{ResultStore, StoredResults};
pub use writer::{write_atomic, NoteWriter, WriteResult, WriterConfig};
