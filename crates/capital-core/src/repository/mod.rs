//! Repository Layer
//!
//! Remote collection abstractions and implementations.

mod error;
mod memory;
mod supabase;
mod traits;


pub use error::{RemoteError, RemoteResult, UNKNOWN_ERROR_MESSAGE};
pub use memory::MemoryCollection;
pub use supabase::SupabaseClient;
pub use traits::{DeletableCollection, RemoteCollection};
