mod admin;

pub use admin::{Profile, SupabaseAdmin, SupabaseError};
