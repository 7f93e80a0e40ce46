pub mod resolve_once;
pub mod time;
