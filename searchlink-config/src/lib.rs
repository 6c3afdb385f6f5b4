// Settings and credentials for searchlink
//
// Values come from the process environment, optionally seeded from a `.env`
// file. Each settings type is read at most once per process through its
// `load()` function; `from_source` builds a value from any key/value source
// without caching.

pub mod error;
pub mod settings;
pub mod source;

pub use error::{ConfigError, Result};
pub use settings::{
    keys, PublishSettings, SearchSettings, DEFAULT_INDEX, QUEUE_SERVICE, SEARCH_SERVICE,
};
pub use source::{ConfigSource, EnvSource, MapSource};
