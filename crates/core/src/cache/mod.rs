mod error;
mod keys;
mod lookup;
mod patterns;
mod policy;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{entity_key, listing_key, listing_pattern, normalize_names, query_key};
pub use lookup::{evict, lookup, populate, CacheLookup};
pub use patterns::pattern_matches;
pub use policy::{ListingInvalidation, ParsePolicyError};
pub use serialization::{deserialize, serialize, SerializationError};
pub use traits::Cache;
