//! Parameterized query descriptions and their validated form.

mod page;
mod params;
mod plan;

pub use page::{QueryPage, Row};
pub use params::{JoinSpec, QueryParams, DEFAULT_LIMIT};
pub use plan::{ColumnRef, PlannedJoin, QueryPlan, SelectedColumn, PARENT_TABLE};
