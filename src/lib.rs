// Public library interface for facet-grid
// The debug CLI tool and benches drive the engine through these modules

pub mod error;
pub mod facet;
pub mod layout;
pub mod view;

pub use error::GridError;
pub use facet::Key;
pub use layout::{Cell, CellId, Grid, GridAlignment, GridConfig, GridItem, Padding, Siblings};
