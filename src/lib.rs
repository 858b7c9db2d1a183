//! Browse Double Fischer Random Chess analysis results and publish the
//! analysis notebooks as a static site.
//!
//! * [`data`]      – load the Parquet results table (local or remote)
//! * [`selection`] – the row picked in the table
//! * [`link`]      – selected row → Lichess analysis board URL
//! * [`site`]      – export notebooks to HTML and build the index page

pub mod data;
pub mod link;
pub mod selection;
pub mod site;
