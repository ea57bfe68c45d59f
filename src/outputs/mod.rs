//! Output generation for the archive and the static site.
//!
//! # Submodules
//!
//! - [`json`]: Writes and loads dated snapshots and `latest.json`
//! - [`indexes`]: Maintains the bounded date index (`index.json`)
//! - [`html`]: Renders pages and the redirect page as strings
//!
//! # Output Structure
//!
//! ```text
//! data/news/                 # written by ingest, read by publish
//! ├── 2024-01-03.json
//! ├── latest.json
//! └── index.json
//!
//! docs/TechNews/             # written by publish
//! ├── 2024-01-03.html
//! ├── index.html
//! └── assets/
//! ```

pub mod html;
pub mod indexes;
pub mod json;
