//! The library code for the `heictrail` export post-processor. The
//! architecture is a fixed pipeline over a working copy of a journal
//! export, run in order by [`build::process_export`]:
//!
//! 1. Replicating the export tree ([`replicate`])
//! 2. Transcoding HEIC resources to PNG ([`transcode`])
//! 3. Transforming entry pages ([`entry`]): image references are
//!    rewritten to the transcoded PNGs, location sidecars ([`sidecar`])
//!    become an embedded map ([`map`]), and the shared styling
//!    ([`theme`]) is applied
//! 4. Aggregating every visit into one day-filterable map on the index
//!    page ([`index`])
//! 5. A final responsive polish pass over all pages
//!
//! Of these, the entry transformation is the most involved: each page is
//! parsed into a mutable tree, queried and rewritten through [`dom`], and
//! serialized back over itself. The index pass then re-reads the
//! rewritten pages, so it only ever sees PNG references.
//!
//! Everything is single-threaded and synchronous; a run is a plain
//! sequence of file reads and writes. Sidecar problems are logged and
//! contribute nothing, while structural problems (missing directories,
//! undecodable images, pages without a body) abort the run.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod dom;
pub mod entry;
pub mod index;
pub mod map;
pub mod replicate;
pub mod sidecar;
pub mod theme;
pub mod transcode;
pub mod util;
