// src/audit/mod.rs
// =============================================================================
// Single-page auditing: check every link on one page without following any
// of them.
//
// The deep crawler (src/crawl/) reuses the same building blocks (fetch,
// extract, probe) page by page.
// =============================================================================

mod page;

pub use page::audit_page;
