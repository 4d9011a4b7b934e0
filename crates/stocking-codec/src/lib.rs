//! Portable backup format for Stocking.
//!
//! A backup is one JSON object mapping each store key to an RFC 2397 data
//! URL (`data:<media-type>;base64,<payload>`), so both the bytes and their
//! content type survive a copy/paste or file transfer.
//!
//! # Architecture
//!
//! - [`dataurl`]: encode/decode a single payload
//! - [`document`]: the flat [`PortableDocument`]
//! - [`codec`]: [`export`] a store and [`import`] a document into one
//!
//! Export is all-or-nothing: one payload that cannot be encoded aborts the
//! whole export. Import is best-effort per entry: entries that fail to
//! decode are logged and skipped, and the survivors are written to the store
//! in a single atomic batch. Only a document that is not a flat object at
//! all is rejected outright.

pub mod codec;
pub mod dataurl;
pub mod document;
pub mod error;

pub use codec::{decode_document, export, export_store, import, DecodedDocument, ImportReport, SkippedEntry};
pub use dataurl::{decode_data_url, encode_data_url};
pub use document::PortableDocument;
pub use error::{CodecError, CodecResult, DataUrlError};
