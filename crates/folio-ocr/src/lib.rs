//! External collaborators: HTTP OCR provider and external-tool rasterizer.
//!
//! Thin I/O wrappers around the [`folio_core::OcrEngine`] and
//! [`folio_core::Rasterizer`] seams. No interesting invariants live here;
//! the pipeline's tests substitute in-memory fakes for both.

pub mod http;
pub mod raster;

pub use http::HttpOcrEngine;
pub use raster::PdfRasterizer;
