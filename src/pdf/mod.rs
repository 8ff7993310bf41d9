pub mod assemble;
pub mod document;

pub use assemble::assemble;
pub use document::PdfDocument;

#[cfg(test)]
pub(crate) use document::fixtures;
