//! Asset import: replacing shape characters with images or vector art

pub mod character_table;
pub mod image_format;
pub mod shape_importer;

pub use character_table::{CharacterContent, CharacterTable, CharacterTag, Rect, ShapeFill};
pub use image_format::ImageFormat;
pub use shape_importer::{shape_tag_kind, BulkImportReport, ImportOptions, ShapeImporter};
