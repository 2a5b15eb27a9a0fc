//! Replacing shape characters with imported images or vector art

use super::character_table::{tag_code, CharacterContent, CharacterTable, CharacterTag, ShapeFill};
use super::image_format::ImageFormat;
use crate::error::{Error, Result};
use crate::writer::CancellationToken;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions bulk import picks up, most preferred first
pub const EXTENSION_PRIORITY: [&str; 6] = ["svg", "png", "jpg", "jpeg", "gif", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Stretch the image over the existing bounds instead of resizing the
    /// shape to the image
    pub fill: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { fill: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkImportReport {
    pub imported: usize,
    pub warnings: Vec<String>,
}

impl BulkImportReport {
    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Tag code for a shape format name given on the command line, 0 if unknown
pub fn shape_tag_kind(name: &str) -> u16 {
    match name {
        "shape" => tag_code::DEFINE_SHAPE,
        "shape2" => tag_code::DEFINE_SHAPE2,
        "shape3" => tag_code::DEFINE_SHAPE3,
        "shape4" => tag_code::DEFINE_SHAPE4,
        _ => 0,
    }
}

fn extension_rank(name: &str) -> Option<usize> {
    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    EXTENSION_PRIORITY.iter().position(|candidate| *candidate == extension)
}

fn matches_character(name: &str, id: u16) -> bool {
    let id = id.to_string();
    name.strip_prefix(id.as_str())
        .map_or(false, |rest| rest.starts_with('.') || rest.starts_with('_'))
}

pub struct ShapeImporter;

impl ShapeImporter {
    /// Replace the shape `shape_id` with an image fill.
    ///
    /// The encoded image becomes a new character inserted just before the
    /// shape. `tag_kind` 0 picks the image tag from the data. Returns the new
    /// image's character id.
    pub fn import_image(
        table: &mut CharacterTable,
        shape_id: u16,
        bytes: &[u8],
        tag_kind: u16,
        fill: bool,
    ) -> Result<u16> {
        let format = ImageFormat::detect(&format!("image for character {}", shape_id), bytes)?;
        table.shape_mut(shape_id)?;

        let code = match tag_kind {
            0 if format == ImageFormat::Jpeg => tag_code::DEFINE_BITS_JPEG2,
            0 => tag_code::DEFINE_BITS_LOSSLESS2,
            code if tag_code::is_image(code) => code,
            code => return Err(Error::config(format!("unsupported image tag kind {}", code))),
        };
        let (width, height) = format.dimensions(bytes).unwrap_or((0, 0));

        let image_id = table.next_character_id()?;
        let image = CharacterTag {
            id: image_id,
            code,
            content: CharacterContent::Image {
                format,
                width,
                height,
                data: bytes.to_vec(),
            },
            modified: true,
        };
        table.insert_before(shape_id, image)?;

        let shape = table.shape_mut(shape_id)?;
        shape.modified = true;
        if let CharacterContent::Shape { bounds, fill: shape_fill } = &mut shape.content {
            if !fill && width > 0 && height > 0 {
                *bounds = bounds.with_pixel_size(width, height);
            }
            *shape_fill = Some(ShapeFill::Bitmap {
                character_id: image_id,
            });
        }
        log::debug!(
            "Imported {} {}x{} as character {} for shape {}",
            format,
            width,
            height,
            image_id,
            shape_id
        );
        Ok(image_id)
    }

    /// Replace the shape `shape_id` with vector content
    pub fn import_svg(table: &mut CharacterTable, shape_id: u16, svg: &str, _fill: bool) -> Result<()> {
        let shape = table.shape_mut(shape_id)?;
        shape.modified = true;
        if let CharacterContent::Shape { fill, .. } = &mut shape.content {
            *fill = Some(ShapeFill::Vector { svg: svg.to_string() });
        }
        Ok(())
    }

    /// Import every file in `dir` named after a shape character.
    ///
    /// A file belongs to shape N when its name starts with `N.` or `N_`.
    /// When several files match, the extension order of
    /// `EXTENSION_PRIORITY` decides, then the file name. Files that fail to
    /// read or import are reported as warnings and skipped.
    pub fn bulk_import(
        dir: &Path,
        table: &mut CharacterTable,
        options: &ImportOptions,
        token: &CancellationToken,
    ) -> Result<BulkImportReport> {
        let mut names: Vec<String> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| extension_rank(name).is_some())
            .collect();
        names.sort();

        let mut report = BulkImportReport::default();
        let mut selected: Vec<(u16, PathBuf)> = Vec::new();
        for id in table.shape_ids() {
            let mut candidates: Vec<&String> = names
                .iter()
                .filter(|name| matches_character(name, id))
                .collect();
            candidates.sort_by(|a, b| {
                extension_rank(a)
                    .cmp(&extension_rank(b))
                    .then_with(|| a.cmp(b))
            });
            let Some(chosen) = candidates.first() else {
                continue;
            };
            if candidates.len() > 1 {
                report.warn(format!(
                    "Multiple matching files for shape tag {} exists, {} selected",
                    id, chosen
                ));
            }
            selected.push((id, dir.join(chosen.as_str())));
        }

        let contents: Vec<(u16, PathBuf, std::io::Result<Vec<u8>>)> = selected
            .into_par_iter()
            .map(|(id, path)| {
                let bytes = std::fs::read(&path);
                (id, path, bytes)
            })
            .collect();

        for (id, path, bytes) in contents {
            token.check()?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            log::info!("Importing character {} from file {}", id, file_name);
            let result = bytes.map_err(Error::from).and_then(|bytes| {
                if extension_rank(&file_name) == Some(0) {
                    let svg = String::from_utf8(bytes)
                        .map_err(|e| Error::Io(format!("{} is not UTF-8: {}", file_name, e)))?;
                    Self::import_svg(table, id, &svg, options.fill)
                } else {
                    Self::import_image(table, id, &bytes, 0, options.fill).map(|_| ())
                }
            });
            match result {
                Ok(()) => report.imported += 1,
                Err(err) => {
                    report.warn(format!("Cannot import shape {} from file {}: {}", id, file_name, err))
                }
            }
        }
        Ok(report)
    }
}
