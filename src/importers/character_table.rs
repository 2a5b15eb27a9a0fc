//! Character definitions of a movie, as far as shape import needs them

use super::image_format::ImageFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tag codes of the definition tags shape import reads or writes
pub mod tag_code {
    pub const DEFINE_SHAPE: u16 = 2;
    pub const DEFINE_BITS_JPEG2: u16 = 21;
    pub const DEFINE_SHAPE2: u16 = 22;
    pub const DEFINE_SHAPE3: u16 = 32;
    pub const DEFINE_BITS_LOSSLESS2: u16 = 36;
    pub const DEFINE_SHAPE4: u16 = 83;

    pub fn is_shape(code: u16) -> bool {
        matches!(code, DEFINE_SHAPE | DEFINE_SHAPE2 | DEFINE_SHAPE3 | DEFINE_SHAPE4)
    }

    pub fn is_image(code: u16) -> bool {
        matches!(code, DEFINE_BITS_JPEG2 | DEFINE_BITS_LOSSLESS2)
    }
}

/// Bounds in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

pub const TWIPS_PER_PIXEL: i32 = 20;

impl Rect {
    /// Same origin, resized to `width` x `height` pixels
    pub fn with_pixel_size(&self, width: u32, height: u32) -> Self {
        let to_twips = |px: u32| i32::try_from(px).unwrap_or(i32::MAX).saturating_mul(TWIPS_PER_PIXEL);
        Rect {
            x_max: self.x_min.saturating_add(to_twips(width)),
            y_max: self.y_min.saturating_add(to_twips(height)),
            ..*self
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }
}

/// What a shape is filled with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeFill {
    Bitmap { character_id: u16 },
    Vector { svg: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CharacterContent {
    Shape {
        #[serde(default)]
        bounds: Rect,
        #[serde(default)]
        fill: Option<ShapeFill>,
    },
    Image {
        format: ImageFormat,
        #[serde(default)]
        width: u32,
        #[serde(default)]
        height: u32,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        data: Vec<u8>,
    },
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterTag {
    pub id: u16,
    pub code: u16,
    pub content: CharacterContent,
    #[serde(default)]
    pub modified: bool,
}

impl CharacterTag {
    pub fn shape(id: u16, code: u16, bounds: Rect) -> Self {
        Self {
            id,
            code,
            content: CharacterContent::Shape { bounds, fill: None },
            modified: false,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.content, CharacterContent::Shape { .. })
    }
}

/// Character tags in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterTable {
    pub tags: Vec<CharacterTag>,
}

impl CharacterTable {
    pub fn new(tags: Vec<CharacterTag>) -> Self {
        Self { tags }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn position(&self, id: u16) -> Option<usize> {
        self.tags.iter().position(|tag| tag.id == id)
    }

    pub fn get(&self, id: u16) -> Option<&CharacterTag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn get_mut(&mut self, id: u16) -> Option<&mut CharacterTag> {
        self.tags.iter_mut().find(|tag| tag.id == id)
    }

    /// The shape with `id`, or why it cannot be used
    pub fn shape_mut(&mut self, id: u16) -> Result<&mut CharacterTag> {
        let tag = self.get_mut(id).ok_or(Error::UnknownCharacter { id })?;
        if !tag.is_shape() {
            return Err(Error::NotAShape { id });
        }
        Ok(tag)
    }

    /// Ids of all shape characters, ascending
    pub fn shape_ids(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self
            .tags
            .iter()
            .filter(|tag| tag.is_shape())
            .map(|tag| tag.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// One past the highest id in use
    pub fn next_character_id(&self) -> Result<u16> {
        match self.tags.iter().map(|tag| tag.id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| Error::internal("character id space exhausted")),
        }
    }

    pub fn insert_before(&mut self, id: u16, tag: CharacterTag) -> Result<()> {
        let index = self.position(id).ok_or(Error::UnknownCharacter { id })?;
        self.tags.insert(index, tag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CharacterTable {
        CharacterTable::new(vec![
            CharacterTag::shape(1, tag_code::DEFINE_SHAPE, Rect::default()),
            CharacterTag {
                id: 5,
                code: 39,
                content: CharacterContent::Other,
                modified: false,
            },
        ])
    }

    #[test]
    fn test_next_character_id() {
        assert_eq!(table().next_character_id().unwrap(), 6);
        assert_eq!(CharacterTable::default().next_character_id().unwrap(), 1);
    }

    #[test]
    fn test_shape_lookup_errors() {
        let mut table = table();
        assert!(matches!(table.shape_mut(9), Err(Error::UnknownCharacter { id: 9 })));
        assert!(matches!(table.shape_mut(5), Err(Error::NotAShape { id: 5 })));
        assert!(table.shape_mut(1).is_ok());
    }

    #[test]
    fn test_insert_before() {
        let mut table = table();
        table
            .insert_before(5, CharacterTag::shape(6, tag_code::DEFINE_SHAPE2, Rect::default()))
            .unwrap();
        let ids: Vec<u16> = table.tags.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 6, 5]);
        assert_eq!(table.shape_ids(), vec![1, 6]);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"tags":[{"id":3,"code":32,"content":{"type":"shape","bounds":{"x_min":0,"y_min":0,"x_max":200,"y_max":100}}}]}"#;
        let table: CharacterTable = serde_json::from_str(json).unwrap();
        assert!(table.tags[0].is_shape());
        assert!(!table.tags[0].modified);
    }

    #[test]
    fn test_rect_with_pixel_size() {
        let origin = Rect {
            x_min: 100,
            y_min: -20,
            x_max: 0,
            y_max: 0,
        };
        let rect = origin.with_pixel_size(3, 2);
        assert_eq!((rect.x_min, rect.y_min), (100, -20));
        assert_eq!((rect.width(), rect.height()), (60, 40));
    }
}
