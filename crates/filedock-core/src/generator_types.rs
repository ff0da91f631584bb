//! Variant generator selection and options.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::DEFAULT_NAME_FORMAT;

/// Variant generator selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    /// Byte-identical copies, one per requested variant id.
    Identity,
    /// Resized and re-encoded images, one per size specification.
    ImageResizer,
}

impl FromStr for GeneratorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "identity" | "dummy" => Ok(GeneratorKind::Identity),
            "image-resizer" | "image_resizer" | "imageresizer" => Ok(GeneratorKind::ImageResizer),
            _ => Err(anyhow::anyhow!("Invalid generator: {}", s)),
        }
    }
}

impl Display for GeneratorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GeneratorKind::Identity => write!(f, "identity"),
            GeneratorKind::ImageResizer => write!(f, "image-resizer"),
        }
    }
}

/// Options handed to the configured generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Variant ids produced by the identity generator.
    pub variant_ids: Vec<String>,
    /// Size specifications consumed by the image resizer.
    pub sizes: Vec<SizeSpec>,
}

/// How an image is fitted into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Fill the box, cropping what overflows.
    Cover,
    /// Fit inside the box, letterboxing the rest.
    Contain,
    /// Stretch to the exact box, ignoring aspect ratio.
    Fill,
    /// Largest size fitting inside the box, aspect ratio kept.
    #[default]
    Inside,
    /// Smallest size covering the box, aspect ratio kept.
    Outside,
}

/// Anchor used when cropping or letterboxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    #[serde(alias = "center")]
    Centre,
    #[serde(alias = "top")]
    North,
    #[serde(alias = "right top")]
    NorthEast,
    #[serde(alias = "right")]
    East,
    #[serde(alias = "right bottom")]
    SouthEast,
    #[serde(alias = "bottom")]
    South,
    #[serde(alias = "left bottom")]
    SouthWest,
    #[serde(alias = "left")]
    West,
    #[serde(alias = "left top")]
    NorthWest,
}

/// One requested variant of the image resizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSpec {
    /// Variant id; a spec without one is skipped.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fit: Fit,
    #[serde(default)]
    pub position: Position,
    /// Output format name (`jpeg`, `png`, `webp`); defaults to the source format.
    #[serde(default)]
    pub format: Option<String>,
    /// JPEG encoder quality, 1-100.
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default = "default_name_format")]
    pub name_format: String,
}

fn default_name_format() -> String {
    DEFAULT_NAME_FORMAT.to_string()
}

impl SizeSpec {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: Some(id.into()),
            width: Some(width),
            height: Some(height),
            fit: Fit::default(),
            position: Position::default(),
            format: None,
            quality: None,
            name_format: default_name_format(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_spec_defaults() {
        let spec: SizeSpec =
            serde_json::from_str(r#"{"id": "small", "width": 300, "height": 300}"#).unwrap();
        assert_eq!(spec.id.as_deref(), Some("small"));
        assert_eq!(spec.fit, Fit::Inside);
        assert_eq!(spec.position, Position::Centre);
        assert_eq!(spec.format, None);
        assert_eq!(spec.name_format, "{{name}}");
    }

    #[test]
    fn test_generator_options_camel_case() {
        let options: GeneratorOptions = serde_json::from_str(
            r#"{"variantIds": ["small", "big"], "sizes": [{"width": 10, "fit": "cover", "position": "north", "nameFormat": "{{base}}_s{{ext}}"}]}"#,
        )
        .unwrap();
        assert_eq!(options.variant_ids, vec!["small", "big"]);
        assert_eq!(options.sizes.len(), 1);
        assert!(options.sizes[0].id.is_none());
        assert_eq!(options.sizes[0].fit, Fit::Cover);
        assert_eq!(options.sizes[0].position, Position::North);
        assert_eq!(options.sizes[0].name_format, "{{base}}_s{{ext}}");
    }

    #[test]
    fn test_generator_kind_parse() {
        assert_eq!(
            "image-resizer".parse::<GeneratorKind>().unwrap(),
            GeneratorKind::ImageResizer
        );
        assert_eq!("dummy".parse::<GeneratorKind>().unwrap(), GeneratorKind::Identity);
        assert!("thumbnailer".parse::<GeneratorKind>().is_err());
    }
}
