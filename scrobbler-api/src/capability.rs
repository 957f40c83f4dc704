//! Optional capabilities shared by some entity types.

use serde::Deserialize;

/// Image size label used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
    Mega,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extralarge",
            Self::Mega => "mega",
        }
    }
}

/// One `<image size="...">url</image>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ImageRepr")]
pub struct Image {
    /// Size label; empty when the service gave none.
    pub size: String,
    pub url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageRepr {
    Url(String),
    Sized {
        #[serde(default)]
        size: String,
        #[serde(rename = "#text", default)]
        url: String,
    },
}

impl From<ImageRepr> for Image {
    fn from(repr: ImageRepr) -> Self {
        match repr {
            ImageRepr::Url(url) => Self {
                size: String::new(),
                url,
            },
            ImageRepr::Sized { size, url } => Self { size, url },
        }
    }
}

/// Entities that carry artwork.
pub trait HasImages {
    fn images(&self) -> &[Image];

    /// URL of the image with the given size, if present and non-empty.
    fn image(&self, size: ImageSize) -> Option<&str> {
        self.images()
            .iter()
            .find(|i| i.size == size.as_str())
            .map(|i| i.url.as_str())
            .filter(|u| !u.is_empty())
    }

    /// URL of the last non-empty image; the service lists sizes ascending.
    fn largest_image(&self) -> Option<&str> {
        self.images()
            .iter()
            .rev()
            .map(|i| i.url.as_str())
            .find(|u| !u.is_empty())
    }
}

/// Entities the service may offer as a stream preview.
pub trait Streamable {
    fn is_streamable(&self) -> bool;
}
