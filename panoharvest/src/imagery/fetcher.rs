//! Street View image fetching.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::lookup::HttpClient;

/// Street View image endpoint.
const IMAGE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/streetview";

/// Default image dimensions, width by height.
pub const DEFAULT_IMAGE_SIZE: ImageSize = ImageSize {
    width: 300,
    height: 200,
};

/// Default number of attempts per image.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Errors that can occur while fetching or storing imagery.
#[derive(Debug, Error)]
pub enum ImageryError {
    /// All attempts for one image failed
    #[error("Image download failed for panorama '{pano_id}' heading {heading}: {reason}")]
    Fetch {
        pano_id: String,
        heading: u16,
        reason: String,
    },

    /// Size string is not of the form WIDTHxHEIGHT
    #[error("Invalid image size '{0}' (expected WIDTHxHEIGHT, e.g. 300x200)")]
    InvalidSize(String),

    /// Image file or directory could not be written
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = ImageryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ImageryError::InvalidSize(s.to_string());
        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// One of the four cardinal view directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All headings in download order.
    pub const ALL: [Heading; 4] = [
        Heading::North,
        Heading::East,
        Heading::South,
        Heading::West,
    ];

    /// Compass bearing in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Heading::North => 0,
            Heading::East => 90,
            Heading::South => 180,
            Heading::West => 270,
        }
    }

    /// Single-letter name used for image filenames.
    pub fn letter(self) -> char {
        match self {
            Heading::North => 'N',
            Heading::East => 'E',
            Heading::South => 'S',
            Heading::West => 'W',
        }
    }
}

/// Downloads directional images for panorama identifiers.
///
/// Each image request is retried up to `max_retries` times before the
/// panorama is given up on.
pub struct ImageFetcher<C: HttpClient> {
    http_client: C,
    api_key: String,
    size: ImageSize,
    max_retries: u32,
}

impl<C: HttpClient> ImageFetcher<C> {
    /// Creates a fetcher with default size and retry settings.
    pub fn new(http_client: C, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            size: DEFAULT_IMAGE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the requested image dimensions.
    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    /// Sets the attempt count per image.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Builds the image URL for one panorama and heading.
    fn build_url(&self, pano_id: &str, heading: Heading) -> String {
        format!(
            "{}?pano={}&heading={}&size={}&key={}",
            IMAGE_ENDPOINT,
            pano_id,
            heading.degrees(),
            self.size,
            self.api_key
        )
    }

    /// Fetches a single heading's image bytes, with retries.
    pub fn fetch_heading(&self, pano_id: &str, heading: Heading) -> Result<Vec<u8>, ImageryError> {
        let url = self.build_url(pano_id, heading);

        let mut last_error = String::new();
        for attempt in 1..=self.max_retries {
            match self.http_client.get(&url) {
                Ok(data) => return Ok(data),
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.max_retries {
                        warn!(
                            pano_id,
                            heading = heading.degrees(),
                            attempt,
                            error = %e,
                            "Image request failed, retrying"
                        );
                    }
                }
            }
        }

        Err(ImageryError::Fetch {
            pano_id: pano_id.to_string(),
            heading: heading.degrees(),
            reason: last_error,
        })
    }

    /// Fetches all four directional images for a panorama, in heading order.
    pub fn fetch_panorama(
        &self,
        pano_id: &str,
    ) -> Result<Vec<(Heading, Vec<u8>)>, ImageryError> {
        let mut images = Vec::with_capacity(Heading::ALL.len());
        for heading in Heading::ALL {
            let data = self.fetch_heading(pano_id, heading)?;
            images.push((heading, data));
        }
        Ok(images)
    }
}
