//! Screenshot request validation
//!
//! Raw query parameters are parsed and bounds-checked here, at the HTTP
//! boundary. A [`ScreenshotRequest`] can only be obtained through
//! [`ScreenshotRequest::from_query`], so every instance downstream is
//! guaranteed to satisfy the documented constraints.

use crate::error::ValidationError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Default viewport width in pixels
pub const DEFAULT_WIDTH: u32 = 1200;

/// Default viewport height in pixels
pub const DEFAULT_HEIGHT: u32 = 800;

/// Default JPEG quality
pub const DEFAULT_QUALITY: u8 = 90;

/// Maximum viewport dimension in pixels
pub const MAX_DIMENSION: u32 = 4000;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG screenshot
    #[default]
    Png,
    /// JPEG screenshot
    Jpeg,
}

impl ImageFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "png" => Some(ImageFormat::Png),
            "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// MIME type for the `Content-Type` header
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension for download filenames
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

/// A validated, normalized screenshot request.
///
/// Fields are private: the validator is the only constructor, and an
/// instance never violates the range/enum constraints it checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotRequest {
    url: Url,
    width: u32,
    height: u32,
    format: ImageFormat,
    quality: u8,
    full_page: bool,
}

impl ScreenshotRequest {
    /// Validate raw query parameters into a request.
    ///
    /// Rules are checked in order, first failure wins:
    /// `url` present, `url` well-formed, `width` in [1,4000], `height` in
    /// [1,4000], `format` png/jpeg, `quality` in [1,100]. `fullPage` is
    /// true only for the literal string `"true"`; any other value is
    /// silently treated as false.
    pub fn from_query(
        params: &HashMap<String, String>,
    ) -> Result<ScreenshotRequest, ValidationError> {
        let raw_url = params
            .get("url")
            .filter(|v| !v.is_empty())
            .ok_or(ValidationError::MissingUrl)?;

        let url = Url::parse(raw_url).map_err(|_| ValidationError::InvalidUrl)?;

        let width = dimension(params, "width", DEFAULT_WIDTH)
            .ok_or(ValidationError::WidthOutOfRange)?;
        let height = dimension(params, "height", DEFAULT_HEIGHT)
            .ok_or(ValidationError::HeightOutOfRange)?;

        let format = match params.get("format").filter(|v| !v.is_empty()) {
            Some(raw) => ImageFormat::parse(raw).ok_or(ValidationError::UnsupportedFormat)?,
            None => ImageFormat::default(),
        };

        let quality = match params.get("quality").filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|q| (1..=100).contains(q))
                .map(|q| q as u8)
                .ok_or(ValidationError::QualityOutOfRange)?,
            None => DEFAULT_QUALITY,
        };

        let full_page = params.get("fullPage").is_some_and(|v| v == "true");

        Ok(ScreenshotRequest {
            url,
            width,
            height,
            format,
            quality,
            full_page,
        })
    }

    /// The target URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Viewport width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Output image format
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// JPEG quality; only applied when `format` is jpeg
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Capture the full scrollable height instead of just the viewport
    pub fn full_page(&self) -> bool {
        self.full_page
    }

    /// Download filename: `<host>_<timestamp>.<ext>`, with host
    /// non-alphanumerics mapped to underscores.
    pub fn filename(&self) -> String {
        let host: String = match self.url.host_str() {
            Some(host) => host
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect(),
            None => "screenshot".to_string(),
        };
        format!(
            "{}_{}.{}",
            host,
            Utc::now().format("%Y-%m-%d_%H-%M-%S"),
            self.format.extension()
        )
    }
}

/// Parse a dimension parameter, defaulting when absent and bounding to
/// [1, MAX_DIMENSION]. None means out of range or not an integer.
fn dimension(params: &HashMap<String, String>, key: &str, default: u32) -> Option<u32> {
    match params.get(key).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|d| (1..=i64::from(MAX_DIMENSION)).contains(d))
            .map(|d| d as u32),
        None => Some(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let request = ScreenshotRequest::from_query(&query(&[("url", "https://example.com")]))
            .expect("minimal request should validate");
        assert_eq!(request.width(), 1200);
        assert_eq!(request.height(), 800);
        assert_eq!(request.format(), ImageFormat::Png);
        assert_eq!(request.quality(), 90);
        assert!(!request.full_page());
        assert_eq!(request.url().as_str(), "https://example.com/");
    }

    #[test]
    fn test_missing_url() {
        let err = ScreenshotRequest::from_query(&query(&[])).unwrap_err();
        assert_eq!(err, ValidationError::MissingUrl);

        // An empty value counts as missing
        let err = ScreenshotRequest::from_query(&query(&[("url", "")])).unwrap_err();
        assert_eq!(err, ValidationError::MissingUrl);
    }

    #[test]
    fn test_malformed_url() {
        for bad in ["not a url", "example.com", "http://", "://nope"] {
            let err = ScreenshotRequest::from_query(&query(&[("url", bad)])).unwrap_err();
            assert_eq!(err, ValidationError::InvalidUrl, "url: {bad}");
        }
    }

    #[test]
    fn test_dimension_bounds() {
        for bad in ["0", "-1", "4001", "100000", "abc", "12.5"] {
            let err = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("width", bad),
            ]))
            .unwrap_err();
            assert_eq!(err, ValidationError::WidthOutOfRange, "width: {bad}");

            let err = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("height", bad),
            ]))
            .unwrap_err();
            assert_eq!(err, ValidationError::HeightOutOfRange, "height: {bad}");
        }

        for good in ["1", "1200", "4000"] {
            let request = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("width", good),
                ("height", good),
            ]))
            .expect("in-range dimensions should validate");
            assert_eq!(request.width().to_string(), good);
            assert_eq!(request.height().to_string(), good);
        }
    }

    #[test]
    fn test_width_checked_before_height() {
        let err = ScreenshotRequest::from_query(&query(&[
            ("url", "https://example.com"),
            ("width", "0"),
            ("height", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ValidationError::WidthOutOfRange);
    }

    #[test]
    fn test_format() {
        for (raw, expected) in [("png", ImageFormat::Png), ("jpeg", ImageFormat::Jpeg)] {
            let request = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("format", raw),
            ]))
            .unwrap();
            assert_eq!(request.format(), expected);
        }

        for bad in ["gif", "webp", "PNG", "jpg"] {
            let err = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("format", bad),
            ]))
            .unwrap_err();
            assert_eq!(err, ValidationError::UnsupportedFormat, "format: {bad}");
        }
    }

    #[test]
    fn test_quality_bounds() {
        for bad in ["0", "101", "-5", "abc"] {
            let err = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("quality", bad),
            ]))
            .unwrap_err();
            assert_eq!(err, ValidationError::QualityOutOfRange, "quality: {bad}");
        }

        for good in ["1", "90", "100"] {
            let request = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("quality", good),
            ]))
            .unwrap();
            assert_eq!(request.quality().to_string(), good);
        }
    }

    #[test]
    fn test_full_page_literal_match() {
        let request = ScreenshotRequest::from_query(&query(&[
            ("url", "https://example.com"),
            ("fullPage", "true"),
        ]))
        .unwrap();
        assert!(request.full_page());

        // Anything but the literal "true" is false, never an error
        for lenient in ["false", "1", "TRUE", "yes", ""] {
            let request = ScreenshotRequest::from_query(&query(&[
                ("url", "https://example.com"),
                ("fullPage", lenient),
            ]))
            .unwrap();
            assert!(!request.full_page(), "fullPage: {lenient:?}");
        }
    }

    #[test]
    fn test_image_format_metadata() {
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::default(), ImageFormat::Png);
    }

    #[test]
    fn test_image_format_serialization() {
        assert_eq!(serde_json::to_string(&ImageFormat::Png).unwrap(), "\"png\"");
        assert_eq!(
            serde_json::to_string(&ImageFormat::Jpeg).unwrap(),
            "\"jpeg\""
        );
    }

    #[test]
    fn test_filename_shape() {
        let request = ScreenshotRequest::from_query(&query(&[
            ("url", "https://sub.example.com/some/page"),
            ("format", "jpeg"),
        ]))
        .unwrap();
        let filename = request.filename();
        assert!(filename.starts_with("sub_example_com_"), "{filename}");
        assert!(filename.ends_with(".jpeg"), "{filename}");
    }

    #[test]
    fn test_filename_without_host() {
        let request =
            ScreenshotRequest::from_query(&query(&[("url", "data:text/html,hello")])).unwrap();
        assert!(request.filename().starts_with("screenshot_"));
    }
}
