//! Conversion between `data:<mime>;base64,<payload>` strings and [`Image`]s.

use crate::models::Image;
use base64::{engine::general_purpose::STANDARD, Engine as _};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Parse a data URI into an image.
///
/// Returns `None` for anything that is not a `data:` URI with a non-empty
/// MIME type and a non-empty, valid base64 payload. Callers treat `None` as
/// "no image supplied".
pub fn decode(input: &str) -> Option<Image> {
    let rest = input.trim().strip_prefix(SCHEME)?;
    let (content_type, payload) = rest.split_once(BASE64_MARKER)?;

    if content_type.is_empty() || payload.is_empty() {
        return None;
    }

    match STANDARD.decode(payload) {
        Ok(data) => Some(Image::new(content_type, data)),
        Err(e) => {
            tracing::warn!(
                content_type = %content_type,
                error = %e,
                "Ignoring image with invalid base64 payload"
            );
            None
        }
    }
}

/// Render an image as a data URI.
pub fn encode(image: &Image) -> String {
    format!(
        "{}{}{}{}",
        SCHEME,
        image.content_type,
        BASE64_MARKER,
        STANDARD.encode(&image.data)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_data_uri() {
        let image = decode("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(
            image.data,
            vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]
        );
    }

    #[test]
    fn encode_then_decode_preserves_image() {
        let images = [
            Image::new("image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0, 0x00]),
            Image::new("image/svg+xml", b"<svg/>".to_vec()),
            Image::new("application/octet-stream", (0..=255).collect()),
        ];
        for image in images {
            assert_eq!(decode(&encode(&image)), Some(image));
        }
    }

    #[test]
    fn encode_formats_data_uri() {
        let image = Image::new("image/gif", b"GIF".to_vec());
        assert_eq!(encode(&image), "data:image/gif;base64,R0lG");
    }

    #[test]
    fn rejects_non_data_uris() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("not-a-data-uri"), None);
        assert_eq!(decode("image/png;base64,iVBORw0KGgo="), None);
        assert_eq!(decode("data:image/png,iVBORw0KGgo="), None);
        assert_eq!(decode("data:;base64,iVBORw0KGgo="), None);
        assert_eq!(decode("data:image/png;base64,"), None);
    }

    #[test]
    fn invalid_base64_is_treated_as_absent() {
        assert_eq!(decode("data:image/png;base64,@@not base64@@"), None);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let image = decode("  data:text/plain;base64,aGk=\n").unwrap();
        assert_eq!(image, Image::new("text/plain", b"hi".to_vec()));
    }
}
