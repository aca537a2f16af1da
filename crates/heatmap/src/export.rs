//! Surface-to-bytes exports.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use heatmap_common::HeatmapResult;

use crate::bounds::Rect;
use crate::png;
use crate::surface::Surface;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode the whole surface as PNG bytes.
pub fn encode_png<S: Surface>(surface: &S) -> HeatmapResult<Vec<u8>> {
    let (width, height) = (surface.width(), surface.height());
    let pixels = surface.read_region(Rect::full(width, height));
    png::encode_auto(&pixels, width, height)
}

/// Encode the whole surface as a `data:image/png;base64,` URL.
pub fn encode_data_url<S: Surface>(surface: &S) -> HeatmapResult<String> {
    Ok(to_data_url(&encode_png(surface)?))
}

pub fn to_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_prefix_and_padding() {
        assert_eq!(to_data_url(&[1, 2, 3, 4]), "data:image/png;base64,AQIDBA==");
    }
}
