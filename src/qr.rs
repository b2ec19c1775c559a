//! Terminal QR code rendering for the download URL.

use qrcode::render::unicode::Dense1x2;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

/// Which module color is drawn with "ink".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Dark modules drawn as light blocks, for dark terminal backgrounds
    #[default]
    Normal,
    /// Dark modules drawn as dark blocks, for light terminal backgrounds
    Reversed,
}

impl Polarity {
    pub fn from_reverse_flag(reverse: bool) -> Self {
        if reverse { Self::Reversed } else { Self::Normal }
    }
}

/// Render `url` as half-block characters.
pub fn render_to_string(url: &str, polarity: Polarity) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)?;

    let (dark, light) = match polarity {
        Polarity::Normal => (Dense1x2::Light, Dense1x2::Dark),
        Polarity::Reversed => (Dense1x2::Dark, Dense1x2::Light),
    };

    Ok(code
        .render::<Dense1x2>()
        .dark_color(dark)
        .light_color(light)
        .quiet_zone(true)
        .build())
}

/// Print the code for `url` to stdout. Rendering problems are logged only.
pub fn render(url: &str, polarity: Polarity) {
    match render_to_string(url, polarity) {
        Ok(code) => println!("{}", code),
        Err(e) => tracing::warn!("Failed to render QR code for {}: {}", url, e),
    }
}
