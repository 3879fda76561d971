//! QR rendering for share links
//!
//! Longer URLs need more QR modules, so error correction drops and the
//! rendered size grows with URL length to keep the code scannable within
//! the symbol's physical data capacity.

use qrcode::render::{svg, unicode};
use qrcode::{EcLevel, QrCode};

use super::ShareError;

/// Rendering parameters chosen for a given URL length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrSettings {
    pub ec_level: EcLevel,
    /// Rendered image edge in pixels
    pub width: u32,
    /// Whether to keep the quiet zone around the symbol
    pub quiet_zone: bool,
}

/// Pick error correction and size from the realized URL length
pub fn settings_for(url_len: usize) -> QrSettings {
    if url_len > 1500 {
        // Dense payload: lowest correction frees capacity, no quiet zone
        // maximizes module size
        QrSettings {
            ec_level: EcLevel::L,
            width: 1200,
            quiet_zone: false,
        }
    } else if url_len > 1000 {
        QrSettings {
            ec_level: EcLevel::M,
            width: 800,
            quiet_zone: true,
        }
    } else {
        QrSettings {
            ec_level: EcLevel::H,
            width: 600,
            quiet_zone: true,
        }
    }
}

/// Render a share URL as an SVG image
pub fn render_svg(url: &str) -> Result<String, ShareError> {
    let settings = settings_for(url.len());
    let code = QrCode::with_error_correction_level(url.as_bytes(), settings.ec_level)
        .map_err(|e| ShareError::Qr(e.to_string()))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(settings.width, settings.width)
        .quiet_zone(settings.quiet_zone)
        .build())
}

/// Render a share URL as Unicode half-blocks for terminal display
pub fn render_terminal(url: &str) -> Result<String, ShareError> {
    let settings = settings_for(url.len());
    let code = QrCode::with_error_correction_level(url.as_bytes(), settings.ec_level)
        .map_err(|e| ShareError::Qr(e.to_string()))?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .quiet_zone(settings.quiet_zone)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_thresholds() {
        assert_eq!(settings_for(500).ec_level, EcLevel::H);
        assert_eq!(settings_for(500).width, 600);

        assert_eq!(settings_for(1001).ec_level, EcLevel::M);
        assert_eq!(settings_for(1500).ec_level, EcLevel::M);

        assert_eq!(settings_for(1501).ec_level, EcLevel::L);
        assert_eq!(settings_for(1501).width, 1200);
        assert!(!settings_for(1501).quiet_zone);
    }

    #[test]
    fn test_render_svg() {
        let svg = render_svg("https://inkpad.app/view#c:abc123").unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_render_terminal() {
        let art = render_terminal("https://inkpad.app/view#c:abc123").unwrap();
        assert!(!art.is_empty());
    }

    #[test]
    fn test_render_rejects_over_capacity_payload() {
        // Version 40 at EC L tops out around 2953 bytes
        let huge = "x".repeat(4000);
        assert!(matches!(render_svg(&huge), Err(ShareError::Qr(_))));
    }
}
