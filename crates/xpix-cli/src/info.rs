//! `xpix info`: file facts and EXIF metadata.

use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};
use exif::{Exif, In, Rational, Tag, Value};
use image::{ImageFormat, ImageReader};

use crate::image_io::ImageIoError;

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// File facts gathered without decoding the full raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub file_name: String,
    pub file_size: u64,
    pub modified: Option<DateTime<Local>>,
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
    /// `None` when the file carries no readable EXIF block.
    pub exif: Option<ExifSummary>,
}

impl ImageInfo {
    pub fn read(path: &Path) -> Result<Self, ImageIoError> {
        let metadata = fs::metadata(path)?;
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let (width, height) = reader.into_dimensions().map_err(ImageIoError::Decode)?;
        Ok(Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
            width,
            height,
            format,
            exif: read_exif(path)?,
        })
    }
}

fn read_exif(path: &Path) -> Result<Option<ExifSummary>, ImageIoError> {
    let mut reader = BufReader::new(File::open(path)?);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(ExifSummary::from_exif(&exif))),
        Err(e) => {
            tracing::debug!(path = %path.display(), "no EXIF metadata: {e}");
            Ok(None)
        }
    }
}

/// The EXIF tags `xpix info` reports. Absent tags stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifSummary {
    pub make: Option<String>,
    pub model: Option<String>,
    pub lens: Option<String>,
    pub captured: Option<NaiveDateTime>,
    pub iso: Option<u32>,
    pub f_number: Option<f64>,
    /// Shutter time, as a fraction like `1/250` when it has a unit numerator.
    pub exposure_time: Option<String>,
    pub focal_length: Option<f64>,
    pub exposure_bias: Option<f64>,
    pub pixel_dimensions: Option<(u32, u32)>,
    pub orientation: Option<u32>,
    /// Signed decimal degrees `(latitude, longitude)`.
    pub gps: Option<(f64, f64)>,
    pub software: Option<String>,
}

impl ExifSummary {
    pub fn from_exif(exif: &Exif) -> Self {
        let value = move |tag| exif.get_field(tag, In::PRIMARY).map(|f| &f.value);
        let text = move |tag| value(tag).and_then(ascii);
        let uint = move |tag| value(tag).and_then(|v| v.get_uint(0));
        let real = move |tag| value(tag).and_then(first_real);

        let captured = text(Tag::DateTimeOriginal)
            .or_else(|| text(Tag::DateTime))
            .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y:%m:%d %H:%M:%S").ok());
        let exposure_time = match value(Tag::ExposureTime) {
            Some(Value::Rational(r)) => r.first().map(format_shutter),
            _ => None,
        };
        let pixel_dimensions = uint(Tag::PixelXDimension).zip(uint(Tag::PixelYDimension));
        let gps = gps_coordinate(value(Tag::GPSLatitude), value(Tag::GPSLatitudeRef))
            .zip(gps_coordinate(value(Tag::GPSLongitude), value(Tag::GPSLongitudeRef)));

        Self {
            make: text(Tag::Make),
            model: text(Tag::Model),
            lens: text(Tag::LensModel),
            captured,
            iso: uint(Tag::PhotographicSensitivity),
            f_number: real(Tag::FNumber),
            exposure_time,
            focal_length: real(Tag::FocalLength),
            exposure_bias: real(Tag::ExposureBiasValue),
            pixel_dimensions,
            orientation: uint(Tag::Orientation),
            gps,
            software: text(Tag::Software),
        }
    }
}

/// First ASCII component with quotes, NULs and padding stripped.
fn ascii(value: &Value) -> Option<String> {
    let Value::Ascii(parts) = value else {
        return None;
    };
    let raw = String::from_utf8_lossy(parts.first()?);
    let cleaned = raw.trim_matches(|c: char| c == '"' || c == '\0' || c.is_whitespace());
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn first_real(value: &Value) -> Option<f64> {
    let real = match value {
        Value::Rational(r) => r.first().map(Rational::to_f64),
        Value::SRational(r) => r.first().map(|r| r.to_f64()),
        _ => None,
    };
    real.filter(|v| v.is_finite())
}

fn format_shutter(r: &Rational) -> String {
    if r.num == 1 && r.denom > 1 {
        format!("1/{}", r.denom)
    } else {
        format!("{}", r.to_f64())
    }
}

/// Degrees/minutes/seconds plus an `N`/`S`/`E`/`W` reference to signed degrees.
fn gps_coordinate(dms: Option<&Value>, reference: Option<&Value>) -> Option<f64> {
    let Some(Value::Rational(parts)) = dms else {
        return None;
    };
    let [d, m, s] = parts.as_slice() else {
        return None;
    };
    let degrees = d.to_f64() + m.to_f64() / 60.0 + s.to_f64() / 3600.0;
    if !degrees.is_finite() {
        return None;
    }
    match reference.and_then(ascii).as_deref() {
        Some("S") | Some("W") => Some(-degrees),
        _ => Some(degrees),
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File:       {}", self.file_name)?;
        writeln!(f, "Size:       {}", format_file_size(self.file_size))?;
        if let Some(modified) = self.modified {
            writeln!(f, "Modified:   {}", modified.format(TIMESTAMP))?;
        }
        writeln!(f, "Dimensions: {} x {}", self.width, self.height)?;
        match self.format {
            Some(format) => writeln!(f, "Format:     {format:?}")?,
            None => writeln!(f, "Format:     unknown")?,
        }
        writeln!(f)?;
        match &self.exif {
            Some(exif) => write!(f, "{exif}"),
            None => write!(f, "No EXIF metadata"),
        }
    }
}

impl fmt::Display for ExifSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        let mut push = |label: &str, value: Option<String>| {
            if let Some(value) = value {
                lines.push(format!("{label:<13}{value}"));
            }
        };
        push("Make:", self.make.clone());
        push("Model:", self.model.clone());
        push("Lens:", self.lens.clone());
        push(
            "Captured:",
            self.captured.map(|t| t.format("%Y-%m-%d %H:%M:%S %A").to_string()),
        );
        push("ISO:", self.iso.map(|iso| iso.to_string()));
        push("Aperture:", self.f_number.map(|n| format!("f/{n}")));
        push("Shutter:", self.exposure_time.as_ref().map(|t| format!("{t} s")));
        push("Focal:", self.focal_length.map(|mm| format!("{mm} mm")));
        push("Bias:", self.exposure_bias.map(|ev| format!("{ev} EV")));
        push("Pixels:", self.pixel_dimensions.map(|(w, h)| format!("{w} x {h}")));
        push("Orientation:", self.orientation.map(|o| o.to_string()));
        push("GPS:", self.gps.map(|(lat, lon)| format!("{lat:.6}, {lon:.6}")));
        push("Software:", self.software.clone());

        if lines.is_empty() {
            return write!(f, "EXIF block present but empty");
        }
        write!(f, "{}", lines.join("\n"))
    }
}

/// Human-readable size with 1024-based units, e.g. `1.50 KB`.
pub fn format_file_size(size: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: &[u8] = b"KMGTPE";
    if size < UNIT {
        return format!("{size} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = size / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.2} {}B", size as f64 / div as f64, PREFIXES[exp] as char)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use image::codecs::jpeg::JpegEncoder;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("xpix-info-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// A little-endian TIFF block holding a single IFD0 entry, `Make = "Canon"`.
    fn make_only_tiff() -> Vec<u8> {
        let mut tiff = vec![b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        tiff.extend_from_slice(&[0x01, 0x00]);
        tiff.extend_from_slice(&[0x0F, 0x01, 0x02, 0x00]);
        tiff.extend_from_slice(&6u32.to_le_bytes());
        tiff.extend_from_slice(&26u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());
        tiff.extend_from_slice(b"Canon\0");
        tiff
    }

    /// A real JPEG with an APP1 EXIF segment spliced in right after SOI.
    fn jpeg_with_exif() -> Vec<u8> {
        let mut encoded = Vec::new();
        JpegEncoder::new(&mut encoded)
            .encode_image(&image::RgbImage::new(4, 4))
            .unwrap();

        let tiff = make_only_tiff();
        let mut app1 = vec![0xFF, 0xE1];
        app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(&tiff);

        let mut jpeg = encoded[..2].to_vec();
        jpeg.extend_from_slice(&app1);
        jpeg.extend_from_slice(&encoded[2..]);
        jpeg
    }

    #[test]
    fn test_file_size_units() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_png_without_exif_reports_fallback() {
        let dir = scratch_dir("png");
        let path = dir.join("plain.png");
        image::RgbaImage::new(7, 3).save(&path).unwrap();

        let info = ImageInfo::read(&path).unwrap();
        assert_eq!(info.file_name, "plain.png");
        assert_eq!((info.width, info.height), (7, 3));
        assert_eq!(info.format, Some(ImageFormat::Png));
        assert!(info.file_size > 0);
        assert!(info.modified.is_some());
        assert!(info.exif.is_none());

        let text = info.to_string();
        assert!(text.contains("7 x 3"));
        assert!(text.contains("Modified:"));
        assert!(text.ends_with("No EXIF metadata"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_jpeg_exif_make_is_reported() {
        let dir = scratch_dir("jpeg");
        let path = dir.join("camera.jpg");
        fs::write(&path, jpeg_with_exif()).unwrap();

        let info = ImageInfo::read(&path).unwrap();
        assert_eq!(info.format, Some(ImageFormat::Jpeg));
        assert_eq!((info.width, info.height), (4, 4));
        let exif = info.exif.as_ref().unwrap();
        assert_eq!(exif.make.as_deref(), Some("Canon"));
        assert!(exif.model.is_none());
        assert!(info.to_string().contains("Make:        Canon"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_ascii_values_are_cleaned() {
        let value = Value::Ascii(vec![b"\"NIKON\"\0\0".to_vec()]);
        assert_eq!(ascii(&value).as_deref(), Some("NIKON"));
        assert_eq!(ascii(&Value::Ascii(vec![b"\0".to_vec()])), None);
        assert_eq!(ascii(&Value::Short(vec![1])), None);
    }

    #[test]
    fn test_gps_reference_sets_sign() {
        let dms = Value::Rational(vec![
            Rational { num: 37, denom: 1 },
            Rational { num: 30, denom: 1 },
            Rational { num: 36, denom: 1 },
        ]);
        let south = Value::Ascii(vec![b"S".to_vec()]);
        let north = Value::Ascii(vec![b"N".to_vec()]);
        let lat = gps_coordinate(Some(&dms), Some(&south)).unwrap();
        assert!((lat + 37.51).abs() < 1e-9);
        let lat = gps_coordinate(Some(&dms), Some(&north)).unwrap();
        assert!((lat - 37.51).abs() < 1e-9);
        assert!(gps_coordinate(None, Some(&north)).is_none());
    }

    #[test]
    fn test_shutter_prefers_fractions() {
        assert_eq!(format_shutter(&Rational { num: 1, denom: 250 }), "1/250");
        assert_eq!(format_shutter(&Rational { num: 5, denom: 2 }), "2.5");
    }

    #[test]
    fn test_summary_lists_present_tags_only() {
        let summary = ExifSummary {
            model: Some("X100V".into()),
            iso: Some(400),
            f_number: Some(2.8),
            gps: Some((37.51, -122.25)),
            ..Default::default()
        };
        let text = summary.to_string();
        assert!(text.contains("Model:       X100V"));
        assert!(text.contains("ISO:         400"));
        assert!(text.contains("Aperture:    f/2.8"));
        assert!(text.contains("GPS:         37.510000, -122.250000"));
        assert!(!text.contains("Make:"));
    }
}
