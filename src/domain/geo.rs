// Geographic value types
use super::error::{ensure_range, DomainError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A validated WGS84 position. Only constructible through [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = DomainError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        let lat = ensure_range("lat", lat, -90.0, 90.0)?;
        let lng = ensure_range("lng", lng, -180.0, 180.0)?;
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Grid cell of 0.01 degrees containing this position
    pub fn bucket(&self) -> CoordinateBucket {
        CoordinateBucket {
            lat_centi: (self.lat * 100.0).round() as i32,
            lng_centi: (self.lng * 100.0).round() as i32,
        }
    }

    /// Plain "lat, lng" label used when no place name is known
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateBucket {
    pub lat_centi: i32,
    pub lng_centi: i32,
}

/// Deterministic value in `[0, 1)` derived from a tag, a grid cell and a window index.
///
/// Stands in for a random draw wherever a model needs variation that must stay
/// reproducible: identical arguments always give the identical value.
pub fn stable_unit(tag: &str, bucket: CoordinateBucket, window: i64) -> f64 {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    hasher.update(bucket.lat_centi.to_be_bytes());
    hasher.update(bucket.lng_centi.to_be_bytes());
    hasher.update(window.to_be_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    // 53 significant bits fit an f64 mantissa exactly
    (u64::from_be_bytes(head) >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Coordinates = serde_json::from_str(r#"{"lat": 28.6139, "lng": 77.209}"#).unwrap();
        assert_eq!(ok.lat(), 28.6139);

        let bad = serde_json::from_str::<Coordinates>(r#"{"lat": 128.0, "lng": 77.209}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_bucket_and_label() {
        let coords = Coordinates::new(28.6139, 77.2090).unwrap();
        assert_eq!(
            coords.bucket(),
            CoordinateBucket {
                lat_centi: 2861,
                lng_centi: 7721
            }
        );
        assert_eq!(coords.label(), "28.6139, 77.2090");

        let nearby = Coordinates::new(28.6141, 77.2088).unwrap();
        assert_eq!(coords.bucket(), nearby.bucket());
    }

    #[test]
    fn test_stable_unit_is_deterministic_and_bounded() {
        let bucket = Coordinates::new(12.97, 77.59).unwrap().bucket();
        let a = stable_unit("tsunami", bucket, 42);
        assert_eq!(a, stable_unit("tsunami", bucket, 42));
        assert!((0.0..1.0).contains(&a));
        assert_ne!(a, stable_unit("earthquake", bucket, 42));
    }
}
