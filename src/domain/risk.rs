// Risk score domain models
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HazardKind {
    Flood,
    HeavyRain,
    Landslide,
    Tsunami,
    Earthquake,
}

impl HazardKind {
    pub fn all() -> &'static [HazardKind] {
        &[
            Self::Flood,
            Self::HeavyRain,
            Self::Landslide,
            Self::Tsunami,
            Self::Earthquake,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::HeavyRain => "heavy-rain",
            Self::Landslide => "landslide",
            Self::Tsunami => "tsunami",
            Self::Earthquake => "earthquake",
        }
    }

    /// Contribution of this hazard to the overall score
    pub fn weight(&self) -> f64 {
        match self {
            Self::Flood => 0.25,
            Self::HeavyRain => 0.20,
            Self::Landslide => 0.20,
            Self::Tsunami => 0.15,
            Self::Earthquake => 0.20,
        }
    }
}

/// Banding used by dashboards to colour a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Critical,
            60..=79 => Self::High,
            40..=59 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Per-hazard scores plus their weighted combination, all in `[0, 100]`.
///
/// `overall` is only ever computed from the components, so the fields stay private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    flood: u8,
    heavy_rain: u8,
    landslide: u8,
    tsunami: u8,
    earthquake: u8,
    overall: u8,
}

impl RiskScore {
    pub fn from_components(flood: u8, heavy_rain: u8, landslide: u8, tsunami: u8, earthquake: u8) -> Self {
        let mut score = Self {
            flood: flood.min(100),
            heavy_rain: heavy_rain.min(100),
            landslide: landslide.min(100),
            tsunami: tsunami.min(100),
            earthquake: earthquake.min(100),
            overall: 0,
        };

        // Rounded once, after weighting
        let weighted: f64 = HazardKind::all()
            .iter()
            .map(|hazard| hazard.weight() * f64::from(score.component(*hazard)))
            .sum();
        score.overall = weighted.round().clamp(0.0, 100.0) as u8;
        score
    }

    pub fn flood(&self) -> u8 {
        self.flood
    }

    pub fn heavy_rain(&self) -> u8 {
        self.heavy_rain
    }

    pub fn landslide(&self) -> u8 {
        self.landslide
    }

    pub fn tsunami(&self) -> u8 {
        self.tsunami
    }

    pub fn earthquake(&self) -> u8 {
        self.earthquake
    }

    pub fn overall(&self) -> u8 {
        self.overall
    }

    pub fn component(&self, hazard: HazardKind) -> u8 {
        match hazard {
            HazardKind::Flood => self.flood,
            HazardKind::HeavyRain => self.heavy_rain,
            HazardKind::Landslide => self.landslide,
            HazardKind::Tsunami => self.tsunami,
            HazardKind::Earthquake => self.earthquake,
        }
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.overall)
    }

    /// Highest-scoring hazard; earlier hazards win ties
    pub fn dominant_hazard(&self) -> HazardKind {
        let mut best = HazardKind::Flood;
        for hazard in HazardKind::all() {
            if self.component(*hazard) > self.component(best) {
                best = *hazard;
            }
        }
        best
    }
}
