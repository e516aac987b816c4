use serde::{Deserialize, Serialize, Serializer};

/// Relative importance multiplier attached to a query node.
///
/// Nodes store `Option<Boost>`: an absent boost is omitted from the encoded
/// document and reads as the neutral weight 1.0. Non-finite boosts have no
/// JSON form and fail to serialize.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct Boost(f64);

impl Boost {
    pub const NEUTRAL: f64 = 1.0;

    pub fn new(value: f64) -> Self {
        Boost(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Weight used for computation: the boost if set, else neutral.
    pub fn value_of(boost: Option<Boost>) -> f64 {
        boost.map_or(Self::NEUTRAL, Boost::get)
    }
}

impl Serialize for Boost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.0.is_finite() {
            return Err(serde::ser::Error::custom(format!(
                "boost {} is not a finite number",
                self.0
            )));
        }
        serializer.serialize_f64(self.0)
    }
}

impl From<f64> for Boost {
    fn from(value: f64) -> Self {
        Boost(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_boost_is_neutral() {
        assert_eq!(Boost::value_of(None), 1.0);
        assert_eq!(Boost::value_of(Some(Boost::new(2.5))), 2.5);
    }

    #[test]
    fn test_validity() {
        assert!(Boost::new(0.5).is_valid());
        assert!(!Boost::new(0.0).is_valid());
        assert!(!Boost::new(-1.0).is_valid());
        assert!(!Boost::new(f64::NAN).is_valid());
        assert!(!Boost::new(f64::INFINITY).is_valid());
    }

    #[test]
    fn test_serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&Boost::new(3.0)).unwrap(), "3.0");
        assert_eq!(serde_json::to_string(&Boost::new(-1.0)).unwrap(), "-1.0");
    }

    #[test]
    fn test_non_finite_does_not_serialize() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = serde_json::to_string(&Boost::new(value)).unwrap_err();
            assert!(err.to_string().contains("not a finite number"));
        }
    }
}
