use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which arm (or both) a reading or sample pertains to.
///
/// Samples are only ever tagged `LeftArm` or `RightArm`; a `Bilateral`
/// reading produces samples tagged with both.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Laterality {
    LeftArm,
    RightArm,
    Bilateral,
}

impl Laterality {
    pub const ALL: [Laterality; 3] = [
        Laterality::LeftArm,
        Laterality::RightArm,
        Laterality::Bilateral,
    ];

    /// Wire name, e.g. "LEFT_ARM"
    pub fn as_str(&self) -> &'static str {
        match self {
            Laterality::LeftArm => "LEFT_ARM",
            Laterality::RightArm => "RIGHT_ARM",
            Laterality::Bilateral => "BILATERAL",
        }
    }

    /// Legend label for a raw series drawn from this side.
    ///
    /// The chart draws a bilateral reading as one series per arm, so it
    /// never asks for the `Bilateral` label; the arm exists to keep the
    /// match total.
    pub fn series_label(&self) -> &'static str {
        match self {
            Laterality::LeftArm => "Left Arm",
            Laterality::RightArm => "Right Arm",
            Laterality::Bilateral => "Bi-Lateral",
        }
    }

    /// The arms whose samples must be fetched to cover this laterality.
    pub fn arms(&self) -> &'static [Laterality] {
        match self {
            Laterality::LeftArm => &[Laterality::LeftArm],
            Laterality::RightArm => &[Laterality::RightArm],
            Laterality::Bilateral => &[Laterality::LeftArm, Laterality::RightArm],
        }
    }

    /// Laterality choices offered for a reading stored with this laterality.
    ///
    /// A bilateral recording can be viewed per arm or both together; a
    /// unilateral one only as itself.
    pub fn choices(&self) -> Vec<Laterality> {
        match self {
            Laterality::Bilateral => Laterality::ALL.to_vec(),
            single => vec![*single],
        }
    }
}

impl fmt::Display for Laterality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Laterality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LEFT_ARM" => Ok(Laterality::LeftArm),
            "RIGHT_ARM" => Ok(Laterality::RightArm),
            "BILATERAL" => Ok(Laterality::Bilateral),
            _ => Err(Error::UnknownLaterality(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Laterality;

    #[test]
    fn test_bilateral_offers_three_choices() {
        assert_eq!(
            Laterality::Bilateral.choices(),
            vec![
                Laterality::LeftArm,
                Laterality::RightArm,
                Laterality::Bilateral
            ]
        );
    }

    #[test]
    fn test_unilateral_offers_itself() {
        assert_eq!(Laterality::RightArm.choices(), vec![Laterality::RightArm]);
        assert_eq!(Laterality::LeftArm.choices(), vec![Laterality::LeftArm]);
    }

    #[test]
    fn test_parse_and_wire_names() {
        assert_eq!("LEFT_ARM".parse::<Laterality>().unwrap(), Laterality::LeftArm);
        assert_eq!(" bilateral ".parse::<Laterality>().unwrap(), Laterality::Bilateral);
        assert!("BOTH".parse::<Laterality>().is_err());
        let json = serde_json::to_string(&Laterality::RightArm).unwrap();
        assert_eq!(json, "\"RIGHT_ARM\"");
    }
}
