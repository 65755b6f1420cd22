//! Open metadata enums with stable ordinals.

use serde::{Deserialize, Serialize};

use super::{EnumDef, EnumElement};

/// A Rust enum mirroring an open metadata enum type.
///
/// Ordinals are part of the wire contract and need not be contiguous.
pub trait OpenEnum: Sized + Copy + 'static {
    /// Name of the enum type in the type system.
    const TYPE_NAME: &'static str;
    const VALUES: &'static [Self];

    fn ordinal(self) -> i32;
    fn symbolic_name(self) -> &'static str;
    fn description(self) -> &'static str;

    fn from_ordinal(ordinal: i32) -> Option<Self> {
        Self::VALUES.iter().copied().find(|v| v.ordinal() == ordinal)
    }

    fn from_symbolic_name(symbolic_name: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|v| v.symbolic_name() == symbolic_name)
    }

    /// The schema-side definition of this enum.
    fn enum_def() -> EnumDef {
        EnumDef {
            name: Self::TYPE_NAME.to_owned(),
            elements: Self::VALUES
                .iter()
                .map(|v| EnumElement {
                    ordinal: v.ordinal(),
                    symbolic_name: v.symbolic_name().to_owned(),
                    description: Some(v.description().to_owned()),
                })
                .collect(),
        }
    }
}

// ============================================================================
// StarRating
// ============================================================================

/// Level of support a reviewer gives to an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarRating {
    #[default]
    NoRecommendation,
    OneStar,
    TwoStars,
    ThreeStars,
    FourStars,
    FiveStars,
}

impl OpenEnum for StarRating {
    const TYPE_NAME: &'static str = "StarRating";
    const VALUES: &'static [Self] = &[
        StarRating::NoRecommendation,
        StarRating::OneStar,
        StarRating::TwoStars,
        StarRating::ThreeStars,
        StarRating::FourStars,
        StarRating::FiveStars,
    ];

    fn ordinal(self) -> i32 {
        match self {
            StarRating::NoRecommendation => 0,
            StarRating::OneStar => 1,
            StarRating::TwoStars => 2,
            StarRating::ThreeStars => 3,
            StarRating::FourStars => 4,
            StarRating::FiveStars => 99,
        }
    }

    fn symbolic_name(self) -> &'static str {
        match self {
            StarRating::NoRecommendation => "NO_RECOMMENDATION",
            StarRating::OneStar => "ONE_STAR",
            StarRating::TwoStars => "TWO_STARS",
            StarRating::ThreeStars => "THREE_STARS",
            StarRating::FourStars => "FOUR_STARS",
            StarRating::FiveStars => "FIVE_STARS",
        }
    }

    fn description(self) -> &'static str {
        match self {
            StarRating::NoRecommendation => "No rating.",
            StarRating::OneStar => "Poor.",
            StarRating::TwoStars => "Usable.",
            StarRating::ThreeStars => "Good.",
            StarRating::FourStars => "Very good.",
            StarRating::FiveStars => "Excellent.",
        }
    }
}

// ============================================================================
// AnnotationStatus
// ============================================================================

/// Review status of a discovery annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationStatus {
    #[default]
    NewAnnotation,
    Reviewed,
    Approved,
    Actioned,
    Invalid,
    Ignore,
    OtherStatus,
    UnknownStatus,
}

impl OpenEnum for AnnotationStatus {
    const TYPE_NAME: &'static str = "AnnotationStatus";
    const VALUES: &'static [Self] = &[
        AnnotationStatus::NewAnnotation,
        AnnotationStatus::Reviewed,
        AnnotationStatus::Approved,
        AnnotationStatus::Actioned,
        AnnotationStatus::Invalid,
        AnnotationStatus::Ignore,
        AnnotationStatus::OtherStatus,
        AnnotationStatus::UnknownStatus,
    ];

    fn ordinal(self) -> i32 {
        match self {
            AnnotationStatus::NewAnnotation => 0,
            AnnotationStatus::Reviewed => 1,
            AnnotationStatus::Approved => 2,
            AnnotationStatus::Actioned => 3,
            AnnotationStatus::Invalid => 4,
            AnnotationStatus::Ignore => 5,
            AnnotationStatus::OtherStatus => 98,
            AnnotationStatus::UnknownStatus => 99,
        }
    }

    fn symbolic_name(self) -> &'static str {
        match self {
            AnnotationStatus::NewAnnotation => "NEW_ANNOTATION",
            AnnotationStatus::Reviewed => "REVIEWED",
            AnnotationStatus::Approved => "APPROVED",
            AnnotationStatus::Actioned => "ACTIONED",
            AnnotationStatus::Invalid => "INVALID",
            AnnotationStatus::Ignore => "IGNORE",
            AnnotationStatus::OtherStatus => "OTHER_STATUS",
            AnnotationStatus::UnknownStatus => "UNKNOWN_STATUS",
        }
    }

    fn description(self) -> &'static str {
        match self {
            AnnotationStatus::NewAnnotation => "The annotation is new.",
            AnnotationStatus::Reviewed => "The annotation has been reviewed by a steward.",
            AnnotationStatus::Approved => "The annotation has been approved.",
            AnnotationStatus::Actioned => "The request has been actioned.",
            AnnotationStatus::Invalid => "The request is invalid.",
            AnnotationStatus::Ignore => "The request should be ignored.",
            AnnotationStatus::OtherStatus => "Another status.",
            AnnotationStatus::UnknownStatus => "Unknown status.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_rating_ordinals() {
        assert_eq!(StarRating::from_ordinal(2), Some(StarRating::TwoStars));
        assert_eq!(StarRating::from_ordinal(99), Some(StarRating::FiveStars));
        assert_eq!(StarRating::from_ordinal(5), None);
        assert_eq!(StarRating::from_symbolic_name("FOUR_STARS").map(OpenEnum::ordinal), Some(4));
    }

    #[test]
    fn test_enum_def_matches_values() {
        let def = AnnotationStatus::enum_def();
        assert_eq!(def.name, "AnnotationStatus");
        assert_eq!(def.elements.len(), AnnotationStatus::VALUES.len());
        assert_eq!(def.by_ordinal(98).map(|e| e.symbolic_name.as_str()), Some("OTHER_STATUS"));
    }
}
