use std::fmt;

use serde::{Deserialize, Serialize};

/// Stability rating, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stability {
    #[default]
    NotReviewed,
    Stable,
    NotEnoughInformation,
    MinorIssues,
    LargeIssues,
    MajorIssues,
    IncompatibleAccordingToWorkshop,
    RequiresIncompatibleMod,
    GameBreaking,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    UnlistedInWorkshop,
    RemovedFromWorkshop,
    NoLongerNeeded,
    Deprecated,
    Abandoned,
    Reupload,
    BreaksEditors,
    ModForModders,
    TestVersion,
    MusicCopyrighted,
    SourceUnavailable,
    SourceBundled,
    SourceObfuscated,
    NoDescription,
    NoCommentSection,
    CameraScript,
}

/// Paid add-on content a mod can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dlc {
    Deluxe,
    AfterDark,
    SnowFall,
    NaturalDisasters,
    MassTransit,
    GreenCities,
    ParkLife,
    Industries,
    Campus,
    SunsetHarbor,
    Airports,
    PlazasAndPromenades,
    FinancialDistricts,
    HotelsAndRetreats,
    MatchDay,
    Concerts,
}

/// Highest report severity seen for a subscription while reporting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ReportSeverity {
    #[default]
    Remarks,
    MinorIssues,
    MajorIssues,
    Unsubscribe,
}

/// The four mutually exclusive relationship lists of a mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    RequiredMod,
    Successor,
    Alternative,
    Recommendation,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 4] = [
        RelationshipKind::RequiredMod,
        RelationshipKind::Successor,
        RelationshipKind::Alternative,
        RelationshipKind::Recommendation,
    ];
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RelationshipKind::RequiredMod => write!(f, "required mod"),
            RelationshipKind::Successor => write!(f, "successor"),
            RelationshipKind::Alternative => write!(f, "alternative"),
            RelationshipKind::Recommendation => write!(f, "recommendation"),
        }
    }
}
