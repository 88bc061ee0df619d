//! Static German UI text.
//!
//! Localization is not configurable; every user-visible string the widget
//! produces lives here so hosts and tests agree on the wording.

/// Transient row shown while the first page of a search is in flight
pub const PLEASE_WAIT: &str = "Bitte warten …";

/// Shown when a search found no articles
pub const NO_RESULTS: &str = "Zu diesem Thema wurden leider keine Artikel gefunden.";

/// Shown when a search request failed
pub const FIND_FAILED: &str = "Die Suche ist leider fehlgeschlagen.";

/// Label of the retry affordance next to [`FIND_FAILED`]
pub const RETRY: &str = "Erneut versuchen";

/// Label of the pagination affordance
pub const LOAD_MORE: &str = "Mehr laden";

/// Opening phrase of the suggestion sentence
pub const SUGGEST_INTRO: &str = "Wie wäre es mit";

/// Conjunction placed before the last suggested topic
pub const SUGGEST_OR: &str = "oder";

/// Root crumb of the result breadcrumb
pub const CATEGORY: &str = "Kategorie";

/// Separator used when a breadcrumb path is reported
pub const CRUMB_SEPARATOR: &str = " > ";

// Problem tags: (label, explanation, anchor)

pub const UEBERARBEITEN: (&str, &str, &str) = (
    "Überarbeiten",
    "Dieser Artikel oder Abschnitt sollte überarbeitet werden.",
    "",
);

pub const LUECKENHAFT: (&str, &str, &str) = (
    "Lückenhaft",
    "In diesem Artikel fehlen wichtige Informationen.",
    "",
);

pub const VERALTET: (&str, &str, &str) = (
    "Veraltet",
    "Dieser Artikel ist nicht mehr auf dem aktuellen Stand.",
    "",
);

pub const BELEGE_FEHLEN: (&str, &str, &str) = (
    "Belege fehlen",
    "Aussagen in diesem Artikel sind nicht ausreichend mit Quellen belegt.",
    "#Einzelnachweise",
);

pub const ALLGEMEINVERSTAENDLICHKEIT: (&str, &str, &str) = (
    "Unverständlich",
    "Dieser Artikel ist für Laien nur schwer verständlich.",
    "",
);

pub const DEFEKTER_WEBLINK: (&str, &str, &str) = (
    "Defekter Weblink",
    "Ein Bot hat einen Weblink als defekt markiert oder durch eine Archivversion ersetzt; das muss noch geprüft werden.",
    "#Weblinks",
);
