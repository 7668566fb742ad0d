//! Application-wide constants.

/// JPEG quality used when the request omits it or sends garbage.
pub const DEFAULT_QUALITY: u8 = 95;

/// CSV column holding image URLs when the client does not pick one.
pub const DEFAULT_CSV_COLUMN: &str = "1000image";

/// Header name (matched case-insensitively) of the optional SKU column.
pub const SKU_COLUMN: &str = "sku";

/// Suffix appended to enhanced output filenames.
pub const WEB_SUFFIX: &str = "web";

/// Stem used when sanitization leaves nothing usable.
pub const FALLBACK_STEM: &str = "image";

/// Filename used when a URL has no usable path segment.
pub const FALLBACK_DOWNLOAD_NAME: &str = "image.jpg";

/// Suffix of the per-day download folder (`YYYY.MM.DD - Images`).
pub const DATED_FOLDER_SUFFIX: &str = " - Images";

/// `chrono` format of the date part of a dated folder name.
pub const DATED_FOLDER_DATE_FORMAT: &str = "%Y.%m.%d";
