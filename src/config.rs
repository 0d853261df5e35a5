use crate::source::Category;

/// Application ID (reverse domain notation)
pub const APP_ID: &str = "dev.myyc.multiseek";

/// Application name
pub const APP_NAME: &str = "multiseek";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default main window size in pixels
pub const MAIN_WINDOW_WIDTH: i32 = 560;
pub const MAIN_WINDOW_HEIGHT: i32 = 720;

/// Default result window size in pixels
pub const DEFAULT_RESULT_WIDTH: i32 = 1100;
pub const DEFAULT_RESULT_HEIGHT: i32 = 800;

// ============================================================================
// Search Sources
// ============================================================================

/// Built-in sources: (id, display_name, url_template, description, category)
/// The query is appended to the template percent-encoded.
pub const BUILTIN_SOURCES: &[(&str, &str, &str, &str, Category)] = &[
    (
        "google",
        "Google",
        "https://www.google.com/search?q=",
        "General web search",
        Category::General,
    ),
    (
        "bing",
        "Bing",
        "https://www.bing.com/search?q=",
        "Microsoft web search",
        Category::General,
    ),
    (
        "duckduckgo",
        "DuckDuckGo",
        "https://duckduckgo.com/?q=",
        "Private web search",
        Category::General,
    ),
    (
        "google_scholar",
        "Google Scholar",
        "https://scholar.google.com/scholar?q=",
        "Scholarly literature across disciplines",
        Category::Academic,
    ),
    (
        "pubmed",
        "PubMed",
        "https://pubmed.ncbi.nlm.nih.gov/?term=",
        "Biomedical and life sciences literature",
        Category::Academic,
    ),
    (
        "semantic_scholar",
        "Semantic Scholar",
        "https://www.semanticscholar.org/search?q=",
        "AI-powered research paper search",
        Category::Academic,
    ),
    (
        "arxiv",
        "arXiv",
        "https://arxiv.org/search/?searchtype=all&query=",
        "Preprints in physics, mathematics and computer science",
        Category::Academic,
    ),
    (
        "base",
        "BASE",
        "https://www.base-search.net/Search/Results?lookfor=",
        "Bielefeld Academic Search Engine",
        Category::Academic,
    ),
];

/// Placeholder token honored in `placeholder` URL template mode
pub const QUERY_PLACEHOLDER: &str = "%s";

// ============================================================================
// Storage
// ============================================================================

/// Store filename inside the data directory
pub const STORE_FILE: &str = "store.json";

/// Settings filename inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Key holding the serialized source-id -> selected map
pub const PREFERENCES_KEY: &str = "multiseek.preferences";

/// Key holding the serialized list of custom sources
pub const CUSTOM_SOURCES_KEY: &str = "multiseek.custom-sources";

/// Prefix for generated custom source ids
pub const CUSTOM_ID_PREFIX: &str = "custom-";

// ============================================================================
// Result Windows
// ============================================================================

/// Result windows are named `<prefix><source id>`
pub const WINDOW_NAME_PREFIX: &str = "multiseek-";

/// Feature string passed to the host when opening a result window
pub const WINDOW_FEATURES: &str = "noopener=yes,noreferrer=yes";

/// Delay between consecutive window opens of one multi-search (milliseconds)
pub const DEFAULT_STAGGER_MS: u64 = 100;
