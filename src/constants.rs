/// Constants used by the mapping loader.
pub mod mapping {
    /// Default location of the whitespace-delimited mapping resource.
    pub const DEFAULT_MAPPING_PATH: &str = "cubostats_mapping.txt";
    /// Source id reported when the mapping resource cannot be read.
    pub const MAPPING_SOURCE_ID: &str = "mapping";
    /// Environment variable consulted when no mapping location is passed explicitly.
    pub const MAPPING_ENV_VAR: &str = "CUBOSTATS_MAPPING";
}

/// Constants used by identity resolution and the player directory backends.
pub mod directory {
    /// Required identifier length (canonical hyphenated UUID form).
    pub const IDENTIFIER_LEN: usize = 36;
    /// Default playerdb lookup endpoint; the identifier is appended as a path segment.
    pub const PLAYERDB_ENDPOINT: &str = "https://playerdb.co/api/player/minecraft";
    /// Environment variable that overrides the playerdb endpoint.
    pub const PLAYERDB_ENDPOINT_ENV_VAR: &str = "CUBOSTATS_PLAYERDB_ENDPOINT";
    /// Source id used for playerdb failures.
    pub const PLAYERDB_SOURCE_ID: &str = "playerdb";
    /// Source id used by the in-memory directory.
    pub const IN_MEMORY_SOURCE_ID: &str = "in_memory";
    /// Global timeout applied to each directory request.
    pub const LOOKUP_TIMEOUT_SECS: u64 = 10;
}

/// Constants used by script generation.
pub mod generator {
    /// Styled chat component broadcast at the top of every generated script.
    pub const HEADER_MESSAGE: &str = r#"[{"text":"Cubo","color":"dark_green"},{"text":"Stats","color":"red"},{"text":" was Retroactively Updated","color":"gold"}]"#;
    /// Selector for the entity executing the function.
    pub const SELF_SELECTOR: &str = "@s";
    /// Command prefix for each scoreboard write.
    pub const SET_COMMAND: &str = "scoreboard players set";
    /// Separator between category and stat in a full stat key.
    pub const STAT_KEY_SEPARATOR: char = ':';
    /// Replacement for the namespace separator inside a category or stat name.
    pub const NAMESPACE_REPLACEMENT: char = '.';
    /// Default broadcast target for named addressing (a function macro argument).
    pub const DEFAULT_BROADCAST_TARGET: &str = "$(target)";
    /// Marker that turns a line into an mcfunction macro line.
    pub const MACRO_PLACEHOLDER_OPEN: &str = "$(";
    /// Closing delimiter of a macro placeholder.
    pub const MACRO_PLACEHOLDER_CLOSE: char = ')';
    /// Filename prefix for per-player scripts.
    pub const OUTPUT_PREFIX: &str = "stats_";
    /// Filename extension for generated scripts.
    pub const OUTPUT_EXTENSION: &str = ".mcfunction";
}

/// Constants used by the aggregate restore script.
pub mod aggregate {
    /// Reserved filename of the aggregate script.
    pub const AGGREGATE_FILENAME: &str = "update_all_stats.mcfunction";
    /// Function path prefix under which per-player scripts are installed.
    pub const DEFAULT_FUNCTION_PREFIX: &str = "cubostats:old_data/";
    /// Selector used to test whether a named player is online.
    pub const PRESENCE_SELECTOR: &str = "@a";
}

/// Constants used by archive packaging.
pub mod archive {
    /// Default filename for the downloadable archive.
    pub const DEFAULT_ARCHIVE_NAME: &str = "cubostats-retroactive-stats.zip";
}

/// Constants used by the static reference passthrough.
pub mod reference {
    /// Published precomputed update payload.
    pub const REFERENCE_URL: &str = "https://raw.githubusercontent.com/awLyxz/cubostats-retroactive/main/retroactive_stats_update.json";
    /// Default local filename for the downloaded payload.
    pub const DEFAULT_REFERENCE_FILENAME: &str = "retroactive_stats_update.json";
    /// Source id used for reference fetch failures.
    pub const REFERENCE_SOURCE_ID: &str = "reference";
}

/// Constants used by input and HTTP transports.
pub mod transport {
    /// Extension of statistics exports.
    pub const INPUT_EXTENSION: &str = "json";
    /// User agent sent with outbound requests.
    pub const USER_AGENT: &str = concat!("cubostats-retroactive/", env!("CARGO_PKG_VERSION"));
}
