// src/constants.rs

/// The name of the application directory inside the system config directory.
pub const APP_DIR_NAME: &str = "ctapgen";

/// Environment variable that overrides the settings directory.
pub const CONFIG_DIR_ENV: &str = "CTAPGEN_CONFIG_DIR";

/// The fixed storage key under which the BasicInfo record is persisted.
pub const BASIC_INFO_STORAGE_KEY: &str = "basicInfoInput";

/// The file (inside the settings directory) holding the persisted BasicInfo record.
pub const BASIC_INFO_FILENAME: &str = "basicInfoInput.json";

/// The file name `ctapgen init` writes when no path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "ctap_pipeline.toml";

/// Data directory used when the user does not provide their own, relative to the repo root.
pub const DEFAULT_DATA_PATH: &str = "ctap/data/test_data";

/// Prefix shared by every CTAP pipeline function.
pub const FUNCTION_PREFIX: &str = "CTAP_";

/// Number of characters stripped from a function name to get its `out.<field>` name.
pub const FUNCTION_PREFIX_LEN: usize = 5;

/// Extension of the generated script.
pub const SCRIPT_EXTENSION: &str = "m";

/// Most stepSets or pipe segments `ctapgen init` will lay out.
pub const MAX_TREE_ENTRIES: usize = 10;
