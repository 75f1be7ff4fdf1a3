// src/core/catalog.rs

//! Names the pipeline editor offers for completion: the CTAP step functions and
//! the bundled channel-location files. Nothing here is enforced; unknown names
//! only produce validation warnings.

/// CTAP step functions, roughly in the order a pipeline would use them.
pub const CTAP_FUNCTIONS: &[&str] = &[
    "CTAP_load_data",
    "CTAP_load_chanlocs",
    "CTAP_tidy_chanlocs",
    "CTAP_select_data",
    "CTAP_resample_data",
    "CTAP_reref_data",
    "CTAP_fir_filter",
    "CTAP_clock_start",
    "CTAP_blink2event",
    "CTAP_run_ica",
    "CTAP_detect_bad_comps",
    "CTAP_filter_blink_ica",
    "CTAP_detect_bad_channels",
    "CTAP_reject_data",
    "CTAP_interp_chan",
    "CTAP_detect_bad_segments",
    "CTAP_epoch_data",
    "CTAP_detect_bad_epochs",
    "CTAP_remove_cseg",
    "CTAP_peek_data",
    "CTAP_compute_psd",
    "CTAP_extract_bandpowers",
    "CTAP_extract_PSDindices",
    "CTAP_extract_proportional_bandpower",
    "CTAP_event_agg",
    "CTAP_export_data",
];

/// Channel-location files shipped with CTAP.
pub const CTAP_CHANLOCS: &[&str] = &[
    "chanlocs128_pist.elp",
    "chanlocs128_biosemi.elp",
    "chanlocs64_biosemi.elp",
    "chanlocs32_biosemi.elp",
    "chanlocs16_biosemi.elp",
    "chanlocs_NeurOne_EOG.ced",
];

pub fn is_known_function(name: &str) -> bool {
    CTAP_FUNCTIONS.contains(&name.trim())
}

pub fn is_known_chanloc(name: &str) -> bool {
    CTAP_CHANLOCS.contains(&name.trim())
}

/// Catalog functions whose name contains `filter`, ignoring case. An empty
/// filter returns the whole catalog.
pub fn search(filter: &str) -> Vec<&'static str> {
    let needle = filter.trim().to_lowercase();
    CTAP_FUNCTIONS
        .iter()
        .copied()
        .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
        .collect()
}
