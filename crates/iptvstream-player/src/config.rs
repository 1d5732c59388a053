//! Fixed configuration handed to the managed HLS engine and the supervisor's
//! own recovery limits.
//!
//! Values favour few requests and stable quality over fast start: moderate
//! forward buffers, bounded retries, generous live-sync tolerances, no
//! low-latency mode. Nothing here is adjustable at runtime.

use serde::Serialize;
use std::time::Duration;

/// Configuration object consumed by a managed HLS engine.
///
/// Serializes under the option names of the browser HLS engine, so the
/// object can be handed verbatim to engines that take a JSON configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub debug: bool,
    pub enable_worker: bool,
    pub low_latency_mode: bool,

    // Buffering targets, in seconds.
    pub max_buffer_length: u32,
    pub max_max_buffer_length: u32,
    pub back_buffer_length: u32,
    /// Largest gap (seconds) the engine may jump over without stalling.
    pub max_buffer_hole: f64,

    // Load timeouts and retry limits.
    #[serde(rename = "manifestLoadingTimeOut")]
    pub manifest_load_timeout_ms: u64,
    #[serde(rename = "manifestLoadingMaxRetry")]
    pub manifest_load_max_retry: u32,
    #[serde(rename = "levelLoadingTimeOut")]
    pub level_load_timeout_ms: u64,
    #[serde(rename = "levelLoadingMaxRetry")]
    pub level_load_max_retry: u32,
    #[serde(rename = "fragLoadingTimeOut")]
    pub frag_load_timeout_ms: u64,
    #[serde(rename = "fragLoadingMaxRetry")]
    pub frag_load_max_retry: u32,
    #[serde(rename = "fragLoadingRetryDelay")]
    pub frag_load_retry_delay_ms: u64,
    pub nudge_max_retry: u32,

    // Live synchronization, in target durations.
    pub live_sync_duration_count: u32,
    pub live_max_latency_duration_count: u32,

    // Quality selection.
    /// `None` lets the engine pick the first level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_level: Option<u32>,
    pub cap_level_to_player_size: bool,
    #[serde(rename = "abrBandWidthFactor")]
    pub abr_bandwidth_factor: f64,
    #[serde(rename = "abrBandWidthUpFactor")]
    pub abr_bandwidth_up_factor: f64,

    // Captions.
    #[serde(rename = "enableWebVTT")]
    pub enable_web_vtt: bool,
    #[serde(rename = "enableCEA708Captions")]
    pub enable_cea708_captions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            enable_worker: true,
            low_latency_mode: false,

            max_buffer_length: 30,
            max_max_buffer_length: 60,
            back_buffer_length: 30,
            max_buffer_hole: 0.5,

            manifest_load_timeout_ms: 20_000,
            manifest_load_max_retry: 2,
            level_load_timeout_ms: 20_000,
            level_load_max_retry: 2,
            frag_load_timeout_ms: 20_000,
            frag_load_max_retry: 3,
            frag_load_retry_delay_ms: 1_000,
            nudge_max_retry: 5,

            live_sync_duration_count: 3,
            live_max_latency_duration_count: 10,

            start_level: None,
            cap_level_to_player_size: true,
            abr_bandwidth_factor: 0.8,
            abr_bandwidth_up_factor: 0.5,

            enable_web_vtt: false,
            enable_cea708_captions: false,
        }
    }
}

/// Limits the supervisor applies on top of the engine's own retries.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorConfig {
    pub engine: EngineConfig,
    /// How long a media-error recovery may take before the supervisor falls
    /// back to direct source assignment.
    pub media_recovery_grace: Duration,
    /// Load-pipeline restarts allowed per activation before failing.
    pub max_network_recoveries: u32,
    /// In-place media recoveries allowed per activation before failing.
    pub max_media_recoveries: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            media_recovery_grace: Duration::from_secs(2),
            max_network_recoveries: 3,
            max_media_recoveries: 2,
        }
    }
}
