use iptvstream_common::Channel;

/// Lineup used when the configuration file defines no channels.
pub(super) fn channels() -> Vec<Channel> {
    vec![
        Channel::new(
            "ptv-main",
            "PAKISTAN TV",
            "http://192.168.6.7:8000/play/a00e/index.m3u8",
        )
        .with_logo("📺"),
        Channel::new(
            "ptv-home",
            "PTV Home",
            "http://192.168.6.7:8000/play/a00c/index.m3u8",
        )
        .with_logo("🏠"),
        Channel::new(
            "ptv-news",
            "PTV News HD",
            "http://192.168.6.7:8000/play/a00d/index.m3u8",
        )
        .with_logo("📰"),
        Channel::new(
            "ptv-sports",
            "PTV Sports HD",
            "http://192.168.6.7:8000/play/a00b/index.m3u8",
        )
        .with_logo("⚽"),
    ]
}
