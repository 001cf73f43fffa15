use super::*;

#[test]
fn defaults_point_at_local_backend() {
    let cfg = ClientConfig::from_values(None, None);
    assert_eq!(cfg.ws_base, DEFAULT_WS_BASE);
    assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    assert_eq!(cfg.reconnect, ReconnectPolicy::default());
}

#[test]
fn overrides_are_trimmed() {
    let cfg = ClientConfig::from_values(Some(" wss://chat.example.test/ "), Some("https://api.example.test/api/"));
    assert_eq!(cfg.ws_base, "wss://chat.example.test");
    assert_eq!(cfg.api_base, "https://api.example.test/api");
}

#[test]
fn blank_overrides_fall_back_to_defaults() {
    let cfg = ClientConfig::from_values(Some(""), Some("   "));
    assert_eq!(cfg, ClientConfig::default());
}
