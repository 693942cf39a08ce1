use confstate::{lens, Composite, Flags, Pin, SchemaError};

/// A saved wireless network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WifiNetwork {
    pub ssid: String,
    pub password: String,
    pub priority: i8,
}

impl WifiNetwork {
    fn schema() -> Result<Composite<WifiNetwork>, SchemaError> {
        Composite::builder()
            .field(lens!(WifiNetwork, ssid), "/ssid")
            .field_as(lens!(WifiNetwork, password), "/password", Some("pw"), Flags::NONE)
            .field_as(lens!(WifiNetwork, priority), "/priority", Some("prio"), Flags::NONE)
            .build()
    }
}

/// Device configuration managed by the CLI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub device_name: String,
    pub led_pin: Pin,
    pub brightness: u8,
    pub threshold: f32,
    /// Runtime-only, never persisted.
    pub debug: bool,
    pub wifi: Vec<WifiNetwork>,
    pub ntp_servers: Vec<String>,
}

impl AppConfig {
    pub fn schema() -> Result<Composite<AppConfig>, SchemaError> {
        Composite::builder()
            .field_as(lens!(AppConfig, device_name), "/deviceName", Some("name"), Flags::NONE)
            .field(lens!(AppConfig, led_pin), "/ledPin")
            .field(lens!(AppConfig, brightness), "/brightness")
            .field(lens!(AppConfig, threshold), "/threshold")
            .field_as(lens!(AppConfig, debug), "/debug", None, Flags::DISABLE_PERSISTENCE)
            .list(lens!(AppConfig, wifi), "/wifi", WifiNetwork::schema()?)
            .value_list_as(lens!(AppConfig, ntp_servers), "/ntpServers", Some("ntp"), Flags::NONE)
            .build()
    }
}
