//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                  | Connects to                 |
//! |-------------|-----------------------------|-----------------------------|
//! | `hardware`  | OutputPort                  | CLOSE / OPEN GPIO lines     |
//! | `log_sink`  | EventSink                   | Serial log output           |
//! | `nvs`       | ConfigPort                  | NVS / in-memory blob        |
//! | `rtdb`      | RemotePort, FeedPort        | Realtime database over HTTP |
//! | `time`      | (monotonic clock)           | ESP32 system timer          |
//! | `wifi`      | ConnectivityPort            | ESP-IDF WiFi STA            |
//! |             | LinkQualityPort             | AP RSSI                     |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod rtdb;
pub mod time;
pub(super) mod utils;
pub mod wifi;
