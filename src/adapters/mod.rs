//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to               |
//! |-----------------|--------------------|---------------------------|
//! | `camera`        | CameraPort         | esp32-camera / simulation |
//! | `hardware`      | ActuatorPort       | ESP32 LEDC PWM, GPIO      |
//! | `log_sink`      | EventSink          | Serial log output         |
//! | `mqtt`          | CommandSource      | ESP-IDF MQTT client       |
//! | `stream_server` | StreamServer       | ESP-IDF HTTP server (MJPEG)|
//! | `time`          | TimePort, DelayNs  | ESP32 system timer        |
//! | `wifi`          | ConnectivityPort   | ESP-IDF WiFi STA          |

pub mod camera;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod stream_server;
pub mod time;
pub(super) mod utils;
pub mod wifi;
